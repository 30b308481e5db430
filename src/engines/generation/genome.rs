//! Genome representation for mnemonic synthesis
//!
//! A genome is an ordered sequence of slots, one per target word, in the same order as the
//! target list. Each slot pins two things for the phenotype oracle:
//! - The initial letter the mnemonic word must start with (fixed by the target word)
//! - A semantic role hint (noun, verb, adjective, or free choice)
//!
//! # Why split letter and role?
//!
//! The letter is a hard constraint and never evolves. Only the role is subject to
//! mutation, so the search explores *how* the oracle is asked to realize each position
//! while the acrostic structure survives every generation.
//!
//! # Example
//!
//! ```
//! use mnemevolve::engines::generation::genome::{Genome, SemanticRole, Slot};
//!
//! let genome = Genome::new(vec![
//!     Slot::new('M', SemanticRole::Adjective),
//!     Slot::new('V', SemanticRole::Noun),
//! ]);
//! assert_eq!(genome.letters(), vec!['M', 'V']);
//! assert_eq!(genome.to_constraint_string(), "M(adjective) V(noun)");
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic hint attached to a slot. Biases word choice, never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticRole {
    Noun,
    Verb,
    Adjective,
    Random,
}

impl SemanticRole {
    pub const ALL: [SemanticRole; 4] = [
        SemanticRole::Noun,
        SemanticRole::Verb,
        SemanticRole::Adjective,
        SemanticRole::Random,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticRole::Noun => "noun",
            SemanticRole::Verb => "verb",
            SemanticRole::Adjective => "adjective",
            SemanticRole::Random => "random",
        }
    }
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub letter: char,
    pub role: SemanticRole,
}

impl Slot {
    /// Letters are stored uppercase so comparisons stay case-insensitive.
    pub fn new(letter: char, role: SemanticRole) -> Self {
        Self {
            letter: to_upper(letter),
            role,
        }
    }

    /// Letter matches are case-insensitive.
    pub fn accepts(&self, word: &str) -> bool {
        word.chars()
            .next()
            .map(|c| to_upper(c) == self.letter)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome {
    pub slots: Vec<Slot>,
}

impl Genome {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn letters(&self) -> Vec<char> {
        self.slots.iter().map(|s| s.letter).collect()
    }

    pub fn roles(&self) -> Vec<SemanticRole> {
        self.slots.iter().map(|s| s.role).collect()
    }

    /// `letter(role)` pairs separated by spaces, as embedded in oracle prompts.
    pub fn to_constraint_string(&self) -> String {
        self.slots
            .iter()
            .map(|s| format!("{}({})", s.letter, s.role))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Two genomes are comparable only when built from the same target list.
    pub fn is_compatible_with(&self, other: &Genome) -> bool {
        self.letters() == other.letters()
    }
}

/// First character of a target word, uppercased. `None` for blank words.
pub fn initial_letter(word: &str) -> Option<char> {
    word.trim().chars().next().map(to_upper)
}

fn to_upper(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}
