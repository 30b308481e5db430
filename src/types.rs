use crate::config::EvolutionConfig;
use crate::engines::generation::genome::Genome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentence produced by the oracle for one genome.
///
/// `words` is expected to line up with the genome's slots, but nothing guarantees it:
/// the oracle can return too many words, too few, or words in the wrong order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phenotype {
    pub sentence: String,
    pub words: Vec<String>,
    /// Set when this phenotype is a fallback for a failed oracle batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Phenotype {
    pub fn new(sentence: impl Into<String>, words: Vec<String>) -> Self {
        Self {
            sentence: sentence.into(),
            words,
            error: None,
        }
    }

    /// Words derived by splitting the sentence on whitespace and trimming punctuation.
    pub fn from_sentence(sentence: impl Into<String>) -> Self {
        let sentence = sentence.into();
        let words = split_words(&sentence);
        Self::new(sentence, words)
    }

    /// Stand-in for a genome the oracle failed to realize: the slot letters become the
    /// words and the sentence carries the error.
    pub fn fallback(genome: &Genome, error: &str) -> Self {
        Self {
            sentence: format!("Error: {}", error),
            words: genome.letters().iter().map(|c| c.to_string()).collect(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

pub fn split_words(sentence: &str) -> Vec<String> {
    sentence
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub genome: Genome,
    pub phenotype: Phenotype,
    pub fitness: f64,
}

/// Per-generation statistics appended to the run history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub gen: usize,
    pub fitness: f64,
    pub avg_fitness: f64,
    pub genome_diversity: usize,
}

/// Read-only export of a run for an external persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub generation: usize,
    pub population: Vec<Individual>,
    pub best_solution: Option<Individual>,
    pub history: Vec<GenerationStats>,
    pub settings: EvolutionConfig,
    pub topic: String,
    pub target_words: Vec<String>,
    pub exported_at: DateTime<Utc>,
}

impl RunSnapshot {
    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::{SemanticRole, Slot};

    #[test]
    fn test_split_words_strips_punctuation() {
        let words = split_words("Merry, ocean... table!");
        assert_eq!(words, vec!["Merry", "ocean", "table"]);
    }

    #[test]
    fn test_fallback_uses_genome_letters() {
        let genome = Genome::new(vec![
            Slot::new('M', SemanticRole::Noun),
            Slot::new('V', SemanticRole::Verb),
        ]);
        let phenotype = Phenotype::fallback(&genome, "timeout");
        assert_eq!(phenotype.words, vec!["M", "V"]);
        assert_eq!(phenotype.sentence, "Error: timeout");
        assert!(phenotype.is_degraded());
    }
}
