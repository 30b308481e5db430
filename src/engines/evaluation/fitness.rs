use crate::config::FitnessConfig;
use crate::engines::evaluation::similarity::word_similarity;
use crate::engines::generation::genome::Genome;
use crate::types::{Individual, Phenotype};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Individual fitness terms, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    pub letter_match: f64,
    pub length_compliance: f64,
    pub similarity: f64,
    pub order_preservation: f64,
}

/// Scores phenotypes against the constraints of the genome that produced them.
///
/// Scoring is a pure function of the genome letters, the phenotype words and the target
/// words the evaluator was built with. Roles never influence the score, so two individuals
/// with the same sentence content always tie.
pub struct FitnessEvaluator {
    target_words: Vec<String>,
    config: FitnessConfig,
}

impl FitnessEvaluator {
    pub fn new(target_words: Vec<String>, config: FitnessConfig) -> Self {
        Self {
            target_words,
            config,
        }
    }

    pub fn target_words(&self) -> &[String] {
        &self.target_words
    }

    /// Weighted fitness in [0, 100]. Fallback phenotypes are scaled by the degraded factor.
    pub fn score(&self, genome: &Genome, phenotype: &Phenotype) -> f64 {
        let b = self.breakdown(genome, phenotype);
        let total = self.config.total_weight();
        if total <= 0.0 {
            return 0.0;
        }

        let weighted = self.config.letter_weight * b.letter_match
            + self.config.length_weight * b.length_compliance
            + self.config.similarity_weight * b.similarity
            + self.config.order_weight * b.order_preservation;

        let mut fitness = 100.0 * weighted / total;
        if phenotype.is_degraded() {
            fitness *= self.config.degraded_factor;
        }
        fitness.max(0.0)
    }

    pub fn breakdown(&self, genome: &Genome, phenotype: &Phenotype) -> FitnessBreakdown {
        FitnessBreakdown {
            letter_match: letter_match_ratio(genome, &phenotype.words),
            length_compliance: length_compliance(genome.len(), phenotype.words.len()),
            similarity: self.similarity(genome, &phenotype.words),
            order_preservation: order_preservation(genome, &phenotype.words),
        }
    }

    /// Pair genomes with phenotypes by position and score each pair in parallel.
    /// Genomes without a phenotype are dropped; output order follows input order.
    pub fn score_batch(&self, genomes: &[Genome], phenotypes: Vec<Phenotype>) -> Vec<Individual> {
        genomes
            .par_iter()
            .zip(phenotypes.into_par_iter())
            .map(|(genome, phenotype)| Individual {
                fitness: self.score(genome, &phenotype),
                genome: genome.clone(),
                phenotype,
            })
            .collect()
    }

    fn similarity(&self, genome: &Genome, words: &[String]) -> f64 {
        if genome.is_empty() {
            return 0.0;
        }
        let sum: f64 = (0..genome.len())
            .map(|i| match (words.get(i), self.target_words.get(i)) {
                (Some(word), Some(target)) => word_similarity(word, target),
                _ => 0.0,
            })
            .sum();
        sum / genome.len() as f64
    }
}

/// Fraction of slots whose word starts with the slot letter. Missing words score 0.
pub fn letter_match_ratio(genome: &Genome, words: &[String]) -> f64 {
    if genome.is_empty() {
        return 0.0;
    }
    let matched = genome
        .slots
        .iter()
        .enumerate()
        .filter(|(i, slot)| words.get(*i).map(|w| slot.accepts(w)).unwrap_or(false))
        .count();
    matched as f64 / genome.len() as f64
}

/// 1.0 when word and slot counts agree, falling off with the relative difference.
pub fn length_compliance(expected: usize, actual: usize) -> f64 {
    let longest = expected.max(actual);
    if longest == 0 {
        return 1.0;
    }
    1.0 - expected.abs_diff(actual) as f64 / longest as f64
}

/// Detects words that belong to a different slot than the one they occupy.
///
/// Each word is assigned to its own slot when its letter fits, otherwise to the nearest
/// other slot whose letter it fits. The score is one minus the share of inverted pairs
/// among assigned words, so an in-order sentence always scores 1.0.
pub fn order_preservation(genome: &Genome, words: &[String]) -> f64 {
    let assigned: Vec<usize> = words
        .iter()
        .enumerate()
        .filter_map(|(i, word)| assign_slot(genome, i, word))
        .collect();

    let n = assigned.len();
    if n < 2 {
        return 1.0;
    }

    let mut inversions = 0usize;
    for a in 0..n {
        for b in (a + 1)..n {
            if assigned[a] > assigned[b] {
                inversions += 1;
            }
        }
    }

    let pairs = n * (n - 1) / 2;
    1.0 - inversions as f64 / pairs as f64
}

fn assign_slot(genome: &Genome, position: usize, word: &str) -> Option<usize> {
    if genome
        .slots
        .get(position)
        .map(|s| s.accepts(word))
        .unwrap_or(false)
    {
        return Some(position);
    }

    genome
        .slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.accepts(word))
        .min_by_key(|(j, _)| (j.abs_diff(position), *j))
        .map(|(j, _)| j)
}
