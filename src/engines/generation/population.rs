use crate::config::RolePolicy;
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::genome::{initial_letter, Genome};
use crate::engines::generation::operators::seed_genome;
use crate::engines::oracle::{OracleBatch, PhenotypeOracle};
use crate::error::{MnemonicError, Result};
use crate::types::{GenerationStats, Individual};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Individuals of one generation, sorted by descending fitness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Population {
    individuals: Vec<Individual>,
}

/// Descending by fitness with NaN last. Stable sorting keeps oracle order for ties.
fn cmp_fitness_desc(a: &Individual, b: &Individual) -> Ordering {
    match (a.fitness.is_nan(), b.fitness.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal),
    }
}

impl Population {
    pub fn from_individuals(mut individuals: Vec<Individual>) -> Self {
        individuals.sort_by(cmp_fitness_desc);
        Self { individuals }
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn genomes(&self) -> Vec<Genome> {
        self.individuals.iter().map(|i| i.genome.clone()).collect()
    }

    pub fn average_fitness(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }
        self.individuals.iter().map(|i| i.fitness).sum::<f64>() / self.individuals.len() as f64
    }

    /// Number of distinct fitness values after rounding to two decimals.
    pub fn diversity(&self) -> usize {
        self.individuals
            .iter()
            .map(|i| (i.fitness * 100.0).round() as i64)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn stats(&self, generation: usize) -> Option<GenerationStats> {
        let best = self.best()?;
        Some(GenerationStats {
            gen: generation,
            fitness: best.fitness,
            avg_fitness: self.average_fitness(),
            genome_diversity: self.diversity(),
        })
    }
}

/// Upper-cased first letters of the target words. Blank words are rejected.
pub fn target_letters(target_words: &[String]) -> Result<Vec<char>> {
    if target_words.is_empty() {
        return Err(MnemonicError::InvalidInput(
            "at least one target word is required".to_string(),
        ));
    }
    target_words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            initial_letter(word).ok_or_else(|| {
                MnemonicError::InvalidInput(format!("target word {} is blank", i + 1))
            })
        })
        .collect()
}

/// Build and score generation 0.
///
/// All genomes go to the oracle in a single batch. A batch that failed outright, or that
/// produced no usable phenotype, is an initialization failure.
pub fn initialize_population<O, R>(
    oracle: &O,
    evaluator: &FitnessEvaluator,
    topic: &str,
    population_size: usize,
    policy: RolePolicy,
    rng: &mut R,
) -> Result<Population>
where
    O: PhenotypeOracle + ?Sized,
    R: Rng,
{
    let target_words = evaluator.target_words();
    let letters = target_letters(target_words)?;
    let genomes: Vec<Genome> = (0..population_size)
        .map(|i| seed_genome(&letters, policy, i, rng))
        .collect();

    let batch = oracle.generate_batch(&genomes, topic, target_words)?;
    if let OracleBatch::Failed { error, .. } = &batch {
        return Err(MnemonicError::Initialization(format!(
            "oracle batch failed: {}",
            error
        )));
    }
    if let Some(reason) = batch.degradation_reason() {
        log::warn!("Initial batch degraded: {}", reason);
    }

    let population = Population::from_individuals(
        evaluator.score_batch(&genomes, batch.into_phenotypes()),
    );
    if population.is_empty() {
        return Err(MnemonicError::Initialization(
            "oracle returned no usable phenotypes".to_string(),
        ));
    }

    Ok(population)
}
