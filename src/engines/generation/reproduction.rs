use crate::config::EvolutionConfig;
use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::{mutate_roles, select_parent};
use crate::engines::generation::population::Population;
use crate::error::{MnemonicError, Result};
use rand::Rng;

/// Produce exactly `population_size` genomes for the next generation.
///
/// The first `elite_size` genomes of the (sorted) population pass through unchanged and in
/// order. When fewer individuals survived than `elite_size`, every survivor is an elite and
/// the rest is filled by mutation. Remaining slots are clones of parents drawn under
/// `parent_selection`, with each role redrawn at `mutation_rate`.
pub fn reproduce<R: Rng>(
    population: &Population,
    config: &EvolutionConfig,
    rng: &mut R,
) -> Result<Vec<Genome>> {
    if population.is_empty() {
        return Err(MnemonicError::EmptyPopulation(
            "cannot reproduce from an empty population".to_string(),
        ));
    }

    let individuals = population.individuals();
    let elite_count = config
        .elite_size
        .min(individuals.len())
        .min(config.population_size);

    let mut next_generation: Vec<Genome> = Vec::with_capacity(config.population_size);
    next_generation.extend(individuals[..elite_count].iter().map(|i| i.genome.clone()));

    while next_generation.len() < config.population_size {
        let parent = select_parent(individuals, config.parent_selection, rng);
        let mut child = parent.genome.clone();
        mutate_roles(&mut child, config.mutation_rate, rng);
        next_generation.push(child);
    }

    Ok(next_generation)
}
