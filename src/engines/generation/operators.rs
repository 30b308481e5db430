use crate::config::{ParentSelection, RolePolicy};
use crate::engines::generation::genome::{Genome, SemanticRole, Slot};
use crate::types::Individual;
use rand::Rng;

/// Uniform draw from the role set
pub fn random_role<R: Rng>(rng: &mut R) -> SemanticRole {
    SemanticRole::ALL[rng.gen_range(0..SemanticRole::ALL.len())]
}

/// Genome over `letters` with roles chosen by `policy`.
/// `index` is the genome's position in its generation, used by the cyclic policy.
pub fn seed_genome<R: Rng>(letters: &[char], policy: RolePolicy, index: usize, rng: &mut R) -> Genome {
    let slots = letters
        .iter()
        .enumerate()
        .map(|(i, &letter)| {
            let role = match policy {
                RolePolicy::Random => random_role(rng),
                RolePolicy::Cyclic => SemanticRole::ALL[(index + i) % SemanticRole::ALL.len()],
            };
            Slot::new(letter, role)
        })
        .collect();
    Genome::new(slots)
}

/// Uniform parent draw
pub fn uniform_selection<'a, R: Rng>(population: &'a [Individual], rng: &mut R) -> &'a Individual {
    &population[rng.gen_range(0..population.len())]
}

/// Roulette wheel selection: probability proportional to fitness
pub fn roulette_selection<'a, R: Rng>(population: &'a [Individual], rng: &mut R) -> &'a Individual {
    let total_fitness: f64 = population.iter().map(|i| i.fitness.max(0.0)).sum();

    if total_fitness <= 0.0 {
        // Nothing to weight by, pick random
        return uniform_selection(population, rng);
    }

    let mut spin = rng.gen::<f64>() * total_fitness;

    for individual in population {
        let weight = individual.fitness.max(0.0);
        if weight == 0.0 {
            continue;
        }
        spin -= weight;
        if spin <= 0.0 {
            return individual;
        }
    }

    // Rounding fallback
    &population[population.len() - 1]
}

/// Parent draw under the configured policy. `population` must be non-empty.
pub fn select_parent<'a, R: Rng>(
    population: &'a [Individual],
    policy: ParentSelection,
    rng: &mut R,
) -> &'a Individual {
    match policy {
        ParentSelection::Uniform => uniform_selection(population, rng),
        ParentSelection::FitnessWeighted => roulette_selection(population, rng),
    }
}

/// Mutation: each slot independently redraws its role with probability `mutation_rate`.
/// Letters are never touched.
pub fn mutate_roles<R: Rng>(genome: &mut Genome, mutation_rate: f64, rng: &mut R) {
    for slot in genome.slots.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            slot.role = random_role(rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phenotype;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn individual(fitness: f64) -> Individual {
        Individual {
            genome: Genome::new(vec![Slot::new('A', SemanticRole::Noun)]),
            phenotype: Phenotype::from_sentence("Apple"),
            fitness,
        }
    }

    #[test]
    fn test_cyclic_policy_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        let g0 = seed_genome(&['M', 'V', 'E'], RolePolicy::Cyclic, 0, &mut rng);
        let g1 = seed_genome(&['M', 'V', 'E'], RolePolicy::Cyclic, 1, &mut rng);
        assert_eq!(
            g0.roles(),
            vec![SemanticRole::Noun, SemanticRole::Verb, SemanticRole::Adjective]
        );
        assert_eq!(
            g1.roles(),
            vec![SemanticRole::Verb, SemanticRole::Adjective, SemanticRole::Random]
        );
    }

    #[test]
    fn test_random_policy_is_seedable() {
        let letters = ['M', 'V', 'E', 'M', 'J', 'S'];
        let a = seed_genome(&letters, RolePolicy::Random, 0, &mut StdRng::seed_from_u64(42));
        let b = seed_genome(&letters, RolePolicy::Random, 0, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(a.letters(), letters.to_vec());
    }

    #[test]
    fn test_mutation_never_changes_letters() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut genome = seed_genome(&['M', 'V', 'E'], RolePolicy::Random, 0, &mut rng);
        for _ in 0..50 {
            mutate_roles(&mut genome, 1.0, &mut rng);
            assert_eq!(genome.letters(), vec!['M', 'V', 'E']);
        }
    }

    #[test]
    fn test_zero_rate_never_mutates() {
        let mut rng = StdRng::seed_from_u64(7);
        let original = seed_genome(&['M', 'V', 'E'], RolePolicy::Random, 0, &mut rng);
        let mut genome = original.clone();
        for _ in 0..50 {
            mutate_roles(&mut genome, 0.0, &mut rng);
        }
        assert_eq!(genome, original);
    }

    #[test]
    fn test_roulette_never_picks_zero_fitness_when_others_positive() {
        let mut rng = StdRng::seed_from_u64(3);
        let population = vec![individual(0.0), individual(10.0), individual(0.0)];
        for _ in 0..100 {
            let picked = roulette_selection(&population, &mut rng);
            assert_eq!(picked.fitness, 10.0);
        }
    }

    #[test]
    fn test_roulette_falls_back_to_uniform_on_zero_total() {
        let mut rng = StdRng::seed_from_u64(3);
        let population = vec![individual(0.0), individual(0.0)];
        let picked = roulette_selection(&population, &mut rng);
        assert_eq!(picked.fitness, 0.0);
    }
}
