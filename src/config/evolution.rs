use super::traits::{invalid, ConfigSection};
use crate::error::MnemonicError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub mutation_rate: f64,
    pub elite_size: usize,
    pub max_generations: usize,
    /// Minimum spacing between successive oracle batches, in milliseconds.
    pub pacing_delay_ms: u64,
    pub role_policy: RolePolicy,
    pub parent_selection: ParentSelection,
    pub seed: Option<u64>,
}

/// How generation 0 assigns a role to each slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolePolicy {
    /// Uniform draw from the role set.
    Random,
    /// Role index `(genome_index + slot_index) % 4`.
    Cyclic,
}

/// How non-elite parents are drawn before mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentSelection {
    Uniform,
    FitnessWeighted,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 5,
            mutation_rate: 0.3,
            elite_size: 1,
            max_generations: 10,
            pacing_delay_ms: 2000,
            role_policy: RolePolicy::Random,
            parent_selection: ParentSelection::Uniform,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), MnemonicError> {
        let section = Self::section_name();
        if self.population_size == 0 {
            return Err(invalid(section, "Population size must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(invalid(section, "Mutation rate must be between 0 and 1"));
        }
        if self.elite_size > self.population_size {
            return Err(invalid(
                section,
                format!(
                    "Elite size {} exceeds population size {}",
                    self.elite_size, self.population_size
                ),
            ));
        }
        if self.max_generations == 0 {
            return Err(invalid(section, "Max generations must be greater than 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_settings() {
        let mut config = EvolutionConfig::default();
        config.mutation_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = EvolutionConfig::default();
        config.elite_size = config.population_size + 1;
        assert!(config.validate().is_err());

        let mut config = EvolutionConfig::default();
        config.population_size = 0;
        assert!(config.validate().is_err());

        let mut config = EvolutionConfig::default();
        config.max_generations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_elite_size_may_equal_population() {
        let config = EvolutionConfig {
            population_size: 3,
            elite_size: 3,
            ..EvolutionConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
