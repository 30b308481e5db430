use super::traits::{invalid, ConfigSection};
use crate::error::MnemonicError;
use serde::{Deserialize, Serialize};

/// Weights of the fitness terms. Each term is in [0, 1]; the weighted sum is normalized by
/// the total weight and scaled to [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub letter_weight: f64,
    pub length_weight: f64,
    pub similarity_weight: f64,
    pub order_weight: f64,
    /// Multiplier applied to fallback phenotypes from failed oracle batches.
    pub degraded_factor: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            letter_weight: 0.40,
            length_weight: 0.15,
            similarity_weight: 0.30,
            order_weight: 0.15,
            degraded_factor: 0.1,
        }
    }
}

impl FitnessConfig {
    pub fn total_weight(&self) -> f64 {
        self.letter_weight + self.length_weight + self.similarity_weight + self.order_weight
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), MnemonicError> {
        let section = Self::section_name();
        let weights = [
            self.letter_weight,
            self.length_weight,
            self.similarity_weight,
            self.order_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid(section, "Weights must be finite and non-negative"));
        }
        if self.total_weight() <= 0.0 {
            return Err(invalid(section, "At least one weight must be positive"));
        }
        if !(0.0..=1.0).contains(&self.degraded_factor) {
            return Err(invalid(section, "Degraded factor must be between 0 and 1"));
        }
        Ok(())
    }
}
