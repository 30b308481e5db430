pub mod fitness;
pub mod similarity;

pub use fitness::{FitnessBreakdown, FitnessEvaluator};
