pub mod evolution_runner;

pub use evolution_runner::{EvolutionRunner, RunnerCommand, RunnerResult};
