pub mod evolution_engine;
pub mod genome;
pub mod operators;
pub mod population;
pub mod progress;
pub mod reproduction;

pub use evolution_engine::{EvolutionEngine, RunState, RunStatus, StepOutcome};
pub use genome::{Genome, SemanticRole, Slot};
pub use population::{initialize_population, Population};
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressCallback, ProgressMessage};
pub use reproduction::reproduce;
