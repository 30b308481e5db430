pub mod traits;
pub mod evolution;
pub mod oracle;
pub mod fitness;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::{EvolutionConfig, ParentSelection, RolePolicy};
pub use oracle::OracleConfig;
pub use fitness::FitnessConfig;
