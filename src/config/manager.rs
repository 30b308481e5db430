use super::{
    evolution::EvolutionConfig,
    fitness::FitnessConfig,
    oracle::OracleConfig,
    traits::ConfigSection,
};
use crate::error::MnemonicError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix for environment overrides, e.g. `MNEMO__EVOLUTION__POPULATION_SIZE=8`.
pub const ENV_PREFIX: &str = "MNEMO";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub oracle: OracleConfig,
    pub fitness: FitnessConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), MnemonicError> {
        self.evolution.validate()?;
        self.oracle.validate()?;
        self.fitness.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML file, then apply `MNEMO__*` environment overrides on top.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MnemonicError> {
        let builder = config::Config::builder().add_source(
            config::File::from(path.as_ref()).format(config::FileFormat::Toml),
        );
        self.apply(builder)
    }

    /// Defaults plus environment overrides only.
    pub fn load_from_env(&self) -> Result<(), MnemonicError> {
        self.apply(config::Config::builder())
    }

    fn apply(
        &self,
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<(), MnemonicError> {
        let layered = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| MnemonicError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = layered
            .try_deserialize()
            .map_err(|e| MnemonicError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), MnemonicError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| MnemonicError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| MnemonicError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Apply an edit; the edit is discarded if the result fails validation.
    pub fn update<F>(&self, f: F) -> Result<(), MnemonicError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mnemevolve.toml");

        let manager = ConfigManager::new();
        manager
            .update(|c| {
                c.evolution.population_size = 8;
                c.evolution.seed = Some(7);
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        assert_eq!(reloaded.get().evolution.population_size, 8);
        assert_eq!(reloaded.get().evolution.seed, Some(7));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[evolution]\nmax_generations = 3\n").unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(&path).unwrap();
        let config = manager.get();
        assert_eq!(config.evolution.max_generations, 3);
        assert_eq!(config.evolution.population_size, 5);
        assert_eq!(config.oracle, OracleConfig::default());
    }

    #[test]
    fn test_policies_read_as_snake_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policies.toml");
        std::fs::write(
            &path,
            "[evolution]\nrole_policy = \"cyclic\"\nparent_selection = \"fitness_weighted\"\n",
        )
        .unwrap();

        let manager = ConfigManager::new();
        manager.load_from_file(&path).unwrap();
        let evolution = manager.get().evolution;
        assert_eq!(evolution.role_policy, crate::config::RolePolicy::Cyclic);
        assert_eq!(evolution.parent_selection, crate::config::ParentSelection::FitnessWeighted);
    }

    #[test]
    fn test_invalid_update_is_rejected_and_discarded() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.evolution.mutation_rate = 2.0);
        assert!(matches!(result, Err(MnemonicError::Configuration(_))));
        assert_eq!(manager.get().evolution.mutation_rate, 0.3);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[evolution]\nelite_size = 50\n").unwrap();

        let manager = ConfigManager::new();
        assert!(manager.load_from_file(&path).is_err());
        assert_eq!(manager.get(), AppConfig::default());
    }
}
