use super::traits::{invalid, ConfigSection};
use crate::error::MnemonicError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// URL that accepts `POST { "prompt": ... }`.
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Name of an environment variable holding a bearer token, if the endpoint needs one.
    pub api_key_env: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/mistral".to_string(),
            timeout_secs: 60,
            api_key_env: None,
        }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Token looked up from the configured environment variable; missing or empty is `None`.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl ConfigSection for OracleConfig {
    fn section_name() -> &'static str {
        "oracle"
    }

    fn validate(&self) -> Result<(), MnemonicError> {
        let section = Self::section_name();
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(invalid(
                section,
                format!("Endpoint must be an http(s) URL, got '{}'", self.endpoint),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(invalid(section, "Timeout must be at least one second"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_must_be_http() {
        let config = OracleConfig {
            endpoint: "localhost:3000".to_string(),
            ..OracleConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(OracleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_env_is_none() {
        let config = OracleConfig {
            api_key_env: Some("MNEMEVOLVE_TEST_KEY_THAT_IS_NOT_SET".to_string()),
            ..OracleConfig::default()
        };
        assert_eq!(config.api_key(), None);
    }
}
