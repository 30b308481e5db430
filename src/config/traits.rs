use crate::error::MnemonicError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), MnemonicError>;
}

pub(crate) fn invalid(section: &str, message: impl Into<String>) -> MnemonicError {
    MnemonicError::Configuration(format!("[{}] {}", section, message.into()))
}
