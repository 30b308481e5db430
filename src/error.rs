use thiserror::Error;

#[derive(Error, Debug)]
pub enum MnemonicError {
    #[error("Initialization error: {0}")]
    Initialization(String),

    #[error("Oracle transport error: {0}")]
    OracleTransport(String),

    #[error("Oracle format error: {0}")]
    OracleFormat(String),

    #[error("Empty population: {0}")]
    EmptyPopulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl MnemonicError {
    /// Errors that a batch call downgrades into fallback phenotypes instead of propagating.
    pub fn is_oracle_failure(&self) -> bool {
        matches!(
            self,
            MnemonicError::OracleTransport(_) | MnemonicError::OracleFormat(_)
        )
    }
}

impl From<reqwest::Error> for MnemonicError {
    fn from(err: reqwest::Error) -> Self {
        MnemonicError::OracleTransport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MnemonicError>;
