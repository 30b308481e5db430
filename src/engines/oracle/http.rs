use super::parser::parse_response;
use super::prompt::build_prompt;
use super::PhenotypeOracle;
use crate::config::OracleConfig;
use crate::engines::generation::genome::Genome;
use crate::error::{MnemonicError, Result};
use crate::types::Phenotype;
use reqwest::blocking::Client;
use serde::Serialize;

#[derive(Serialize)]
struct PromptRequest<'a> {
    prompt: &'a str,
}

/// Oracle backed by an HTTP endpoint that takes `{ "prompt": ... }` and answers with the
/// mnemonics JSON, either bare or inside a chat-completion envelope.
pub struct HttpOracle {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpOracle {
    pub fn new(config: &OracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("mnemevolve/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                MnemonicError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PhenotypeOracle for HttpOracle {
    fn request_batch(
        &self,
        genomes: &[Genome],
        topic: &str,
        target_words: &[String],
    ) -> Result<Vec<Phenotype>> {
        let prompt = build_prompt(genomes, topic, target_words);
        log::debug!(
            "Requesting {} phenotypes from {}",
            genomes.len(),
            self.endpoint
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&PromptRequest { prompt: &prompt });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(MnemonicError::OracleTransport(format!(
                "Server error: {} - {}",
                status.as_u16(),
                detail
            )));
        }

        let phenotypes = parse_response(&body)?;
        log::debug!("Oracle returned {} phenotypes", phenotypes.len());
        Ok(phenotypes)
    }
}
