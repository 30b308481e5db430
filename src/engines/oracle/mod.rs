pub mod http;
pub mod parser;
pub mod prompt;

pub use http::HttpOracle;
pub use parser::parse_response;
pub use prompt::build_prompt;

use crate::engines::generation::genome::Genome;
use crate::error::{MnemonicError, Result};
use crate::types::Phenotype;

/// Outcome of one batch call, after coercion and truncation.
#[derive(Debug)]
pub enum OracleBatch {
    /// One phenotype per genome.
    Complete(Vec<Phenotype>),
    /// Fewer phenotypes than genomes; they still line up with the first genomes.
    Partial {
        phenotypes: Vec<Phenotype>,
        requested: usize,
    },
    /// The whole call failed; every genome gets a fallback phenotype.
    Failed {
        error: MnemonicError,
        fallbacks: Vec<Phenotype>,
    },
}

impl OracleBatch {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, OracleBatch::Complete(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, OracleBatch::Failed { .. })
    }

    /// Human-readable reason for a degraded batch.
    pub fn degradation_reason(&self) -> Option<String> {
        match self {
            OracleBatch::Complete(_) => None,
            OracleBatch::Partial {
                phenotypes,
                requested,
            } => Some(format!(
                "oracle returned {} of {} phenotypes",
                phenotypes.len(),
                requested
            )),
            OracleBatch::Failed { error, .. } => Some(error.to_string()),
        }
    }

    pub fn into_phenotypes(self) -> Vec<Phenotype> {
        match self {
            OracleBatch::Complete(phenotypes) => phenotypes,
            OracleBatch::Partial { phenotypes, .. } => phenotypes,
            OracleBatch::Failed { fallbacks, .. } => fallbacks,
        }
    }
}

/// External generator that turns genomes into candidate sentences.
///
/// Implementors only provide `request_batch`, a single round trip that may fail as a
/// whole with a transport or format error. `generate_batch` wraps it with input checks,
/// truncation, and the fallback policy so callers never lose a generation to a bad call.
pub trait PhenotypeOracle: Send {
    fn request_batch(
        &self,
        genomes: &[Genome],
        topic: &str,
        target_words: &[String],
    ) -> Result<Vec<Phenotype>>;

    fn generate_batch(
        &self,
        genomes: &[Genome],
        topic: &str,
        target_words: &[String],
    ) -> Result<OracleBatch> {
        if let Some(bad) = genomes.iter().find(|g| g.len() != target_words.len()) {
            return Err(MnemonicError::InvalidInput(format!(
                "genome has {} slots but there are {} target words",
                bad.len(),
                target_words.len()
            )));
        }

        match self.request_batch(genomes, topic, target_words) {
            Ok(mut phenotypes) => {
                phenotypes.truncate(genomes.len());
                if phenotypes.len() == genomes.len() {
                    Ok(OracleBatch::Complete(phenotypes))
                } else {
                    Ok(OracleBatch::Partial {
                        phenotypes,
                        requested: genomes.len(),
                    })
                }
            }
            Err(error) if error.is_oracle_failure() => {
                log::warn!("Oracle batch failed, using fallback phenotypes: {}", error);
                let message = error.to_string();
                let fallbacks = genomes
                    .iter()
                    .map(|g| Phenotype::fallback(g, &message))
                    .collect();
                Ok(OracleBatch::Failed { error, fallbacks })
            }
            Err(error) => Err(error),
        }
    }
}

impl<T: PhenotypeOracle + ?Sized> PhenotypeOracle for Box<T> {
    fn request_batch(
        &self,
        genomes: &[Genome],
        topic: &str,
        target_words: &[String],
    ) -> Result<Vec<Phenotype>> {
        (**self).request_batch(genomes, topic, target_words)
    }
}
