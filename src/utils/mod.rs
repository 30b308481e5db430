pub mod terms;

pub use terms::{default_terms, first_letters, parse_terms, DEFAULT_TERMS, DEFAULT_TOPIC};
