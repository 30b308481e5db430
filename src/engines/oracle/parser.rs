//! Best-effort extraction of phenotypes from oracle response bodies.
//!
//! Accepted shapes, tried in order:
//! 1. `{ "mnemonics": [...] }` as the whole body
//! 2. a chat-completion envelope whose `choices[0].message.content` holds (1) as text
//! 3. free text containing (1), possibly wrapped in markdown fences or prose
use crate::error::{MnemonicError, Result};
use crate::types::{split_words, Phenotype};
use serde_json::Value;

pub fn parse_response(body: &str) -> Result<Vec<Phenotype>> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            if value.get("mnemonics").is_some() || value.is_array() {
                return extract_mnemonics(&value);
            }
            if let Some(content) = chat_content(&value)? {
                return parse_content(content);
            }
            if let Some(error) = value.get("error").and_then(Value::as_str) {
                return Err(MnemonicError::OracleTransport(error.to_string()));
            }
            Err(MnemonicError::OracleFormat(
                "response has neither mnemonics nor choices".to_string(),
            ))
        }
        Err(_) => parse_content(body),
    }
}

/// Parse model text that should contain the mnemonics JSON.
pub fn parse_content(content: &str) -> Result<Vec<Phenotype>> {
    let cleaned = clean_content(content);

    let value = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => value,
        Err(first) => {
            log::debug!("Oracle content is not plain JSON ({}), trying to extract", first);
            let embedded = outermost_object(&cleaned).ok_or_else(|| {
                MnemonicError::OracleFormat("no JSON object found in oracle response".to_string())
            })?;
            serde_json::from_str::<Value>(embedded).map_err(|e| {
                MnemonicError::OracleFormat(format!("invalid JSON in oracle response: {}", e))
            })?
        }
    };

    extract_mnemonics(&value)
}

fn chat_content(value: &Value) -> Result<Option<&str>> {
    let Some(choices) = value.get("choices") else {
        return Ok(None);
    };
    let content = choices
        .get(0)
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            MnemonicError::OracleFormat("no message content in first choice".to_string())
        })?;
    Ok(Some(content))
}

/// Strip markdown fences and emphasis, then collapse whitespace.
fn clean_content(content: &str) -> String {
    let stripped = content
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .replace("**", "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn extract_mnemonics(value: &Value) -> Result<Vec<Phenotype>> {
    let entries = match value {
        Value::Array(entries) => entries,
        _ => value
            .get("mnemonics")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                MnemonicError::OracleFormat("mnemonics is missing or not an array".to_string())
            })?,
    };

    let total = entries.len();
    let phenotypes: Vec<Phenotype> = entries.iter().filter_map(coerce_entry).collect();
    if phenotypes.len() < total {
        log::debug!(
            "Dropped {} unusable mnemonic entries out of {}",
            total - phenotypes.len(),
            total
        );
    }
    Ok(phenotypes)
}

/// Fill whichever of `sentence`/`words` is missing from the other. Entries with neither
/// are unusable.
fn coerce_entry(entry: &Value) -> Option<Phenotype> {
    if let Some(sentence) = entry.as_str() {
        let phenotype = Phenotype::from_sentence(sentence.trim());
        return (!phenotype.words.is_empty()).then_some(phenotype);
    }

    let sentence = entry
        .get("sentence")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let words: Option<Vec<String>> = entry.get("words").and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(|w| match w {
                Value::String(s) => Some(trim_word(s).to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|w| !w.is_empty())
            .collect()
    });
    let words = words.filter(|w| !w.is_empty());

    match (sentence, words) {
        (Some(sentence), Some(words)) => Some(Phenotype::new(sentence, words)),
        (Some(sentence), None) => Some(Phenotype::new(sentence, split_words(sentence))),
        (None, Some(words)) => Some(Phenotype::new(words.join(" "), words)),
        (None, None) => None,
    }
}

/// Same edge trimming as words split from a sentence.
fn trim_word(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}
