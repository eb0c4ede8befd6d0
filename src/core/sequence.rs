// File: src/core/sequence.rs
use crate::core::types::{EntryId, SignToken};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

// word[id]: letters, hyphen, caret or colon, then a bracketed decimal id
static SIGN_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z\-\^:]+)\[([0-9]+)\]").unwrap());

/// Extracts the `word[id]` tokens of an annotated sentence, left to right.
/// Words without a bracketed id carry no dictionary reference and are skipped;
/// repeated ids are kept.
pub fn parse_sequence(annotated: &str) -> Vec<SignToken> {
    SIGN_TOKEN_RE
        .captures_iter(annotated)
        .filter_map(|caps| {
            let word = caps.get(1)?.as_str();
            let raw_id = caps.get(2)?.as_str();
            match raw_id.parse::<EntryId>() {
                Ok(id) => Some(SignToken {
                    word: word.to_string(),
                    id,
                }),
                Err(e) => {
                    warn!("Skipping sign token {word}[{raw_id}]: {e}");
                    None
                }
            }
        })
        .collect()
}

/// Same as [`parse_sequence`], treating a missing sentence as empty.
pub fn parse_optional(annotated: Option<&str>) -> Vec<SignToken> {
    annotated.map(parse_sequence).unwrap_or_default()
}
