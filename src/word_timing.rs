use std::fs;
use std::path::Path;
use anyhow::{Result, Context};
use log::{warn, debug};
use serde::{Deserialize, Serialize};
use crate::errors::SegmentError;

// @module: Word-level timing data and the transcript exchange file

/// One transcribed word with its speech interval.
///
/// This is the unit of exchange with the external transcriber: a JSON array
/// of `{word, start, end, probability?}` objects, times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordToken {
    // @field: Word text
    #[serde(rename = "word")]
    pub text: String,

    // @field: Speech start in seconds
    pub start: f64,

    // @field: Speech end in seconds
    pub end: f64,

    // @field: Transcriber confidence (0-1)
    #[serde(rename = "probability", default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl WordToken {
    /// Creates a new word token - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        WordToken {
            text: text.into(),
            start,
            end,
            confidence: None,
        }
    }

    /// Duration of the spoken word itself, in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Store word-level timing info to a JSON exchange file
pub fn store_word_info<P: AsRef<Path>>(tokens: &[WordToken], path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(tokens)
        .context("Failed to serialize word-level info")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write word-level info to {}", path.display()))?;
    debug!("Stored word-level info to {}", path.display());
    Ok(())
}

/// Read word-level timing info from a JSON exchange file
pub fn read_word_info<P: AsRef<Path>>(path: P) -> Result<Vec<WordToken>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read word-level info from {}", path.display()))?;

    let tokens: Vec<WordToken> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse word-level JSON in {}", path.display()))?;
    debug!("Read {} word tokens from {}", tokens.len(), path.display());
    Ok(tokens)
}

/// Delete the JSON exchange file if it exists
pub fn delete_word_info<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("Failed to delete exchange file: {}", path.display()))?;
        debug!("Deleted exchange file: {}", path.display());
    } else {
        warn!("Exchange file not found: {}", path.display());
    }
    Ok(())
}

/// Merge apostrophe-leading fragments into their predecessor.
///
/// Transcribers split French contractions into two tokens ("qu" + "'est").
/// A token whose text begins with an apostrophe is folded into the previous
/// token: texts concatenated, confidences averaged, span widened to cover both.
pub fn merge_apostrophe_fragments(tokens: Vec<WordToken>) -> Vec<WordToken> {
    let mut merged: Vec<WordToken> = Vec::with_capacity(tokens.len());

    for token in tokens {
        if token.text.starts_with('\'') {
            if let Some(prev) = merged.last_mut() {
                prev.text.push_str(&token.text);
                prev.confidence = match (prev.confidence, token.confidence) {
                    (Some(a), Some(b)) => Some((a + b) / 2.0),
                    (a, b) => a.or(b),
                };
                prev.end = token.end;
                continue;
            }
        }
        merged.push(token);
    }

    merged
}

/// Validate the token stream preconditions the downstream passes rely on.
///
/// The segmenter and layout engine assume a time-ordered, non-overlapping
/// stream of non-empty words with positive durations; violations surface
/// here as an explicit error rather than as undefined results later.
pub fn validate_tokens(tokens: &[WordToken]) -> Result<(), SegmentError> {
    for (i, token) in tokens.iter().enumerate() {
        if token.text.trim().is_empty() {
            return Err(SegmentError::InvalidInput(format!(
                "token {} has empty text", i
            )));
        }
        if token.start < 0.0 {
            return Err(SegmentError::InvalidInput(format!(
                "token {} ('{}') starts before 0: {}",
                i, token.text, token.start
            )));
        }
        if token.end <= token.start {
            return Err(SegmentError::InvalidInput(format!(
                "token {} ('{}') has end {} <= start {}",
                i, token.text, token.end, token.start
            )));
        }
        if i > 0 && token.start < tokens[i - 1].end {
            return Err(SegmentError::InvalidInput(format!(
                "token {} ('{}') starts at {} before token {} ends at {}",
                i, token.text, token.start, i - 1, tokens[i - 1].end
            )));
        }
    }
    Ok(())
}
