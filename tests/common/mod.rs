/*!
 * Common test utilities for the autocaps test suite
 */

#![allow(dead_code)]

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;
use autocaps::word_timing::WordToken;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Shorthand word token constructor
pub fn tok(text: &str, start: f64, end: f64) -> WordToken {
    WordToken::new(text, start, end)
}

/// The four-word sample stream used across segmentation tests:
/// "a quick brown fox" spoken over [0.0, 1.3)
pub fn fox_tokens() -> Vec<WordToken> {
    vec![
        tok("a", 0.0, 0.2),
        tok("quick", 0.2, 0.6),
        tok("brown", 0.6, 1.0),
        tok("fox", 1.0, 1.3),
    ]
}

/// A longer stream of evenly spaced words for property-style checks
pub fn monotone_tokens(count: usize) -> Vec<WordToken> {
    (0..count)
        .map(|i| {
            let start = i as f64 * 0.4;
            tok(&format!("word{}", i), start, start + 0.3)
        })
        .collect()
}
