use std::fs::File;
use std::fmt;
use std::io::Write;
use std::path::Path;
use anyhow::{Result, Context};
use log::debug;
use serde::{Deserialize, Serialize};
use crate::word_timing::WordToken;

// @module: Greedy segmentation of word tokens into subtitle lines

/// Default maximum characters per subtitle line
pub const DEFAULT_MAX_CHARS: usize = 20;

/// Default maximum summed word duration per line, in seconds
pub const DEFAULT_MAX_DURATION: f64 = 1.3;

/// Default silence gap that forces a new line, in seconds
pub const DEFAULT_MAX_GAP: f64 = 1.5;

/// Thresholds controlling when an accumulating line is flushed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentOptions {
    /// Maximum characters in the space-joined line text
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Maximum summed per-word duration, in seconds
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,

    /// Maximum silence between consecutive words, in seconds
    #[serde(default = "default_max_gap")]
    pub max_gap: f64,
}

fn default_max_chars() -> usize { DEFAULT_MAX_CHARS }
fn default_max_duration() -> f64 { DEFAULT_MAX_DURATION }
fn default_max_gap() -> f64 { DEFAULT_MAX_GAP }

impl Default for SegmentOptions {
    fn default() -> Self {
        SegmentOptions {
            max_chars: DEFAULT_MAX_CHARS,
            max_duration: DEFAULT_MAX_DURATION,
            max_gap: DEFAULT_MAX_GAP,
        }
    }
}

/// A group of consecutive word tokens destined to display together.
///
/// Serialized form matches the line-level exchange format:
/// `{word, start, end, textcontents}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleLine {
    // @field: Space-joined word texts
    #[serde(rename = "word")]
    pub text: String,

    // @field: First word's start, seconds
    pub start: f64,

    // @field: Last word's end, seconds
    pub end: f64,

    // @field: Constituent word tokens, time-ordered
    #[serde(rename = "textcontents")]
    pub words: Vec<WordToken>,
}

impl SubtitleLine {
    /// Build a line from a non-empty run of accumulated tokens
    fn from_words(words: Vec<WordToken>) -> Self {
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let start = words.first().map(|w| w.start).unwrap_or(0.0);
        let end = words.last().map(|w| w.end).unwrap_or(0.0);

        SubtitleLine { text, start, end, words }
    }

    /// Format a time in seconds as an SRT timestamp (HH:MM:SS,mmm)
    pub fn format_timestamp(seconds: f64) -> String {
        let total_ms = (seconds * 1000.0).round().max(0.0) as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let millis = total_ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }
}

impl fmt::Display for SubtitleLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} --> {}: {}",
            Self::format_timestamp(self.start),
            Self::format_timestamp(self.end),
            self.text
        )
    }
}

/// Partition an ordered token stream into subtitle lines.
///
/// Single left-to-right greedy pass. A silence gap longer than `max_gap`
/// between a token and its predecessor closes the open line before the
/// token is appended, so the boundary falls exactly at the gap. The
/// character and duration thresholds are checked after appending, so the
/// word that trips one of them stays in the line it was appended to.
/// The duration check sums each word's own span, not the wall-clock span
/// of the line; the two differ when silence sits inside an accumulated
/// line, and the summed form is the one callers depend on.
pub fn segment(tokens: &[WordToken], opts: SegmentOptions) -> Vec<SubtitleLine> {
    let mut lines = Vec::new();
    let mut open: Vec<WordToken> = Vec::new();
    let mut line_duration = 0.0_f64;

    for (idx, token) in tokens.iter().enumerate() {
        let gap_exceeded = idx > 0 && token.start - tokens[idx - 1].end > opts.max_gap;
        if gap_exceeded && !open.is_empty() {
            lines.push(SubtitleLine::from_words(std::mem::take(&mut open)));
            line_duration = 0.0;
        }

        open.push(token.clone());
        line_duration += token.duration();

        // Length of the space-joined candidate text
        let candidate_chars: usize = open
            .iter()
            .map(|w| w.text.chars().count())
            .sum::<usize>()
            + open.len().saturating_sub(1);

        let chars_exceeded = candidate_chars > opts.max_chars;
        let duration_exceeded = line_duration > opts.max_duration;

        if chars_exceeded || duration_exceeded {
            lines.push(SubtitleLine::from_words(std::mem::take(&mut open)));
            line_duration = 0.0;
        }
    }

    if !open.is_empty() {
        lines.push(SubtitleLine::from_words(open));
    }

    debug!("Segmented {} tokens into {} lines", tokens.len(), lines.len());
    lines
}

/// Write segmented lines to an SRT file
pub fn write_srt<P: AsRef<Path>>(lines: &[SubtitleLine], path: P) -> Result<()> {
    let path = path.as_ref();

    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

    for (i, line) in lines.iter().enumerate() {
        writeln!(file, "{}", i + 1)?;
        writeln!(
            file,
            "{} --> {}",
            SubtitleLine::format_timestamp(line.start),
            SubtitleLine::format_timestamp(line.end)
        )?;
        writeln!(file, "{}", line.text)?;
        writeln!(file)?;
    }

    Ok(())
}
