/*!
 * # autocaps - Automatic Video Captions Generator
 *
 * A Rust library for turning word-level speech timings into positioned,
 * timed on-screen captions.
 *
 * ## Features
 *
 * - Greedy segmentation of word tokens into readable subtitle lines
 *   (character, duration, and silence-gap thresholds)
 * - Geometric caption layout: row wrapping, per-platform safe margins,
 *   vertical anchoring, karaoke-style per-word highlight timing
 * - Word-level JSON exchange with external transcribers
 * - Frame probing and audio extraction via ffprobe/ffmpeg
 * - SRT export of the segmented lines
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `word_timing`: Word token model and transcript exchange file
 * - `segmenter`: Line segmentation and SRT export
 * - `caption_layout`: Layout engine producing placed, timed elements
 * - `text_metrics`: Text measurement seam and default measurer
 * - `media_probe`: ffprobe/ffmpeg plumbing
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod word_timing;
pub mod segmenter;
pub mod caption_layout;
pub mod text_metrics;
pub mod media_probe;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{CaptionStyle, Config};
pub use word_timing::WordToken;
pub use segmenter::{segment, SegmentOptions, SubtitleLine};
pub use caption_layout::{layout, Anchor, ElementKind, FrameGeometry, PlacedElement, Platform};
pub use text_metrics::{CachedMeasurer, HeuristicMeasurer, TextMeasurer};
pub use errors::{AppError, LayoutError, SegmentError};
