/*!
 * Error types for the autocaps application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while laying captions out on a frame
#[derive(Error, Debug)]
pub enum LayoutError {
    /// Error when the requested platform is not one of the supported targets
    #[error("Invalid platform name: {0}. Must be 'TikTok', 'YouTube', 'Facebook', or 'Instagram'")]
    InvalidPlatform(String),

    /// Error when the requested vertical anchor is not recognized
    #[error("Invalid text position: {0}. Must be 'top', 'middle', or 'bottom'")]
    InvalidAnchor(String),

    /// Error when an input violates a stated precondition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error reported by the text metrics provider
    #[error("Text measurement failed: {0}")]
    Measurement(String),
}

/// Errors that can occur while segmenting word tokens into lines
#[derive(Error, Debug)]
pub enum SegmentError {
    /// Error when the token stream violates a stated precondition
    #[error("Invalid token stream: {0}")]
    InvalidInput(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from media probing or extraction
    #[error("Media error: {0}")]
    Media(String),

    /// Error from segmentation
    #[error("Segmentation error: {0}")]
    Segment(#[from] SegmentError),

    /// Error from caption layout
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
