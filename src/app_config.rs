use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use crate::caption_layout::{Anchor, Platform};
use crate::segmenter::SegmentOptions;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target platform for the rendered captions
    #[serde(default = "default_platform")]
    pub platform: Platform,

    /// Vertical anchor for caption rows
    #[serde(default = "default_anchor")]
    pub anchor: Anchor,

    /// Line segmentation thresholds
    #[serde(default)]
    pub segmenter: SegmentOptions,

    /// Caption rendering style
    #[serde(default)]
    pub style: CaptionStyle,

    /// Output directory for generated files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Visual style of the rendered captions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CaptionStyle {
    /// Font family name
    #[serde(default = "default_font")]
    pub font: String,

    /// Font size in pixels; when unset, 5% of frame height
    #[serde(default)]
    pub font_size: Option<f64>,

    /// Text color
    #[serde(default = "default_color")]
    pub color: String,

    /// Highlight background color
    #[serde(default = "default_background_color")]
    pub background_color: String,

    /// Opacity of the per-word background rectangles (0-1)
    #[serde(default = "default_background_opacity")]
    pub background_opacity: f64,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font: default_font(),
            font_size: None,
            color: default_color(),
            background_color: default_background_color(),
            background_opacity: default_background_opacity(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_platform() -> Platform {
    Platform::YouTube
}

fn default_anchor() -> Anchor {
    Anchor::Bottom
}

fn default_font() -> String {
    "Montserrat-ExtraBold".to_string()
}

fn default_color() -> String {
    "white".to_string()
}

fn default_background_color() -> String {
    "blue".to_string()
}

fn default_background_opacity() -> f64 {
    0.5
}

fn default_output_dir() -> String {
    "output".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.segmenter.max_chars == 0 {
            return Err(anyhow!("segmenter.max_chars must be greater than 0"));
        }
        if self.segmenter.max_duration <= 0.0 {
            return Err(anyhow!("segmenter.max_duration must be positive"));
        }
        if self.segmenter.max_gap <= 0.0 {
            return Err(anyhow!("segmenter.max_gap must be positive"));
        }

        if self.style.font.trim().is_empty() {
            return Err(anyhow!("style.font must not be empty"));
        }
        if let Some(size) = self.style.font_size {
            if size <= 0.0 {
                return Err(anyhow!("style.font_size must be positive when set"));
            }
        }
        if !(0.0..=1.0).contains(&self.style.background_opacity) {
            return Err(anyhow!(
                "style.background_opacity must be between 0 and 1, got {}",
                self.style.background_opacity
            ));
        }

        if self.output_dir.trim().is_empty() {
            return Err(anyhow!("output_dir must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            platform: default_platform(),
            anchor: default_anchor(),
            segmenter: SegmentOptions::default(),
            style: CaptionStyle::default(),
            output_dir: default_output_dir(),
            log_level: LogLevel::default(),
        }
    }
}
