use std::fmt;
use std::str::FromStr;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use crate::app_config::CaptionStyle;
use crate::errors::LayoutError;
use crate::segmenter::SubtitleLine;
use crate::text_metrics::TextMeasurer;
use crate::word_timing::WordToken;

// @module: Geometric layout and timing of caption elements on a frame

/// Vertical gap between caption rows, in pixels
const ROW_GAP_PX: f64 = 5.0;

/// Font size as a fraction of frame height
const FONT_SIZE_FRACTION: f64 = 0.05;

/// Target destination for the rendered video.
///
/// Each platform reserves a different safe-zone fraction of the frame
/// height near the bottom, where its own UI covers the picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    TikTok,
    YouTube,
    Facebook,
    Instagram,
}

impl Platform {
    /// Safe-zone fraction of frame height reserved near the bottom
    pub fn margin_fraction(&self) -> f64 {
        match self {
            Self::TikTok => 0.20,
            Self::YouTube => 0.35,
            Self::Facebook => 0.22,
            Self::Instagram => 0.22,
        }
    }

    // @returns: Capitalized platform name
    pub fn display_name(&self) -> &str {
        match self {
            Self::TikTok => "TikTok",
            Self::YouTube => "YouTube",
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Platform {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiktok" => Ok(Self::TikTok),
            "youtube" => Ok(Self::YouTube),
            "facebook" => Ok(Self::Facebook),
            "instagram" => Ok(Self::Instagram),
            _ => Err(LayoutError::InvalidPlatform(s.to_string())),
        }
    }
}

/// Vertical placement policy for caption rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Middle,
    Bottom,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Anchor {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "middle" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            _ => Err(LayoutError::InvalidAnchor(s.to_string())),
        }
    }
}

/// Pixel dimensions of the video frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: f64,
    pub height: f64,
}

impl FrameGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        FrameGeometry { width, height }
    }
}

/// What a placed element renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Background,
    Space,
    Highlight,
}

/// One positioned, timed visual element handed to the compositor.
///
/// Coordinates are top-left in pixels; visibility times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedElement {
    pub kind: ElementKind,

    /// Text content; empty for background rectangles
    pub content: String,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    pub visible_from: f64,
    pub visible_until: f64,
}

/// Word index slots packed into one visual row
struct Row {
    word_indices: Vec<usize>,
    width: f64,
}

/// Position a word ended up at, kept for the highlight pass
struct WordPlacement {
    word: WordToken,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

/// Lay one subtitle line out onto the frame.
///
/// Produces, per word: a background rectangle, a text element, and a
/// trailing space element, all visible for the whole line's span, then a
/// second pass appends one highlight element per word visible only during
/// that word's own speech interval. Rows wrap greedily against the usable
/// width and are centered horizontally; vertical placement follows the
/// anchor and the platform's safe margin.
pub fn layout(
    line: &SubtitleLine,
    frame: FrameGeometry,
    platform: Platform,
    anchor: Anchor,
    style: &CaptionStyle,
    measurer: &dyn TextMeasurer,
) -> Result<Vec<PlacedElement>, LayoutError> {
    if frame.width <= 0.0 || frame.height <= 0.0 {
        return Err(LayoutError::InvalidInput(format!(
            "frame dimensions must be positive, got {}x{}",
            frame.width, frame.height
        )));
    }
    if line.words.is_empty() {
        return Err(LayoutError::InvalidInput(
            "subtitle line has no words".to_string(),
        ));
    }

    let font_size = style
        .font_size
        .unwrap_or(frame.height * FONT_SIZE_FRACTION);
    let x_margin = frame.width / 10.0;
    let y_margin = frame.height * platform.margin_fraction();
    let available_width = frame.width - 2.0 * x_margin;

    // Measure each word once; widths drive wrapping, heights row advance
    let word_sizes: Vec<(f64, f64)> = line
        .words
        .iter()
        .map(|w| measurer.measure(&w.text, &style.font, font_size))
        .collect::<Result<_, _>>()?;
    let (space_width, _) = measurer.measure(" ", &style.font, font_size)?;

    let total_width: f64 = word_sizes.iter().map(|(w, _)| w).sum::<f64>()
        + (line.words.len() - 1) as f64 * space_width;

    let rows = pack_rows(&word_sizes, total_width, space_width, available_width);

    let total_text_height = rows.len() as f64 * font_size;
    let mut y = match anchor {
        Anchor::Top => frame.height / 10.0,
        Anchor::Middle => (frame.height - total_text_height) / 2.0,
        Anchor::Bottom => frame.height - y_margin - total_text_height,
    };

    let mut elements = Vec::with_capacity(line.words.len() * 4);
    let mut placements = Vec::with_capacity(line.words.len());

    for row in &rows {
        let mut x = (frame.width - row.width) / 2.0;
        let mut row_word_height = font_size;

        for (pos, &word_idx) in row.word_indices.iter().enumerate() {
            let word = &line.words[word_idx];
            let (word_width, word_height) = word_sizes[word_idx];
            let last_in_row = pos == row.word_indices.len() - 1;
            let trailing_space = if last_in_row { 0.0 } else { space_width };

            elements.push(PlacedElement {
                kind: ElementKind::Background,
                content: String::new(),
                x,
                y,
                width: word_width + trailing_space,
                height: word_height,
                visible_from: line.start,
                visible_until: line.end,
            });
            elements.push(PlacedElement {
                kind: ElementKind::Text,
                content: word.text.clone(),
                x,
                y,
                width: word_width,
                height: word_height,
                visible_from: line.start,
                visible_until: line.end,
            });
            elements.push(PlacedElement {
                kind: ElementKind::Space,
                content: " ".to_string(),
                x: x + word_width,
                y,
                width: trailing_space,
                height: word_height,
                visible_from: line.start,
                visible_until: line.end,
            });

            placements.push(WordPlacement {
                word: word.clone(),
                x,
                y,
                width: word_width,
                height: word_height,
            });

            x += word_width + trailing_space;
            row_word_height = word_height;
        }

        y += row_word_height + ROW_GAP_PX;
    }

    // Karaoke pass: one overlay per word, visible only while it is spoken
    for placed in placements {
        elements.push(PlacedElement {
            kind: ElementKind::Highlight,
            content: placed.word.text.clone(),
            x: placed.x,
            y: placed.y,
            width: placed.width,
            height: placed.height,
            visible_from: placed.word.start,
            visible_until: placed.word.end,
        });
    }

    Ok(elements)
}

/// Greedily pack word indices into rows that fit the usable width.
///
/// A row takes at least one word even when that word alone is too wide;
/// words are never split. Row widths count interior spaces only.
fn pack_rows(
    word_sizes: &[(f64, f64)],
    total_width: f64,
    space_width: f64,
    available_width: f64,
) -> Vec<Row> {
    if total_width <= available_width {
        return vec![Row {
            word_indices: (0..word_sizes.len()).collect(),
            width: total_width,
        }];
    }

    let mut rows: Vec<Row> = Vec::new();
    let mut current = Row { word_indices: Vec::new(), width: 0.0 };

    for (idx, &(word_width, _)) in word_sizes.iter().enumerate() {
        let separator = if current.word_indices.is_empty() { 0.0 } else { space_width };

        if !current.word_indices.is_empty()
            && current.width + separator + word_width > available_width
        {
            rows.push(current);
            current = Row { word_indices: Vec::new(), width: 0.0 };
        }

        let separator = if current.word_indices.is_empty() { 0.0 } else { space_width };
        current.width += separator + word_width;
        current.word_indices.push(idx);
    }

    if !current.word_indices.is_empty() {
        rows.push(current);
    }

    rows
}
