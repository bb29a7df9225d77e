use std::collections::HashMap;
use parking_lot::Mutex;
use crate::errors::LayoutError;

// @module: Text measurement seam between layout math and the renderer

/// Provider of rendered text dimensions for a given font and size.
///
/// The layout engine treats this as a pure function from
/// `(text, font, size)` to `(width, height)` in pixels. The real
/// measurement lives with the external compositor; this crate ships a
/// glyph-advance approximation good enough for wrapping decisions.
pub trait TextMeasurer {
    /// Measure the rendered size of `text` at `font_size` pixels
    fn measure(&self, text: &str, font: &str, font_size: f64) -> Result<(f64, f64), LayoutError>;
}

/// Approximate measurer based on per-glyph advance ratios.
///
/// Ratios are fractions of the font size, tuned for heavy display faces
/// like the Montserrat ExtraBold default. Height is a fixed line-height
/// multiple of the font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasurer;

impl HeuristicMeasurer {
    /// Line height relative to font size
    const LINE_HEIGHT: f64 = 1.2;

    /// Horizontal advance of one glyph as a fraction of font size
    fn advance_ratio(c: char) -> f64 {
        match c {
            ' ' => 0.30,
            'i' | 'j' | 'l' | '\'' | '.' | ',' | ':' | ';' | '!' | '|' => 0.32,
            'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' => 0.42,
            'm' | 'w' => 0.92,
            'M' | 'W' => 1.0,
            'I' | 'J' => 0.38,
            c if c.is_ascii_uppercase() => 0.74,
            c if c.is_ascii_digit() => 0.62,
            '?' => 0.55,
            _ => 0.58,
        }
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&self, text: &str, _font: &str, font_size: f64) -> Result<(f64, f64), LayoutError> {
        if font_size <= 0.0 {
            return Err(LayoutError::Measurement(format!(
                "font size must be positive, got {}", font_size
            )));
        }

        let width: f64 = text.chars().map(Self::advance_ratio).sum::<f64>() * font_size;
        Ok((width, font_size * Self::LINE_HEIGHT))
    }
}

/// Memoizing wrapper around another measurer.
///
/// Keyed by `(text, font, size)`; useful when the underlying provider
/// shells out or rasterizes. Safe to share across threads.
pub struct CachedMeasurer<M: TextMeasurer> {
    inner: M,
    cache: Mutex<HashMap<(String, String, u64), (f64, f64)>>,
}

impl<M: TextMeasurer> CachedMeasurer<M> {
    /// Wrap a measurer with a lookup cache
    pub fn new(inner: M) -> Self {
        CachedMeasurer {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of distinct measurements cached so far
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedMeasurer<M> {
    fn measure(&self, text: &str, font: &str, font_size: f64) -> Result<(f64, f64), LayoutError> {
        let key = (text.to_string(), font.to_string(), font_size.to_bits());
        if let Some(hit) = self.cache.lock().get(&key) {
            return Ok(*hit);
        }

        let size = self.inner.measure(text, font, font_size)?;
        self.cache.lock().insert(key, size);
        Ok(size)
    }
}
