use serde::Serialize;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TextStyle {
    pub font_size: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-independent measurer: terminal-cell width times an average glyph
/// aspect. Not pixel-exact for any real font, but deterministic across
/// platforms, which is what the SVG bounds computation needs.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };
        let cells = UnicodeWidthStr::width(text) as f64;
        TextMetrics {
            width: cells * char_width_factor * style.font_size,
            height: line_height_factor * style.font_size,
        }
    }
}
