//! Block height estimation for headless hosts
//!
//! A browser host reports real rendered heights. Without a renderer (CLI,
//! server-side reflow, tests) heights are estimated from text length and block
//! kind, or taken from a `data-height` attribute when the producer knows it.

use crate::document::{markup, BlockKind, ContentBlock};

/// Anything that can give a block its rendered height
pub trait BlockMeasure {
    fn measure(&self, block: &ContentBlock) -> f32;
}

impl<F> BlockMeasure for F
where
    F: Fn(&ContentBlock) -> f32,
{
    fn measure(&self, block: &ContentBlock) -> f32 {
        self(block)
    }
}

/// Text-length based height estimate
#[derive(Debug, Clone)]
pub struct HeightEstimator {
    /// Line height in logical pixels
    pub line_height: f32,
    /// Average glyph advance
    pub char_width: f32,
    /// Width available to text
    pub content_width: f32,
    /// Height of embedded elements without a declared height
    pub embedded_height: f32,
}

impl Default for HeightEstimator {
    fn default() -> Self {
        // 14px * 1.2 line height, 8.41px advance, A4 at 96 DPI minus margins
        Self {
            line_height: 16.8,
            char_width: 8.41,
            content_width: 642.0,
            embedded_height: 240.0,
        }
    }
}

impl HeightEstimator {
    /// Characters that fit on one line
    pub fn chars_per_line(&self) -> usize {
        ((self.content_width / self.char_width).floor() as usize).max(1)
    }
}

impl BlockMeasure for HeightEstimator {
    fn measure(&self, block: &ContentBlock) -> f32 {
        if let Some(height) = markup::attribute(&block.markup, "data-height")
            .and_then(|h| h.trim_end_matches("px").parse::<f32>().ok())
        {
            return height;
        }

        if block.kind.is_embedded() {
            return self.embedded_height;
        }

        let chars = block.text().chars().count();
        let lines = chars.div_ceil(self.chars_per_line()).max(1);
        let kind = block.kind;
        let line = self.line_height * kind.line_height_multiplier();
        let items = match kind {
            BlockKind::List => markup::text_content(&block.markup.replace("</li>", "\n"))
                .lines()
                .filter(|l| !l.trim().is_empty())
                .count()
                .max(1),
            _ => 1,
        };

        lines.max(items) as f32 * line + kind.spacing_after() * self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_height_wins() {
        let estimator = HeightEstimator::default();
        let block = ContentBlock::new("<div class=\"chart-wrapper\" data-height=\"312px\"></div>");
        assert_eq!(estimator.measure(&block), 312.0);
    }

    #[test]
    fn test_embedded_default() {
        let estimator = HeightEstimator::default();
        let block = ContentBlock::new("<div class=\"image-wrapper\"><img src=\"a.png\"></div>");
        assert_eq!(estimator.measure(&block), 240.0);
    }

    #[test]
    fn test_longer_text_is_taller() {
        let estimator = HeightEstimator::default();
        let short = estimator.measure(&ContentBlock::paragraph("short"));
        let long = estimator.measure(&ContentBlock::paragraph(&"word ".repeat(100)));
        assert!(long > short);
        assert_eq!(short, 16.8 * 2.0);
    }

    #[test]
    fn test_closure_measure() {
        let fixed = |_: &ContentBlock| 42.0;
        assert_eq!(fixed.measure(&ContentBlock::paragraph("x")), 42.0);
    }
}
