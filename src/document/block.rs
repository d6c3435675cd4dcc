//! Block-level content units

use crate::document::markup;
use serde::{Deserialize, Serialize};

/// The kind of block element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum BlockKind {
    /// Regular paragraph or bare text run
    #[default]
    Paragraph,
    /// Heading with level (1-6)
    Heading { level: u8 },
    /// Bulleted or numbered list
    List,
    /// Table wrapper
    Table,
    /// Image wrapper
    Image,
    /// Chart wrapper
    Chart,
    /// Multi-column layout wrapper
    Layout,
    /// Table of contents
    Toc,
    /// Anything else the generators produce
    Other,
}

impl BlockKind {
    /// Classify a block from its root element
    pub fn classify(block: &str) -> Self {
        let Some(root) = markup::RootElement::parse(block) else {
            return BlockKind::Paragraph;
        };

        const WRAPPERS: [(&str, BlockKind); 5] = [
            ("table-wrapper", BlockKind::Table),
            ("chart-wrapper", BlockKind::Chart),
            ("image-wrapper", BlockKind::Image),
            ("layout-wrapper", BlockKind::Layout),
            ("toc-wrapper", BlockKind::Toc),
        ];
        if let Some((_, kind)) = WRAPPERS.iter().find(|(class, _)| root.has_class(class)) {
            return *kind;
        }

        let tag = root.name;
        match tag.as_str() {
            "p" | "blockquote" | "pre" => BlockKind::Paragraph,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => BlockKind::Heading {
                level: tag.as_bytes()[1] - b'0',
            },
            "ul" | "ol" => BlockKind::List,
            "table" => BlockKind::Table,
            "img" | "figure" => BlockKind::Image,
            _ => BlockKind::Other,
        }
    }

    /// Get the line height multiplier for this block kind
    pub fn line_height_multiplier(&self) -> f32 {
        match self {
            BlockKind::Heading { level } => match level {
                1 => 1.5,
                2 => 1.4,
                3 => 1.3,
                _ => 1.2,
            },
            _ => 1.0,
        }
    }

    /// Get the spacing after this block (in line heights)
    pub fn spacing_after(&self) -> f32 {
        match self {
            BlockKind::Paragraph => 1.0,
            BlockKind::Heading { .. } => 0.5,
            BlockKind::List => 0.25,
            _ => 0.5,
        }
    }

    /// Check if this is a heading
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading { .. })
    }

    /// Heading depth, if this is a heading
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            BlockKind::Heading { level } => Some(*level),
            _ => None,
        }
    }

    /// Check if this block is generated media rather than text
    pub fn is_embedded(&self) -> bool {
        matches!(
            self,
            BlockKind::Table | BlockKind::Image | BlockKind::Chart | BlockKind::Layout | BlockKind::Toc
        )
    }
}

/// An immediate child of a content surface.
///
/// Moved between surfaces as a whole; its markup is never split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    /// The kind of block
    pub kind: BlockKind,
    /// Serialized markup of the root element
    pub markup: String,
}

impl ContentBlock {
    /// Wrap markup, classifying it from its root element
    pub fn new(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        Self {
            kind: BlockKind::classify(&markup),
            markup,
        }
    }

    /// Create a paragraph block holding plain `text`
    pub fn paragraph(text: &str) -> Self {
        Self::new(format!("<p>{}</p>", markup::escape_text(text)))
    }

    /// Create a heading block holding plain `text`
    pub fn heading(level: u8, text: &str) -> Self {
        let level = level.clamp(1, 6);
        let text = markup::escape_text(text);
        Self::new(format!("<h{level}>{text}</h{level}>"))
    }

    /// Plain text of the block
    pub fn text(&self) -> String {
        markup::text_content(&self.markup)
    }

    /// Check if the block has no visible text and embeds nothing
    pub fn is_blank(&self) -> bool {
        !self.kind.is_embedded() && self.text().trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind() {
        assert!(!BlockKind::Paragraph.is_heading());
        assert_eq!(BlockKind::Heading { level: 3 }.heading_level(), Some(3));
        assert!(BlockKind::Chart.is_embedded());
        assert!(!BlockKind::List.is_embedded());
    }

    #[test]
    fn test_classify() {
        assert_eq!(BlockKind::classify("<h4 id=\"a\">x</h4>"), BlockKind::Heading { level: 4 });
        assert_eq!(BlockKind::classify("<p>x</p>"), BlockKind::Paragraph);
        assert_eq!(BlockKind::classify("bare text"), BlockKind::Paragraph);
        assert_eq!(
            BlockKind::classify("<div class=\"chart-wrapper\"><canvas></canvas></div>"),
            BlockKind::Chart
        );
        assert_eq!(
            BlockKind::classify("<div class=\"x table-wrapper\"><table></table></div>"),
            BlockKind::Table
        );
        assert_eq!(BlockKind::classify("<ol><li>a</li></ol>"), BlockKind::List);
        assert_eq!(BlockKind::classify("<section>a</section>"), BlockKind::Other);
    }

    #[test]
    fn test_blank() {
        assert!(ContentBlock::new("<p><br></p>").is_blank());
        assert!(ContentBlock::new("<p>&nbsp;</p>").is_blank());
        assert!(ContentBlock::new("<p>&#160;</p>").is_blank());
        assert!(!ContentBlock::paragraph("x").is_blank());
        assert!(!ContentBlock::new("<div class=\"image-wrapper\"><img src=\"a\"></div>").is_blank());
    }

    #[test]
    fn test_heading_clamps_level() {
        assert_eq!(ContentBlock::heading(9, "x").markup, "<h6>x</h6>");
    }

    #[test]
    fn test_constructors_escape_text() {
        let block = ContentBlock::paragraph("a < b & c > d");
        assert_eq!(block.markup, "<p>a &lt; b &amp; c &gt; d</p>");
        assert_eq!(block.text(), "a < b & c > d");

        let heading = ContentBlock::heading(2, "<script>x</script>");
        assert_eq!(heading.kind, BlockKind::Heading { level: 2 });
        assert_eq!(heading.text(), "<script>x</script>");
        assert_eq!(crate::document::Content::from_markup(&heading.markup).len(), 1);
    }
}
