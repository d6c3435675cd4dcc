//! Ordered block lists and their markup form

use crate::document::{markup, ContentBlock};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The serialized content of a page or subpage as an ordered block list.
///
/// Persisted as one markup string; in memory it is a plain sequence so that
/// redistribution produces new sequences instead of splicing a live tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct Content {
    blocks: Vec<ContentBlock>,
}

impl Content {
    /// Create empty content
    pub fn new() -> Self {
        Self::default()
    }

    /// Split markup into blocks.
    ///
    /// Parsing is lenient: unclosed elements are closed and stray end tags
    /// dropped, so every string yields some block list.
    pub fn from_markup(source: &str) -> Self {
        let blocks = markup::split_top_level(source)
            .into_iter()
            .map(ContentBlock::new)
            .collect();
        Self { blocks }
    }

    /// Serialize back to markup
    pub fn to_markup(&self) -> String {
        self.blocks.iter().map(|b| b.markup.as_str()).collect()
    }

    /// Get the blocks
    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    /// Get mutable access to the blocks
    pub fn blocks_mut(&mut self) -> &mut Vec<ContentBlock> {
        &mut self.blocks
    }

    /// Consume into the block list
    pub fn into_blocks(self) -> Vec<ContentBlock> {
        self.blocks
    }

    /// Get block count
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if there are no blocks at all
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Check if nothing visible remains (no text, no embedded elements)
    pub fn is_blank(&self) -> bool {
        self.blocks.iter().all(ContentBlock::is_blank)
    }

    /// Plain text of all blocks
    pub fn text(&self) -> String {
        self.blocks.iter().map(ContentBlock::text).collect()
    }

    /// Split at `at`: `self` keeps `[0, at)`, the returned content holds the rest
    pub fn split_off(&mut self, at: usize) -> Content {
        Content {
            blocks: self.blocks.split_off(at),
        }
    }

    /// Put `other` in front of the existing blocks
    pub fn prepend(&mut self, other: Content) {
        let mut blocks = other.blocks;
        blocks.append(&mut self.blocks);
        self.blocks = blocks;
    }

    /// Append `other` after the existing blocks
    pub fn append(&mut self, mut other: Content) {
        self.blocks.append(&mut other.blocks);
    }

    /// Insert blocks at an index, clamped to the end
    pub fn insert_blocks(&mut self, at: usize, blocks: Vec<ContentBlock>) {
        let at = at.min(self.blocks.len());
        self.blocks.splice(at..at, blocks);
    }
}

impl From<Vec<ContentBlock>> for Content {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        Self { blocks }
    }
}

impl From<Content> for String {
    fn from(content: Content) -> Self {
        content.to_markup()
    }
}

impl From<String> for Content {
    fn from(source: String) -> Self {
        Content::from_markup(&source)
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            f.write_str(&block.markup)?;
        }
        Ok(())
    }
}
