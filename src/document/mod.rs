//! Page tree: template, pages, subpages and their content blocks

mod block;
mod content;
pub mod markup;
mod page;

pub use block::{BlockKind, ContentBlock};
pub use content::Content;
pub use page::{Page, PageId, PageUpdate, SubPage, SubPageId};

use crate::error::{ReflowError, Result};
use serde::{Deserialize, Serialize};

/// The whole document: an ordered list of pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub pages: Vec<Page>,
    /// Document-wide heading numbering switch
    #[serde(default)]
    pub heading_numbering: bool,
}

impl Template {
    /// Create a template from pages, assigning dense orders
    pub fn new(pages: Vec<Page>) -> Self {
        let mut template = Self {
            pages,
            heading_numbering: false,
        };
        template.recalculate_order();
        template
    }

    /// Parse a template from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Find a page index by id
    pub fn page_index(&self, id: &PageId) -> Result<usize> {
        self.pages
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| ReflowError::PageNotFound(id.0.clone()))
    }

    /// Get a page by id
    pub fn page(&self, id: &PageId) -> Result<&Page> {
        Ok(&self.pages[self.page_index(id)?])
    }

    /// Get a mutable page by id
    pub fn page_mut(&mut self, id: &PageId) -> Result<&mut Page> {
        let index = self.page_index(id)?;
        Ok(&mut self.pages[index])
    }

    /// Reassign dense orders in document order
    pub fn recalculate_order(&mut self) {
        self.pages = crate::layout::recalculate(&self.pages);
    }

    /// Total number of pages plus subpages
    pub fn surface_count(&self) -> usize {
        self.pages.iter().map(Page::surface_count).sum()
    }
}
