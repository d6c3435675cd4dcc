//! Pages and their continuation subpages

use crate::document::Content;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque page identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub String);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        PageId(id.to_string())
    }
}

/// Opaque subpage identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubPageId(pub String);

impl fmt::Display for SubPageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A top-level document page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    /// Dense 1-based position across pages and subpages
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub sub_pages: Vec<SubPage>,
    #[serde(default = "default_true")]
    pub show_header: bool,
    #[serde(default = "default_true")]
    pub show_footer: bool,
    #[serde(default = "default_true")]
    pub show_page_number: bool,
}

/// Continuation of a page's content that did not fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubPage {
    pub id: SubPageId,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub content: Content,
    #[serde(default = "default_true")]
    pub show_header: bool,
    #[serde(default = "default_true")]
    pub show_footer: bool,
    #[serde(default = "default_true")]
    pub show_page_number: bool,
    /// Free-floating overlay elements, opaque to the engine
    #[serde(default)]
    pub design_elements: Vec<serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl Page {
    /// Create a page with content and all display flags on
    pub fn new(id: impl Into<String>, content: Content) -> Self {
        Self {
            id: PageId(id.into()),
            order: 0,
            content,
            sub_pages: Vec::new(),
            show_header: true,
            show_footer: true,
            show_page_number: true,
        }
    }

    /// Create a continuation of this page holding `content`.
    ///
    /// Display flags are inherited; the id is one past the largest
    /// `<page>-sub-<n>` suffix in use.
    pub fn continuation(&self, content: Content) -> SubPage {
        let prefix = format!("{}-sub-", self.id);
        let next = self
            .sub_pages
            .iter()
            .filter_map(|sub| sub.id.0.strip_prefix(&prefix)?.parse::<u64>().ok())
            .max()
            .map_or(1, |n| n + 1);

        SubPage {
            id: SubPageId(format!("{}{}", prefix, next)),
            order: 0,
            content,
            show_header: self.show_header,
            show_footer: self.show_footer,
            show_page_number: self.show_page_number,
            design_elements: Vec::new(),
        }
    }

    /// Content of the page itself or one of its subpages
    pub fn content_at(&self, index: Option<usize>) -> Option<&Content> {
        match index {
            None => Some(&self.content),
            Some(i) => self.sub_pages.get(i).map(|sub| &sub.content),
        }
    }

    /// Mutable content of the page itself or one of its subpages
    pub fn content_at_mut(&mut self, index: Option<usize>) -> Option<&mut Content> {
        match index {
            None => Some(&mut self.content),
            Some(i) => self.sub_pages.get_mut(i).map(|sub| &mut sub.content),
        }
    }

    /// Order number of the page itself or one of its subpages
    pub fn order_at(&self, index: Option<usize>) -> Option<u32> {
        match index {
            None => Some(self.order),
            Some(i) => self.sub_pages.get(i).map(|sub| sub.order),
        }
    }

    /// Number of surfaces (the page plus its subpages)
    pub fn surface_count(&self) -> usize {
        1 + self.sub_pages.len()
    }
}

/// A partial page update handed to the persistence layer
#[derive(Debug, Clone, PartialEq)]
pub enum PageUpdate {
    /// The page's own content changed
    Content(Content),
    /// The subpage list changed (content or shape)
    SubPages(Vec<SubPage>),
}
