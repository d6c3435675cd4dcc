//! Boundary contracts with the rendering layer and the persistence layer
//!
//! The engine never owns live surfaces or the canonical page tree. It reads
//! measurements through [`ContentSurface`], resolves surfaces through
//! [`SurfaceHost`], and hands every committed change to a [`DocumentSink`].

mod memory;

pub use memory::{MemoryHost, MemorySink, MemorySurface, SinkEvent};

use crate::document::{Content, Page, PageId, PageUpdate, Template};
use crate::editing::{Caret, CaretPlacement, SurfaceTarget};

/// Extents of a surface along the block axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceMetrics {
    /// Full (scrollable) content extent
    pub scroll_height: f32,
    /// Visible (clipped) extent
    pub client_height: f32,
}

impl SurfaceMetrics {
    pub fn new(scroll_height: f32, client_height: f32) -> Self {
        Self {
            scroll_height,
            client_height,
        }
    }
}

/// The live, editable rendering of one page or subpage
pub trait ContentSurface {
    /// Current extents; implementations flush pending layout first
    fn metrics(&self) -> SurfaceMetrics;

    /// Rendered height of each block child, in order
    fn block_heights(&self) -> Vec<f32>;

    /// Capture the block children as content
    fn content(&self) -> Content;

    /// Replace the block children
    fn set_content(&mut self, content: &Content);

    /// Caret position, if the caret is inside this surface
    fn caret(&self) -> Option<Caret>;

    /// Take editing focus and place the caret
    fn focus(&mut self, placement: CaretPlacement);
}

/// Resolves the live surface for a target of the active page
pub trait SurfaceHost {
    /// `None` when the surface is not mounted
    fn surface(&self, target: SurfaceTarget) -> Option<&dyn ContentSurface>;

    /// Mutable access; `None` when the surface is not mounted
    fn surface_mut(&mut self, target: SurfaceTarget) -> Option<&mut dyn ContentSurface>;

    /// Re-render the page's surfaces after its tree changed
    fn sync(&mut self, page: &Page);

    /// Move editing focus to a surface; `false` when it is not mounted
    fn focus(&mut self, target: SurfaceTarget, placement: CaretPlacement) -> bool {
        match self.surface_mut(target) {
            Some(surface) => {
                surface.focus(placement);
                true
            }
            None => false,
        }
    }
}

/// Persistence callbacks of the document aggregate
pub trait DocumentSink {
    /// Persist a page's `content` or `subPages` field
    fn update_page(&mut self, page: &PageId, update: PageUpdate);

    /// Persist a whole page-tree replacement
    fn update_template(&mut self, template: &Template);
}

/// A sink that drops every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DocumentSink for NullSink {
    fn update_page(&mut self, _page: &PageId, _update: PageUpdate) {}

    fn update_template(&mut self, _template: &Template) {}
}
