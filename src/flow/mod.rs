//! Content redistribution between a page and its continuation subpages

mod deletion;
mod redistribute;

use crate::document::{Content, PageUpdate};
use crate::editing::{Caret, SurfaceTarget};
use crate::layout::renumber_template;
use crate::surface::{DocumentSink, SurfaceHost};
use crate::Reflow;
use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

/// What a redistribution attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redistribution {
    /// The source surface is not mounted
    Unavailable,
    /// The source fits (within tolerance)
    Fits,
    /// No safe cut point; the overflow stays in place
    NoCut,
    /// A new subpage would exceed the per-page cap
    CapReached,
    /// Blocks moved from `source` to `target`
    Moved {
        source: SurfaceTarget,
        target: SurfaceTarget,
        blocks: usize,
        created: bool,
    },
}

impl Redistribution {
    /// Check if any content moved
    pub fn moved(&self) -> bool {
        matches!(self, Redistribution::Moved { .. })
    }
}

/// Check if the caret sits at (or past) the end of the surface's text
pub fn caret_at_end(content: &Content, caret: Option<Caret>) -> bool {
    let Some(caret) = caret else {
        return false;
    };
    caret.text_offset >= content.text().graphemes(true).count()
}

impl<H: SurfaceHost, S: DocumentSink> Reflow<H, S> {
    /// Reassign orders and, when enabled, heading numbers
    pub(crate) fn normalize_tree(&mut self) {
        self.template.recalculate_order();
        if self.template.heading_numbering {
            renumber_template(&mut self.template);
        }
    }

    /// Hand the touched fields of the active page to the sink
    pub(crate) fn persist(&mut self, touched: &[SurfaceTarget]) {
        let Ok(page) = self.template.page(&self.page) else {
            return;
        };

        let mut updates: SmallVec<[PageUpdate; 2]> = SmallVec::new();
        if touched.contains(&SurfaceTarget::Page) {
            updates.push(PageUpdate::Content(page.content.clone()));
        }
        if touched.iter().any(|t| t.index().is_some()) {
            updates.push(PageUpdate::SubPages(page.sub_pages.clone()));
        }

        for update in updates {
            self.sink.update_page(&self.page, update);
        }
    }

    /// Hand the whole tree to the sink
    pub(crate) fn publish_tree(&mut self) {
        self.sink.update_template(&self.template);
    }

    /// Re-render the active page's surfaces
    pub(crate) fn resync(&mut self) {
        if let Ok(page) = self.template.page(&self.page) {
            self.host.sync(page);
        }
    }

    /// Check surfaces in document order and act on the first overflowing one
    /// that can be split.
    ///
    /// `typing` names the surface that just received keystrokes; if it is the
    /// one overflowing and its caret is at the end, the lighter typing
    /// variant runs instead of moving blocks. A surface that variant already
    /// left overflowing is passed over. At most one surface changes.
    pub(crate) fn check_surfaces(&mut self, typing: Option<SurfaceTarget>) -> Option<SurfaceTarget> {
        let count = self.template.page(&self.page).ok()?.surface_count();

        for position in 0..count {
            let target = SurfaceTarget::at_position(position);
            let metrics = self.host.surface(target).map(|s| s.metrics());
            if !self.detector.is_overflowing(metrics) {
                continue;
            }
            if self.typed_overflow == Some(target) {
                log::trace!("{} still overflows behind its typing continuation", target);
                continue;
            }

            if (typing == Some(target) && self.continue_typing(target))
                || self.redistribute(target, false)
            {
                return Some(target);
            }
        }

        None
    }
}
