//! Removing an emptied continuation subpage

use crate::editing::{CaretPlacement, FocusRequest, SurfaceTarget};
use crate::error::{ReflowError, Result};
use crate::surface::{DocumentSink, SurfaceHost};
use crate::Reflow;

impl<H: SurfaceHost, S: DocumentSink> Reflow<H, S> {
    /// Delete backward from the very start of an empty subpage.
    ///
    /// Both the live content must be blank and the caret must sit at the
    /// first text position; otherwise nothing happens and the default
    /// backspace should proceed. On success focus moves to the predecessor
    /// with the caret at its end.
    pub fn delete_sub_page(&mut self, index: usize) -> bool {
        match self.try_delete_sub_page(index) {
            Ok(deleted) => deleted,
            Err(err) => {
                log::warn!("deleting subpage {} abandoned: {}", index, err);
                false
            }
        }
    }

    fn try_delete_sub_page(&mut self, index: usize) -> Result<bool> {
        let target = SurfaceTarget::SubPage(index);
        let Some(surface) = self.host.surface(target) else {
            return Ok(false);
        };

        let content = surface.content();
        let at_start = surface.caret().is_some_and(|caret| caret.is_at_start());
        if !content.is_blank() || !at_start {
            log::debug!(
                "keeping {}: blank {}, caret at start {}",
                target,
                content.is_blank(),
                at_start
            );
            return Ok(false);
        }

        let page = self.template.page_mut(&self.page)?;
        if index >= page.sub_pages.len() {
            return Err(ReflowError::StaleSubPage {
                index,
                len: page.sub_pages.len(),
            });
        }
        let removed = page.sub_pages.remove(index);
        log::debug!("removed empty {} ({}) from page {}", target, removed.id, page.id);
        self.typed_overflow = match self.typed_overflow {
            Some(SurfaceTarget::SubPage(held)) if held == index => None,
            Some(SurfaceTarget::SubPage(held)) if held > index => Some(SurfaceTarget::SubPage(held - 1)),
            held => held,
        };
        self.normalize_tree();

        self.persist(&[target]);
        self.publish_tree();
        self.resync();

        let previous = target.previous().unwrap_or(SurfaceTarget::Page);
        self.focus
            .schedule(FocusRequest::new(previous, CaretPlacement::End), self.now_ms);

        Ok(true)
    }
}
