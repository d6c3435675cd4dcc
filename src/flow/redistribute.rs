//! Moving overflow to continuation subpages

use crate::document::Content;
use crate::editing::{CaretPlacement, FocusRequest, SurfaceTarget};
use crate::error::{ReflowError, Result};
use crate::flow::{caret_at_end, Redistribution};
use crate::surface::{DocumentSink, SurfaceHost};
use crate::Reflow;

impl<H: SurfaceHost, S: DocumentSink> Reflow<H, S> {
    /// Move the trailing blocks of an overflowing surface to its continuation.
    ///
    /// The page overflows into subpage 0, subpage `i` into subpage `i + 1`.
    /// A missing continuation is created holding exactly the moved blocks; an
    /// existing one receives them in front of its own content. Unless
    /// `stay_on_source`, focus follows the moved content once the change is
    /// persisted. Returns whether anything moved.
    pub fn redistribute(&mut self, source: SurfaceTarget, stay_on_source: bool) -> bool {
        match self.try_redistribute(source, stay_on_source) {
            Ok(outcome) => outcome.moved(),
            Err(err) => {
                // Abandoned for this tick; the next check starts from fresh state
                log::warn!("redistribution from {} abandoned: {}", source, err);
                false
            }
        }
    }

    /// Like [`Reflow::redistribute`], reporting what happened
    pub fn try_redistribute(
        &mut self,
        source: SurfaceTarget,
        stay_on_source: bool,
    ) -> Result<Redistribution> {
        let Some(surface) = self.host.surface(source) else {
            return Ok(Redistribution::Unavailable);
        };

        let metrics = surface.metrics();
        if !self.detector.is_overflowing(Some(metrics)) {
            return Ok(Redistribution::Fits);
        }

        let heights = surface.block_heights();
        let mut staying = surface.content();
        if heights.len() != staying.len() {
            return Err(ReflowError::SurfaceUnavailable(format!(
                "{} measured {} blocks but holds {}",
                source,
                heights.len(),
                staying.len()
            )));
        }

        let Some(cut) = self.selector.select(&heights, metrics.client_height) else {
            log::debug!(
                "{} overflows by {} but has no safe cut",
                source,
                self.detector.overflow_amount(&metrics)
            );
            return Ok(Redistribution::NoCut);
        };

        let max_sub_pages = self.config.max_sub_pages;
        let page = self.template.page_mut(&self.page)?;
        let sub_count = page.sub_pages.len();
        if let Some(index) = source.index().filter(|&i| i >= sub_count) {
            return Err(ReflowError::StaleSubPage {
                index,
                len: sub_count,
            });
        }

        let target = source.next();
        let target_index = source.index().map_or(0, |i| i + 1);
        let created = target_index >= sub_count;
        if created && sub_count >= max_sub_pages {
            log::warn!(
                "page {} already has {} subpages, leaving overflow on {}",
                page.id,
                sub_count,
                source
            );
            return Ok(Redistribution::CapReached);
        }

        let moving = staying.split_off(cut);
        let blocks = moving.len();
        if let Some(content) = page.content_at_mut(source.index()) {
            *content = staying;
        }

        if created {
            let sub = page.continuation(moving);
            log::debug!("{} -> new {} ({}), {} blocks", source, target, sub.id, blocks);
            page.sub_pages.push(sub);
            self.normalize_tree();
        } else {
            log::debug!("{} -> existing {}, {} blocks prepended", source, target, blocks);
            page.sub_pages[target_index].content.prepend(moving);
        }

        if self.typed_overflow == Some(source) {
            self.typed_overflow = None;
        }
        self.persist(&[source, target]);
        if created {
            self.publish_tree();
        }
        self.resync();

        if !stay_on_source {
            let caret = if created {
                CaretPlacement::End
            } else {
                CaretPlacement::Start
            };
            self.focus.schedule(FocusRequest::new(target, caret), self.now_ms);
        }

        Ok(Redistribution::Moved {
            source,
            target,
            blocks,
            created,
        })
    }

    /// Typing overflow: open an empty continuation and move focus there.
    ///
    /// Runs only while the caret sits at the end of the overflowing surface;
    /// existing content is left where it is so partially typed text is not
    /// pulled away mid-keystroke.
    pub fn continue_typing(&mut self, source: SurfaceTarget) -> bool {
        match self.try_continue_typing(source) {
            Ok(opened) => opened,
            Err(err) => {
                log::warn!("typing continuation from {} abandoned: {}", source, err);
                false
            }
        }
    }

    fn try_continue_typing(&mut self, source: SurfaceTarget) -> Result<bool> {
        let Some(surface) = self.host.surface(source) else {
            return Ok(false);
        };
        if !self.detector.is_overflowing(Some(surface.metrics())) {
            return Ok(false);
        }
        let captured = surface.content();
        if !caret_at_end(&captured, surface.caret()) {
            return Ok(false);
        }

        let max_sub_pages = self.config.max_sub_pages;
        let page = self.template.page_mut(&self.page)?;
        let sub_count = page.sub_pages.len();
        if let Some(index) = source.index().filter(|&i| i >= sub_count) {
            return Err(ReflowError::StaleSubPage {
                index,
                len: sub_count,
            });
        }
        if sub_count >= max_sub_pages {
            log::warn!("page {} already has {} subpages", page.id, sub_count);
            return Ok(false);
        }

        if let Some(content) = page.content_at_mut(source.index()) {
            *content = captured;
        }
        let target = source.next();
        let target_index = source.index().map_or(0, |i| i + 1);
        let sub = page.continuation(Content::new());
        log::debug!("typing past the end of {}, opening {} ({})", source, target, sub.id);
        page.sub_pages.insert(target_index, sub);
        self.normalize_tree();
        self.typed_overflow = Some(source);

        self.persist(&[source, target]);
        self.publish_tree();
        self.resync();
        self.focus
            .schedule(FocusRequest::new(target, CaretPlacement::Start), self.now_ms);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::document::{Content, ContentBlock, Page, PageId, Template};
    use crate::editing::{Caret, CaretPlacement, SurfaceTarget};
    use crate::flow::Redistribution;
    use crate::layout::HeightEstimator;
    use crate::surface::{MemoryHost, MemorySink, SurfaceHost};
    use crate::{Reflow, ReflowConfig};

    fn block(name: &str, height: f32) -> ContentBlock {
        ContentBlock::new(format!("<p data-height=\"{}\">{}</p>", height, name))
    }

    fn engine(page: Page, config: ReflowConfig) -> Reflow<MemoryHost, MemorySink> {
        let id = page.id.clone();
        Reflow::new(
            Template::new(vec![page]),
            id,
            MemoryHost::new(HeightEstimator::default(), 350.0),
            MemorySink::new(),
            config,
        )
        .unwrap()
    }

    fn page_of(heights: &[f32]) -> Page {
        let blocks = heights
            .iter()
            .enumerate()
            .map(|(i, &h)| block(&format!("b{}", i), h))
            .collect::<Vec<_>>();
        Page::new("p", Content::from(blocks))
    }

    #[test]
    fn test_fits_is_noop() {
        let mut reflow = engine(page_of(&[100.0, 100.0]), ReflowConfig::default());
        assert_eq!(
            reflow.try_redistribute(SurfaceTarget::Page, false).unwrap(),
            Redistribution::Fits
        );
        assert!(reflow.sink().events.is_empty());
    }

    #[test]
    fn test_no_cut_leaves_overflow() {
        // A single block taller than the surface cannot be split
        let mut reflow = engine(page_of(&[500.0]), ReflowConfig::default());
        assert_eq!(
            reflow.try_redistribute(SurfaceTarget::Page, false).unwrap(),
            Redistribution::NoCut
        );
        assert!(reflow.active_page().unwrap().sub_pages.is_empty());
    }

    #[test]
    fn test_unavailable_source() {
        let mut reflow = engine(page_of(&[100.0; 5]), ReflowConfig::default());
        reflow.host_mut().unmount(SurfaceTarget::Page);
        assert!(!reflow.redistribute(SurfaceTarget::Page, false));
        assert!(!reflow.redistribute(SurfaceTarget::SubPage(4), false));
    }

    #[test]
    fn test_subpage_overflows_into_next() {
        let mut page = page_of(&[100.0]);
        let sub = page.continuation(Content::from(
            (0..4).map(|i| block(&format!("s{}", i), 100.0)).collect::<Vec<_>>(),
        ));
        page.sub_pages.push(sub);
        let mut reflow = engine(page, ReflowConfig::default());

        let outcome = reflow.try_redistribute(SurfaceTarget::SubPage(0), true).unwrap();
        assert_eq!(
            outcome,
            Redistribution::Moved {
                source: SurfaceTarget::SubPage(0),
                target: SurfaceTarget::SubPage(1),
                blocks: 1,
                created: true,
            }
        );
        let page = reflow.active_page().unwrap();
        assert_eq!(page.sub_pages[1].content.blocks()[0].text(), "s3");
        assert_eq!(page.sub_pages[1].order, 3);
        // Stayed on source: nothing scheduled
        assert_eq!(reflow.pending_focus(), None);
    }

    #[test]
    fn test_cap_declines_new_subpage() {
        let config = ReflowConfig {
            max_sub_pages: 0,
            ..ReflowConfig::default()
        };
        let mut reflow = engine(page_of(&[100.0; 5]), config);
        assert_eq!(
            reflow.try_redistribute(SurfaceTarget::Page, false).unwrap(),
            Redistribution::CapReached
        );
        assert_eq!(reflow.active_page().unwrap().content.len(), 5);
    }

    #[test]
    fn test_typing_opens_empty_continuation() {
        let mut reflow = engine(page_of(&[100.0; 4]), ReflowConfig::default());
        reflow.host_mut().focus(SurfaceTarget::Page, CaretPlacement::End);

        assert!(reflow.continue_typing(SurfaceTarget::Page));
        let page = reflow.active_page().unwrap();
        assert_eq!(page.content.len(), 4);
        assert_eq!(page.sub_pages.len(), 1);
        assert!(page.sub_pages[0].content.is_empty());
        assert_eq!(
            reflow.pending_focus().map(|f| f.target),
            Some(SurfaceTarget::SubPage(0))
        );
        assert_eq!(reflow.sink().template_updates(), 1);
    }

    #[test]
    fn test_typing_requires_caret_at_end() {
        let mut reflow = engine(page_of(&[100.0; 4]), ReflowConfig::default());
        reflow.host_mut().place_caret(SurfaceTarget::Page, Caret::new(1, 1));
        assert!(!reflow.continue_typing(SurfaceTarget::Page));
        assert!(reflow.active_page().unwrap().sub_pages.is_empty());
    }

    #[test]
    fn test_typing_inserts_before_existing_continuation() {
        let mut page = page_of(&[100.0; 4]);
        let sub = page.continuation(Content::from(vec![block("later", 10.0)]));
        page.sub_pages.push(sub);
        let mut reflow = engine(page, ReflowConfig::default());
        reflow.host_mut().focus(SurfaceTarget::Page, CaretPlacement::End);

        assert!(reflow.continue_typing(SurfaceTarget::Page));
        let page = reflow.active_page().unwrap();
        assert!(page.sub_pages[0].content.is_empty());
        assert_eq!(page.sub_pages[1].content.text(), "later");
        assert_eq!(page.sub_pages[1].order, 3);
        assert_eq!(page.id, PageId("p".to_string()));
    }
}
