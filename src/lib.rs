//! Page Reflow: overflow redistribution for paged template editors
//!
//! This crate keeps a multi-page document's content inside fixed-height
//! pages:
//! - Overflow detection over live surface measurements
//! - Block-level cut-point selection
//! - Redistribution into continuation subpages (created, reused, deleted)
//! - Dense page ordering and hierarchical heading numbers

pub mod config;
pub mod document;
pub mod editing;
pub mod error;
pub mod flow;
pub mod layout;
pub mod surface;
pub mod wasm;
pub mod watch;

pub use config::ReflowConfig;
pub use document::{BlockKind, Content, ContentBlock, Page, PageId, PageUpdate, SubPage, Template};
pub use editing::{Caret, CaretPlacement, Command, CommandOutcome, FocusRequest, Operation, SurfaceTarget};
pub use error::{ReflowError, Result};
pub use flow::Redistribution;
pub use layout::{BlockMeasure, CutPointSelector, HeightEstimator, OverflowDetector};
pub use surface::{ContentSurface, DocumentSink, MemoryHost, NullSink, SurfaceHost, SurfaceMetrics};
pub use watch::{MutationEvent, MutationKind, MutationWatcher};

use layout::renumber_template;
use watch::{FocusQueue, PendingCheck};

/// What one [`Reflow::tick`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// A debounced check ran
    pub checked: bool,
    /// Surface whose overflow was handled
    pub redistributed: Option<SurfaceTarget>,
    /// Focus transfer released to the host
    pub focused: Option<FocusRequest>,
}

/// The reflow engine for one document, editing one page at a time.
///
/// Owns the working copy of the page tree. Live surfaces are reached through
/// the host, committed changes leave through the sink.
pub struct Reflow<H: SurfaceHost, S: DocumentSink> {
    pub(crate) template: Template,
    pub(crate) page: PageId,
    pub(crate) host: H,
    pub(crate) sink: S,
    pub(crate) config: ReflowConfig,
    pub(crate) detector: OverflowDetector,
    pub(crate) selector: CutPointSelector,
    pub(crate) watcher: MutationWatcher,
    pub(crate) focus: FocusQueue,
    pub(crate) now_ms: u64,
    /// Surface the typing continuation left overflowing; checks pass over it
    /// until it is edited again
    pub(crate) typed_overflow: Option<SurfaceTarget>,
    last_focus: Option<FocusRequest>,
}

impl<H: SurfaceHost, S: DocumentSink> Reflow<H, S> {
    /// Create an engine editing `page`; orders are normalized and the host
    /// is synced with the page's surfaces
    pub fn new(template: Template, page: PageId, host: H, sink: S, config: ReflowConfig) -> Result<Self> {
        template.page(&page)?;

        let mut reflow = Self {
            template,
            page,
            host,
            sink,
            detector: OverflowDetector::new(config.overflow_tolerance),
            selector: CutPointSelector {
                safety_margin: config.safety_margin,
                large_block_ratio: config.large_block_ratio,
                fallback_position: config.fallback_position,
            },
            watcher: MutationWatcher::new(config.text_debounce_ms, config.structural_debounce_ms),
            focus: FocusQueue::new(config.focus_delay_ms),
            config,
            now_ms: 0,
            typed_overflow: None,
            last_focus: None,
        };
        reflow.normalize_tree();
        reflow.resync();
        Ok(reflow)
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn into_template(self) -> Template {
        self.template
    }

    /// The page being edited
    pub fn active_page(&self) -> Result<&Page> {
        self.template.page(&self.page)
    }

    pub fn active_page_id(&self) -> &PageId {
        &self.page
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn config(&self) -> &ReflowConfig {
        &self.config
    }

    /// Switch editing to another page, dropping scheduled work of the old one
    pub fn set_active_page(&mut self, page: PageId) -> Result<()> {
        self.template.page(&page)?;
        if page != self.page {
            log::debug!("editing page {} (was {})", page, self.page);
            self.watcher.cancel();
            self.typed_overflow = None;
            self.page = page;
            self.resync();
        }
        Ok(())
    }

    /// Record a change reported by a surface.
    ///
    /// The surface's blocks are captured into the tree and persisted at once;
    /// the overflow check waits for the debounce.
    pub fn on_mutation(&mut self, event: MutationEvent, now_ms: u64) {
        self.now_ms = now_ms;
        self.release(event.target);
        if self.capture(event.target) {
            self.persist(&[event.target]);
        }
        self.watcher.notice(event, now_ms);
    }

    /// Advance time: run a due check, then release a due focus transfer
    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        self.now_ms = now_ms;
        let mut report = TickReport::default();

        if let Some(check) = self.watcher.poll(now_ms) {
            report.checked = true;
            report.redistributed = self.run_check(Some(check));
        }

        if let Some(request) = self.focus.poll(now_ms) {
            if self.host.focus(request.target, request.caret) {
                log::debug!("focus -> {} ({:?})", request.target, request.caret);
                self.last_focus = Some(request);
                report.focused = Some(request);
            } else {
                log::debug!("focus target {} is not mounted", request.target);
            }
        }

        report
    }

    /// Schedule a check on the slow path, as after a programmatic insert
    pub fn request_check(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
        self.watcher.notice(MutationEvent::structural(SurfaceTarget::Page), now_ms);
    }

    /// Check and redistribute now, skipping the debounce
    pub fn force_check(&mut self, now_ms: u64) -> Option<SurfaceTarget> {
        self.now_ms = now_ms;
        self.watcher.cancel();
        self.run_check(None)
    }

    /// Resolve a user action against its target surface
    pub fn execute(&mut self, command: Command, now_ms: u64) -> CommandOutcome {
        self.now_ms = now_ms;
        let target = command.target;

        match command.operation {
            Operation::InsertBlocks { at, blocks } => {
                let Some(surface) = self.host.surface_mut(target) else {
                    return CommandOutcome::Unavailable;
                };
                let mut content = surface.content();
                content.insert_blocks(at.unwrap_or(content.len()), blocks);
                surface.set_content(&content);

                self.release(target);
                if self.capture(target) {
                    self.persist(&[target]);
                }
                self.force_check(now_ms);
                CommandOutcome::Applied
            }
            Operation::DeleteBackward => {
                if self.host.surface(target).is_none() {
                    return CommandOutcome::Unavailable;
                }
                match target.index() {
                    Some(index) if self.delete_sub_page(index) => CommandOutcome::Applied,
                    _ => CommandOutcome::Default,
                }
            }
            Operation::SetNumbering(enabled) => {
                self.set_numbering(enabled);
                CommandOutcome::Applied
            }
        }
    }

    /// Switch document-wide heading numbering, renumbering or stripping
    /// every heading
    pub fn set_numbering(&mut self, enabled: bool) {
        self.template.heading_numbering = enabled;
        renumber_template(&mut self.template);
        log::debug!("heading numbering {}", if enabled { "on" } else { "off" });

        self.persist_active_page();
        self.publish_tree();
        self.resync();
    }

    /// Force checks until no surface of the active page can be split further.
    ///
    /// Returns the number of redistributions.
    pub fn settle(&mut self, now_ms: u64) -> usize {
        let limit = self.config.max_sub_pages + self.active_page().map_or(1, Page::surface_count);
        self.typed_overflow = None;
        let mut passes = 0;
        while passes < limit && self.force_check(now_ms).is_some() {
            passes += 1;
        }
        self.watcher.cancel();
        passes
    }

    /// Check scheduled for a later tick
    pub fn pending_check(&self) -> Option<PendingCheck> {
        self.watcher.pending()
    }

    /// Focus transfer waiting for its delay
    pub fn pending_focus(&self) -> Option<FocusRequest> {
        self.focus.pending()
    }

    /// Last focus transfer handed to the host
    pub fn last_focus(&self) -> Option<FocusRequest> {
        self.last_focus
    }

    /// Copy a surface's live blocks into the tree; `true` if they changed
    fn capture(&mut self, target: SurfaceTarget) -> bool {
        let Some(surface) = self.host.surface(target) else {
            return false;
        };
        let content = surface.content();
        let Ok(page) = self.template.page_mut(&self.page) else {
            return false;
        };
        match page.content_at_mut(target.index()) {
            Some(slot) if *slot != content => {
                *slot = content;
                true
            }
            _ => false,
        }
    }

    /// Let checks act on a surface the typing continuation left alone
    fn release(&mut self, target: SurfaceTarget) {
        if self.typed_overflow == Some(target) {
            log::trace!("{} edited again, overflow checks resume", target);
            self.typed_overflow = None;
        }
    }

    /// Persist the page content and every subpage
    fn persist_active_page(&mut self) {
        let Ok(page) = self.active_page() else {
            return;
        };
        let touched: Vec<SurfaceTarget> = (0..page.surface_count())
            .map(SurfaceTarget::at_position)
            .collect();
        self.persist(&touched);
    }

    /// Renumber if headings moved or changed, then handle overflow
    fn run_check(&mut self, check: Option<PendingCheck>) -> Option<SurfaceTarget> {
        if self.template.heading_numbering {
            let before = self.template.clone();
            renumber_template(&mut self.template);
            if self.template != before {
                self.persist_active_page();
                self.publish_tree();
                self.resync();
            }
        }

        let typing = check
            .filter(|c| c.kind == MutationKind::Text)
            .map(|c| c.source);
        let handled = self.check_surfaces(typing)?;

        // Whatever still overflows after a move is picked up by the next
        // check; a typing continuation moved nothing and needs none
        if self.typed_overflow != Some(handled) {
            self.watcher
                .notice(MutationEvent::structural(handled.next()), self.now_ms);
        }
        Some(handled)
    }
}

/// Reflow every page of a template headlessly.
///
/// Block heights come from `measure`; every surface is `client_height` tall.
pub fn reflow_template(
    template: Template,
    config: ReflowConfig,
    measure: impl BlockMeasure + 'static,
    client_height: f32,
) -> Result<Template> {
    let ids: Vec<PageId> = template.pages.iter().map(|p| p.id.clone()).collect();
    let Some(first) = ids.first().cloned() else {
        let mut template = template;
        template.recalculate_order();
        return Ok(template);
    };

    let host = MemoryHost::new(measure, client_height);
    let mut reflow = Reflow::new(template, first, host, NullSink, config)?;
    for id in ids {
        reflow.set_active_page(id)?;
        let passes = reflow.settle(0);
        if passes > 0 {
            log::debug!("page {}: {} redistributions", reflow.active_page_id(), passes);
        }
    }
    Ok(reflow.into_template())
}
