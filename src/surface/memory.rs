//! In-memory surfaces for headless reflow and tests

use crate::document::{Content, Page, PageId, PageUpdate, Template};
use crate::editing::{Caret, CaretPlacement, SurfaceTarget};
use crate::layout::BlockMeasure;
use crate::surface::{ContentSurface, DocumentSink, SurfaceHost, SurfaceMetrics};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

/// A surface whose block heights come from a [`BlockMeasure`]
pub struct MemorySurface {
    content: Content,
    heights: Vec<f32>,
    client_height: f32,
    caret: Option<Caret>,
    measure: Rc<dyn BlockMeasure>,
}

impl fmt::Debug for MemorySurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySurface")
            .field("blocks", &self.content.len())
            .field("heights", &self.heights)
            .field("client_height", &self.client_height)
            .field("caret", &self.caret)
            .finish()
    }
}

impl MemorySurface {
    /// Create a surface and measure its blocks
    pub fn new(content: Content, client_height: f32, measure: Rc<dyn BlockMeasure>) -> Self {
        let heights = content.blocks().iter().map(|b| measure.measure(b)).collect();
        Self {
            content,
            heights,
            client_height,
            caret: None,
            measure,
        }
    }

    /// Move the caret (or remove it with `None`)
    pub fn set_caret(&mut self, caret: Option<Caret>) {
        self.caret = caret;
    }

    /// Apply an edit to the blocks and remeasure
    pub fn edit(&mut self, f: impl FnOnce(&mut Content)) {
        let mut content = self.content.clone();
        f(&mut content);
        self.set_content(&content);
    }

    /// Caret at the end of the surface's text
    fn end_caret(&self) -> Caret {
        let total = self.content.text().graphemes(true).count();
        let last = self
            .content
            .blocks()
            .last()
            .map_or(0, |b| b.text().graphemes(true).count());
        Caret::new(total, last)
    }
}

impl ContentSurface for MemorySurface {
    fn metrics(&self) -> SurfaceMetrics {
        let used: f32 = self.heights.iter().sum();
        SurfaceMetrics::new(used.max(self.client_height), self.client_height)
    }

    fn block_heights(&self) -> Vec<f32> {
        self.heights.clone()
    }

    fn content(&self) -> Content {
        self.content.clone()
    }

    fn set_content(&mut self, content: &Content) {
        self.heights = content.blocks().iter().map(|b| self.measure.measure(b)).collect();
        self.content = content.clone();
    }

    fn caret(&self) -> Option<Caret> {
        self.caret
    }

    fn focus(&mut self, placement: CaretPlacement) {
        self.caret = Some(match placement {
            CaretPlacement::Start => Caret::default(),
            CaretPlacement::End => self.end_caret(),
        });
    }
}

/// Mounts one [`MemorySurface`] per page/subpage of the active page
pub struct MemoryHost {
    measure: Rc<dyn BlockMeasure>,
    client_height: f32,
    surfaces: FxHashMap<SurfaceTarget, MemorySurface>,
    unmounted: FxHashSet<SurfaceTarget>,
}

impl MemoryHost {
    /// Create a host with a fixed visible height per surface
    pub fn new(measure: impl BlockMeasure + 'static, client_height: f32) -> Self {
        Self {
            measure: Rc::new(measure),
            client_height,
            surfaces: FxHashMap::default(),
            unmounted: FxHashSet::default(),
        }
    }

    /// Concrete surface access
    pub fn memory_surface(&self, target: SurfaceTarget) -> Option<&MemorySurface> {
        self.surfaces.get(&target)
    }

    /// Concrete mutable surface access
    pub fn memory_surface_mut(&mut self, target: SurfaceTarget) -> Option<&mut MemorySurface> {
        self.surfaces.get_mut(&target)
    }

    /// Put the caret into one surface, clearing it everywhere else
    pub fn place_caret(&mut self, target: SurfaceTarget, caret: Caret) {
        for (t, surface) in self.surfaces.iter_mut() {
            surface.set_caret((*t == target).then_some(caret));
        }
    }

    /// Surface currently holding the caret
    pub fn focused(&self) -> Option<SurfaceTarget> {
        self.surfaces
            .iter()
            .find(|(_, s)| s.caret.is_some())
            .map(|(t, _)| *t)
    }

    /// Keep a surface unmounted across syncs
    pub fn unmount(&mut self, target: SurfaceTarget) {
        self.surfaces.remove(&target);
        self.unmounted.insert(target);
    }

    /// Allow a surface to mount again on the next sync
    pub fn remount(&mut self, target: SurfaceTarget) {
        self.unmounted.remove(&target);
    }

    /// Number of mounted surfaces
    pub fn mounted(&self) -> usize {
        self.surfaces.len()
    }
}

impl SurfaceHost for MemoryHost {
    fn surface(&self, target: SurfaceTarget) -> Option<&dyn ContentSurface> {
        self.surfaces.get(&target).map(|s| s as &dyn ContentSurface)
    }

    fn surface_mut(&mut self, target: SurfaceTarget) -> Option<&mut dyn ContentSurface> {
        self.surfaces
            .get_mut(&target)
            .map(|s| s as &mut dyn ContentSurface)
    }

    fn sync(&mut self, page: &Page) {
        let count = page.surface_count();
        self.surfaces.retain(|target, _| target.position() < count);

        for position in 0..count {
            let target = SurfaceTarget::at_position(position);
            if self.unmounted.contains(&target) {
                continue;
            }
            let Some(content) = page.content_at(target.index()) else {
                continue;
            };
            match self.surfaces.get_mut(&target) {
                Some(surface) if surface.content == *content => {}
                Some(surface) => surface.set_content(content),
                None => {
                    let surface =
                        MemorySurface::new(content.clone(), self.client_height, Rc::clone(&self.measure));
                    self.surfaces.insert(target, surface);
                }
            }
        }
    }

    fn focus(&mut self, target: SurfaceTarget, placement: CaretPlacement) -> bool {
        if !self.surfaces.contains_key(&target) {
            return false;
        }
        for (t, surface) in self.surfaces.iter_mut() {
            if *t == target {
                surface.focus(placement);
            } else {
                surface.set_caret(None);
            }
        }
        true
    }
}

/// One persisted change
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Page(PageId, PageUpdate),
    Template,
}

/// A sink that records every update and keeps the last persisted tree
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<SinkEvent>,
    pub last_template: Option<Template>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of whole-tree updates received
    pub fn template_updates(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, SinkEvent::Template)).count()
    }
}

impl DocumentSink for MemorySink {
    fn update_page(&mut self, page: &PageId, update: PageUpdate) {
        self.events.push(SinkEvent::Page(page.clone(), update));
    }

    fn update_template(&mut self, template: &Template) {
        self.events.push(SinkEvent::Template);
        self.last_template = Some(template.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentBlock;

    fn fixed(height: f32) -> impl BlockMeasure {
        move |_: &ContentBlock| height
    }

    fn page(blocks: usize, subs: usize) -> Page {
        let content = Content::from(
            (0..blocks)
                .map(|i| ContentBlock::paragraph(&format!("p{}", i)))
                .collect::<Vec<_>>(),
        );
        let mut page = Page::new("p", content);
        for _ in 0..subs {
            let sub = page.continuation(Content::new());
            page.sub_pages.push(sub);
        }
        page
    }

    #[test]
    fn test_sync_mounts_every_surface() {
        let mut host = MemoryHost::new(fixed(100.0), 350.0);
        host.sync(&page(5, 2));
        assert_eq!(host.mounted(), 3);

        let metrics = host.surface(SurfaceTarget::Page).unwrap().metrics();
        assert_eq!(metrics, SurfaceMetrics::new(500.0, 350.0));

        host.sync(&page(1, 0));
        assert_eq!(host.mounted(), 1);
        assert!(host.surface(SurfaceTarget::SubPage(0)).is_none());
    }

    #[test]
    fn test_unmounted_surface() {
        let mut host = MemoryHost::new(fixed(10.0), 350.0);
        host.unmount(SurfaceTarget::SubPage(0));
        host.sync(&page(1, 1));
        assert!(host.surface(SurfaceTarget::SubPage(0)).is_none());

        host.remount(SurfaceTarget::SubPage(0));
        host.sync(&page(1, 1));
        assert!(host.surface(SurfaceTarget::SubPage(0)).is_some());
    }

    #[test]
    fn test_focus_moves_caret() {
        let mut host = MemoryHost::new(fixed(10.0), 350.0);
        host.sync(&page(2, 1));
        host.place_caret(SurfaceTarget::Page, Caret::new(1, 1));

        assert!(host.focus(SurfaceTarget::Page, CaretPlacement::End));
        assert_eq!(host.focused(), Some(SurfaceTarget::Page));
        // "p0p1" has four graphemes, the last block two
        assert_eq!(host.surface(SurfaceTarget::Page).unwrap().caret(), Some(Caret::new(4, 2)));

        assert!(host.focus(SurfaceTarget::SubPage(0), CaretPlacement::Start));
        assert_eq!(host.focused(), Some(SurfaceTarget::SubPage(0)));
        assert!(!host.focus(SurfaceTarget::SubPage(5), CaretPlacement::Start));
    }

    #[test]
    fn test_sink_records() {
        let mut sink = MemorySink::new();
        sink.update_page(&PageId("p".into()), PageUpdate::Content(Content::new()));
        sink.update_template(&Template::default());
        assert_eq!(sink.events.len(), 2);
        assert_eq!(sink.template_updates(), 1);
        assert!(sink.last_template.is_some());
    }
}
