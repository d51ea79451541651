use std::collections::HashSet;
use std::sync::Arc;

use bitflags::bitflags;
use thiserror::Error;
use web_time::Instant;

use scrollwork_core::{BlockKind, ConfigError, DisplayItem, Layout, Vec2};

use crate::fling::FlingState;
use crate::index::{self, SpanIndex};
use crate::pool::{
    Binder, Element, ElementFactory, ElementKey, ElementPool, Placement, PoolStats,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewportError {
    #[error("layout solved for width {layout} but viewport is {viewport} wide; re-solve first")]
    WidthMismatch { layout: f32, viewport: f32 },
}

/// What to do the first time a kind turns out to have no element factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportPolicy {
    /// Log, then panic. Default in debug builds.
    Panic,
    /// Log and carry on with an empty slot. Default in release builds.
    Log,
}

impl Default for ReportPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ReportPolicy::Panic
        } else {
            ReportPolicy::Log
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VirtualizerConfig {
    pub report: ReportPolicy,
    /// Layouts with at least this many items get a [`SpanIndex`].
    pub index_threshold: usize,
    pub bucket_size: f32,
}

impl Default for VirtualizerConfig {
    fn default() -> Self {
        Self {
            report: ReportPolicy::default(),
            index_threshold: 256,
            bucket_size: 512.0,
        }
    }
}

impl VirtualizerConfig {
    pub fn report(mut self, policy: ReportPolicy) -> Self {
        self.report = policy;
        self
    }
    pub fn index_threshold(mut self, items: usize) -> Self {
        self.index_threshold = items;
        self
    }
    pub fn bucket_size(mut self, px: f32) -> Self {
        self.bucket_size = px;
        self
    }
}

bitflags! {
    /// Which scroll edges the viewport currently rests against.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ScrollEdges: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
    }
}

struct Viewport {
    layout: Arc<Layout>,
    height: f32,
    index: Option<SpanIndex>,
}

impl Viewport {
    fn max_offset(&self) -> f32 {
        self.layout.max_offset(self.height)
    }

    fn visible_at(&self, offset: f32) -> Vec<usize> {
        let (start, end) = (offset, offset + self.height);
        match &self.index {
            Some(index) => index.query(&self.layout.items, start, end),
            None => index::scan(&self.layout.items, start, end),
        }
    }
}

/// Maps a scroll window onto a bounded pool of host elements.
///
/// Drive it from the thread that owns the host's elements; calls must not
/// overlap. Until the first [`set_viewport`](Self::set_viewport) every
/// operation is a no-op.
pub struct VirtualizationManager<F, B>
where
    F: ElementFactory,
    B: Binder<F::Element>,
{
    config: VirtualizerConfig,
    factory: F,
    binder: B,
    pool: ElementPool<F::Element>,
    viewport: Option<Viewport>,
    offset: f32,
    visible: Vec<usize>,
    missing: HashSet<BlockKind>,
    errors: Vec<ConfigError>,
}

impl<F, B> VirtualizationManager<F, B>
where
    F: ElementFactory,
    B: Binder<F::Element>,
{
    pub fn new(factory: F, binder: B) -> Self {
        Self::with_config(VirtualizerConfig::default(), factory, binder)
    }

    pub fn with_config(config: VirtualizerConfig, factory: F, binder: B) -> Self {
        Self {
            config,
            factory,
            binder,
            pool: ElementPool::new(),
            viewport: None,
            offset: 0.0,
            visible: Vec::new(),
            missing: HashSet::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.viewport.is_some()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        self.viewport.as_ref().map_or(0.0, Viewport::max_offset)
    }

    pub fn layout(&self) -> Option<&Arc<Layout>> {
        self.viewport.as_ref().map(|v| &v.layout)
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport.as_ref().map_or(0.0, |v| v.height)
    }

    /// Installs a layout and viewport size. The layout must already be solved
    /// for `width`; this never re-solves.
    pub fn set_viewport(
        &mut self,
        width: f32,
        height: f32,
        layout: Arc<Layout>,
    ) -> Result<(), ViewportError> {
        if layout.width != width {
            return Err(ViewportError::WidthMismatch {
                layout: layout.width,
                viewport: width,
            });
        }

        let same_layout = self
            .viewport
            .as_ref()
            .is_some_and(|v| Arc::ptr_eq(&v.layout, &layout));

        let index = match self.viewport.take() {
            Some(v) if same_layout => v.index,
            _ => {
                // Indices from the previous layout are meaningless now.
                self.pool.reset();
                self.visible.clear();
                (layout.len() >= self.config.index_threshold)
                    .then(|| SpanIndex::build(&layout.items, self.config.bucket_size))
            }
        };

        log::debug!(
            "viewport {width}x{height}, {} items, height {}, indexed: {}",
            layout.len(),
            layout.total_height,
            index.is_some()
        );

        let viewport = Viewport {
            layout,
            height: height.max(0.0),
            index,
        };
        self.offset = self.offset.clamp(0.0, viewport.max_offset());
        self.viewport = Some(viewport);
        self.recompute();
        Ok(())
    }

    /// Scrolls by `delta` px, clamped to the content. Returns the distance
    /// actually moved; a smaller magnitude than requested means an edge.
    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        let Some(viewport) = &self.viewport else {
            return 0.0;
        };
        if !delta.is_finite() {
            return 0.0;
        }
        let before = self.offset;
        self.offset = (before + delta).clamp(0.0, viewport.max_offset());
        let actual = self.offset - before;
        self.recompute();
        actual
    }

    pub fn scroll_to(&mut self, offset: f32) -> f32 {
        self.scroll_by(offset - self.offset)
    }

    /// Scrolls so item `index` starts at the top of the viewport (as far as
    /// the content allows).
    pub fn scroll_to_item(&mut self, index: usize) -> f32 {
        let top = self
            .viewport
            .as_ref()
            .and_then(|v| v.layout.item(index))
            .map(|item| item.frame.top);
        match top {
            Some(top) => self.scroll_to(top),
            None => 0.0,
        }
    }

    pub fn edges(&self) -> ScrollEdges {
        let mut edges = ScrollEdges::empty();
        if self.viewport.is_none() {
            return edges;
        }
        if self.offset <= 0.0 {
            edges |= ScrollEdges::TOP;
        }
        if self.offset >= self.max_offset() {
            edges |= ScrollEdges::BOTTOM;
        }
        edges
    }

    pub fn can_scroll_backward(&self) -> bool {
        self.is_ready() && !self.edges().contains(ScrollEdges::TOP)
    }

    pub fn can_scroll_forward(&self) -> bool {
        self.is_ready() && !self.edges().contains(ScrollEdges::BOTTOM)
    }

    /// The fill pass: unbinds everything, then binds an element to every
    /// visible item in paint order.
    pub fn recompute(&mut self) {
        let Some(viewport) = &self.viewport else {
            return;
        };
        let visible = viewport.visible_at(self.offset);
        let layout = viewport.layout.clone();

        let mut released = self.pool.release_all();

        // Hand each element back to the item it showed last pass.
        let mut plan: Vec<(usize, Option<ElementKey>)> = Vec::with_capacity(visible.len());
        let mut stray = Vec::new();
        for &i in &visible {
            let key = match released.remove(&i) {
                Some(k) if self.pool.kind_of(k) == Some(&layout.items[i].kind) => Some(k),
                Some(k) => {
                    stray.push(k);
                    None
                }
                None => None,
            };
            plan.push((i, key));
        }
        self.pool.park(released.into_values().chain(stray));

        let mut created = 0usize;
        for &(index, previous) in &plan {
            let item = &layout.items[index];
            let key = match previous {
                Some(k) => {
                    self.pool.note_reuse();
                    Some(k)
                }
                None => self.acquire(&item.kind).inspect(|_| created += 1),
            };
            // Kinds without a factory stay empty.
            let Some(key) = key else { continue };
            if let Some(element) = self.pool.bind(index, key) {
                element.place(&Placement::for_item(item, self.offset));
                self.binder.bind(element, item);
            }
        }

        log::trace!(
            "recompute at {}: {} visible, {} acquired fresh",
            self.offset,
            visible.len(),
            created
        );
        self.visible = visible;
    }

    /// A parked element of `kind`, or a new one from the factory.
    fn acquire(&mut self, kind: &BlockKind) -> Option<ElementKey> {
        if let Some(key) = self.pool.take_free(kind) {
            return Some(key);
        }
        if self.missing.contains(kind) {
            return None;
        }
        match self.factory.create_element(kind) {
            Some(element) => Some(self.pool.insert(kind.clone(), element)),
            None => {
                self.report_missing(kind);
                None
            }
        }
    }

    fn report_missing(&mut self, kind: &BlockKind) {
        self.missing.insert(kind.clone());
        let error = ConfigError::MissingFactory { kind: kind.clone() };
        log::error!("{error}; items of this kind will render empty");
        self.errors.push(error.clone());
        if self.config.report == ReportPolicy::Panic {
            panic!("{error}");
        }
    }

    /// Items visible at `offset + delta` (clamped) that are not visible now,
    /// closest to the current offset first. Read-only.
    pub fn prefetch_candidates(&self, delta: f32) -> Vec<(usize, f32)> {
        let Some(viewport) = &self.viewport else {
            return Vec::new();
        };
        let hypothetical = (self.offset + delta).clamp(0.0, viewport.max_offset());
        let mut out: Vec<(usize, f32)> = viewport
            .visible_at(hypothetical)
            .into_iter()
            .filter(|i| self.visible.binary_search(i).is_err())
            .map(|i| (i, (viewport.layout.items[i].frame.top - self.offset).abs()))
            .collect();
        out.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        out
    }

    /// Prefetch candidates for where `fling` is projected to settle.
    pub fn fling_prefetch_candidates(&self, fling: &FlingState) -> Vec<(usize, f32)> {
        self.prefetch_candidates(fling.projected_distance())
    }

    /// Applies one fling tick. Returns `true` while the fling should keep
    /// running; hitting an edge ends it.
    pub fn step_fling(&mut self, fling: &mut FlingState, now: Instant) -> bool {
        let Some(delta) = fling.tick(now) else {
            return false;
        };
        let moved = self.scroll_by(delta);
        if delta != 0.0 && moved == 0.0 {
            fling.stop();
            return false;
        }
        fling.is_active()
    }

    /// Indices of visible items, ascending paint order.
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    pub fn visible_items(&self) -> impl Iterator<Item = (usize, &DisplayItem)> + '_ {
        let items = self.viewport.as_ref().map(|v| v.layout.items.as_slice());
        self.visible
            .iter()
            .filter_map(move |&i| items.and_then(|items| items.get(i)).map(|it| (i, it)))
    }

    pub fn bound_element(&self, index: usize) -> Option<&F::Element> {
        self.pool
            .bound_key(index)
            .and_then(|k| self.pool.element(k))
    }

    /// Topmost block under a point given in viewport coordinates.
    pub fn hit_test(&self, point: Vec2) -> Option<(usize, &DisplayItem)> {
        let viewport = self.viewport.as_ref()?;
        scrollwork_layout::hit_test(
            &viewport.layout,
            Vec2 {
                x: point.x,
                y: point.y + self.offset,
            },
        )
    }

    pub fn stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Configuration errors reported so far, one per missing kind.
    pub fn config_errors(&self) -> &[ConfigError] {
        &self.errors
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}
