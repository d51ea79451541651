//! Element pool and host binding glue.
//!
//! The host supplies elements through an [`ElementFactory`] and fills them
//! with content through a [`Binder`]. The pool itself only ever touches an
//! element's geometry via [`Element::place`].

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use scrollwork_core::{BlockKind, DisplayItem, Rect};

new_key_type! {
    /// Handle to a pooled host element.
    pub struct ElementKey;
}

/// Geometry applied to an element for one recompute pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Frame in viewport coordinates (`top` already has the scroll offset
    /// subtracted).
    pub frame: Rect,
    /// Local clip, unchanged from the display item.
    pub clip: Option<Rect>,
    pub paint_order: u32,
}

impl Placement {
    pub fn for_item(item: &DisplayItem, offset: f32) -> Self {
        Placement {
            frame: item.frame.translate(0.0, -offset),
            clip: item.clip,
            paint_order: item.paint_order,
        }
    }
}

/// A reusable host UI element.
pub trait Element {
    fn place(&mut self, placement: &Placement);

    /// Called when the element returns to the pool unbound (typically: hide).
    fn recycle(&mut self) {}
}

pub trait ElementFactory {
    type Element: Element;

    /// `None` when the kind has no factory; the pool reports it once and
    /// leaves items of that kind empty from then on.
    fn create_element(&mut self, kind: &BlockKind) -> Option<Self::Element>;
}

pub trait Binder<E> {
    fn bind(&mut self, element: &mut E, item: &DisplayItem);
}

impl<E, F> Binder<E> for F
where
    F: FnMut(&mut E, &DisplayItem),
{
    fn bind(&mut self, element: &mut E, item: &DisplayItem) {
        self(element, item)
    }
}

/// Factory backed by one constructor per registered kind.
pub struct ElementRegistry<E> {
    ctors: HashMap<BlockKind, Box<dyn FnMut() -> E>>,
}

impl<E> Default for ElementRegistry<E> {
    fn default() -> Self {
        Self {
            ctors: HashMap::new(),
        }
    }
}

impl<E> ElementRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: BlockKind, ctor: impl FnMut() -> E + 'static) {
        self.ctors.insert(kind, Box::new(ctor));
    }

    pub fn with(mut self, kind: BlockKind, ctor: impl FnMut() -> E + 'static) -> Self {
        self.register(kind, ctor);
        self
    }

    pub fn contains(&self, kind: &BlockKind) -> bool {
        self.ctors.contains_key(kind)
    }
}

impl<E: Element> ElementFactory for ElementRegistry<E> {
    type Element = E;

    fn create_element(&mut self, kind: &BlockKind) -> Option<E> {
        self.ctors.get_mut(kind).map(|ctor| ctor())
    }
}

/// Lifecycle counters for the pool.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoolStats {
    /// Elements bound to a visible item.
    pub items_in_use: usize,
    /// Idle elements waiting for reuse.
    pub items_in_pool: usize,
    /// Factory invocations that produced an element.
    pub total_created: usize,
    /// Acquisitions served without calling the factory.
    pub reuse_count: usize,
}

struct Slot<E> {
    kind: BlockKind,
    element: E,
}

/// Arena of host elements plus the index-keyed map of what is bound where.
pub(crate) struct ElementPool<E> {
    arena: SlotMap<ElementKey, Slot<E>>,
    free: HashMap<BlockKind, SmallVec<[ElementKey; 4]>>,
    bound: HashMap<usize, ElementKey>,
    stats: PoolStats,
}

impl<E: Element> ElementPool<E> {
    pub(crate) fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
            free: HashMap::new(),
            bound: HashMap::new(),
            stats: PoolStats::default(),
        }
    }

    /// Unbinds everything. Returns the previous bindings keyed by item index
    /// so the caller can hand each element back to the same item.
    pub(crate) fn release_all(&mut self) -> HashMap<usize, ElementKey> {
        std::mem::take(&mut self.bound)
    }

    /// Returns released-but-unclaimed elements to their kind's free list.
    pub(crate) fn park(&mut self, leftovers: impl IntoIterator<Item = ElementKey>) {
        for key in leftovers {
            if let Some(slot) = self.arena.get_mut(key) {
                slot.element.recycle();
                self.free.entry(slot.kind.clone()).or_default().push(key);
            }
        }
    }

    /// Drops bindings and parks every element; used when the layout changes
    /// and item indices stop meaning anything.
    pub(crate) fn reset(&mut self) {
        let released = self.release_all();
        self.park(released.into_values());
    }

    pub(crate) fn kind_of(&self, key: ElementKey) -> Option<&BlockKind> {
        self.arena.get(key).map(|s| &s.kind)
    }

    /// Records that a released element went straight back to its old item.
    pub(crate) fn note_reuse(&mut self) {
        self.stats.reuse_count += 1;
    }

    /// An idle element of `kind`, if one is parked.
    pub(crate) fn take_free(&mut self, kind: &BlockKind) -> Option<ElementKey> {
        let key = self.free.get_mut(kind)?.pop()?;
        self.stats.reuse_count += 1;
        Some(key)
    }

    pub(crate) fn insert(&mut self, kind: BlockKind, element: E) -> ElementKey {
        self.stats.total_created += 1;
        self.arena.insert(Slot { kind, element })
    }

    pub(crate) fn bind(&mut self, index: usize, key: ElementKey) -> Option<&mut E> {
        self.bound.insert(index, key);
        self.arena.get_mut(key).map(|s| &mut s.element)
    }

    pub(crate) fn bound_key(&self, index: usize) -> Option<ElementKey> {
        self.bound.get(&index).copied()
    }

    pub(crate) fn element(&self, key: ElementKey) -> Option<&E> {
        self.arena.get(key).map(|s| &s.element)
    }

    pub(crate) fn stats(&self) -> PoolStats {
        PoolStats {
            items_in_use: self.bound.len(),
            items_in_pool: self.free.values().map(|f| f.len()).sum(),
            ..self.stats.clone()
        }
    }
}
