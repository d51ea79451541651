//! # Virtualization
//!
//! A [`VirtualizationManager`] owns the scroll offset over one solved
//! [`Layout`](scrollwork_core::Layout) and keeps a small pool of host elements
//! bound to exactly the items intersecting the viewport:
//!
//! - `set_viewport(width, height, layout)` installs a layout (already solved
//!   for `width`) and refills.
//! - `scroll_by(delta)` clamps to `[0, total_height - viewport_height]`,
//!   refills, and returns the distance actually moved.
//! - `recompute()` releases every bound element, then binds one element per
//!   visible item in paint order. An element goes back to the item it showed
//!   last pass whenever possible, so an unchanged window never touches the
//!   factory.
//! - `prefetch_candidates(delta)` lists items that *would* become visible,
//!   nearest first, without changing anything.
//!
//! ```rust
//! use std::sync::Arc;
//! use scrollwork_core::*;
//! use scrollwork_virtual::*;
//!
//! struct Tile(Placement);
//! impl Element for Tile {
//!     fn place(&mut self, p: &Placement) {
//!         self.0 = *p;
//!     }
//! }
//!
//! let screen = Screen::new("s").with_rows(
//!     (0..50)
//!         .map(|i| Row::new(format!("r{i}")).height(RowHeight::Static(100.0)))
//!         .collect(),
//! );
//! let layout = Arc::new(scrollwork_layout::solve(&screen, 320.0, &NoMeasurer));
//!
//! let factory = ElementRegistry::new().with(BlockKind::ROW, || {
//!     Tile(Placement { frame: Rect::ZERO, clip: None, paint_order: 0 })
//! });
//! let mut manager = VirtualizationManager::new(factory, |_: &mut Tile, _: &DisplayItem| {});
//! manager.set_viewport(320.0, 250.0, layout).unwrap();
//!
//! assert_eq!(manager.visible_indices(), &[0, 1, 2]);
//! assert_eq!(manager.scroll_by(-10.0), 0.0);
//! assert_eq!(manager.scroll_by(150.0), 150.0);
//! assert_eq!(manager.visible_indices(), &[1, 2, 3]);
//! ```

pub mod fling;
pub mod index;
pub mod manager;
pub mod pool;

pub use fling::{FlingConfig, FlingState, projected_distance};
pub use index::SpanIndex;
pub use manager::{
    ReportPolicy, ScrollEdges, ViewportError, VirtualizationManager, VirtualizerConfig,
};
pub use pool::{Binder, Element, ElementFactory, ElementKey, ElementRegistry, Placement, PoolStats};
