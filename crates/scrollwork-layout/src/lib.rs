//! # Layout solver
//!
//! [`solve`] turns a [`Screen`] and an available width into a flat
//! [`Layout`]: one display item per row background followed by one per block,
//! all in absolute screen coordinates and in paint order.
//!
//! Rows are laid out top to bottom. A row's height is either static or the
//! sum of its *stacked* blocks (height plus top/bottom margins, in declared
//! order). *Floating* blocks (every other vertical mode) are positioned inside
//! the finished row and clipped when they overflow it.
//!
//! ```rust
//! use scrollwork_core::*;
//! use scrollwork_layout::solve;
//!
//! let screen = Screen::new("s").row(
//!     Row::new("r")
//!         .block(Block::new("a", Payload::empty(BlockKind::RECTANGLE))
//!             .vertical(VerticalAlignment::stacked(0.0, 0.0, Height::Static(20.0))))
//!         .block(Block::new("b", Payload::empty(BlockKind::RECTANGLE))
//!             .vertical(VerticalAlignment::stacked(0.0, 0.0, Height::Static(70.0)))),
//! );
//!
//! let layout = solve(&screen, 320.0, &NoMeasurer);
//! assert_eq!(layout.total_height, 90.0);
//! assert_eq!(layout.items[2].frame.top, 20.0);
//! ```
//!
//! The solver is pure: no I/O, no shared state beyond the measurer, and the
//! same `(screen, width)` always yields an equal layout.

pub mod align;
pub mod hit_test;

pub use hit_test::{hit_test, tap_target};

use std::collections::HashSet;
use std::ops::Range;

use smallvec::SmallVec;

use scrollwork_core::{
    Axis, Block, BlockKind, Diagnostic, Diagnostics, DisplayItem, Height, IntrinsicMeasurer,
    ItemRef, Layout, Rect, Row, RowHeight, Screen,
};

/// Horizontal placement and resolved height of one block, computed before the
/// row's height is known.
#[derive(Clone, Copy, Debug)]
struct BlockMetrics {
    x: f32,
    width: f32,
    /// `None` for vertical `Fill`, which takes its height from the row.
    height: Option<f32>,
}

struct Solver<'a, M: IntrinsicMeasurer + ?Sized> {
    measurer: &'a M,
    width: f32,
    items: Vec<DisplayItem>,
    row_blocks: Vec<Range<usize>>,
    diagnostics: Diagnostics,
    /// Kinds already reported as unmeasurable in this solve.
    unmeasured: HashSet<BlockKind>,
    next_paint_order: u32,
}

pub fn solve<M: IntrinsicMeasurer + ?Sized>(screen: &Screen, width: f32, measurer: &M) -> Layout {
    let mut solver = Solver {
        measurer,
        width,
        items: Vec::new(),
        row_blocks: Vec::with_capacity(screen.rows.len()),
        diagnostics: Diagnostics::new(),
        unmeasured: HashSet::new(),
        next_paint_order: 0,
    };

    let mut cursor = 0.0f32;
    for (index, row) in screen.rows.iter().enumerate() {
        cursor += solver.row(index, row, cursor);
    }

    // Topmost first: later rows, then later blocks, win.
    let hit_order = solver
        .row_blocks
        .iter()
        .rev()
        .flat_map(|r| r.clone().rev())
        .collect();

    log::debug!(
        "solved screen `{}` at width {width}: {} rows, {} items, height {cursor}",
        screen.id,
        screen.rows.len(),
        solver.items.len()
    );

    Layout {
        items: solver.items,
        total_height: cursor,
        width,
        background: screen.background.clone(),
        hit_order,
        diagnostics: solver.diagnostics.into_vec(),
    }
}

impl<M: IntrinsicMeasurer + ?Sized> Solver<'_, M> {
    /// Emits the row and its blocks; returns the row height.
    fn row(&mut self, index: usize, row: &Row, top: f32) -> f32 {
        let full = Rect::new(0.0, top, self.width, top);

        let metrics: SmallVec<[BlockMetrics; 8]> = row
            .blocks
            .iter()
            .map(|block| self.metrics(block, &full))
            .collect();

        let height = match row.height {
            RowHeight::Static(v) => v,
            RowHeight::Auto => row
                .blocks
                .iter()
                .zip(&metrics)
                .filter_map(|(b, m)| align::stacked_extent(&b.vertical, m.height.unwrap_or(0.0)))
                .sum(),
        };
        let row_frame = Rect::new(0.0, top, self.width, top + height);
        log::trace!("row `{}` at {top}: height {height}", row.id);

        self.push(row_frame, None, BlockKind::ROW, ItemRef::Row { row: index });

        let first_block = self.items.len();
        let mut stacked = 0.0f32;
        for (block_index, (block, m)) in row.blocks.iter().zip(&metrics).enumerate() {
            let resolved = m.height.unwrap_or(0.0);
            let v = align::vertical(&block.vertical, &row_frame, resolved, stacked);
            if let Some((value, clamped)) = v.degenerate {
                self.diagnostics.push(Diagnostic::DegenerateGeometry {
                    block: block.id.clone(),
                    axis: Axis::Vertical,
                    value,
                    clamped,
                });
            }

            let frame = Rect::from_origin_size(m.x, v.start, m.width, v.extent);
            let clip = match align::stacked_extent(&block.vertical, resolved) {
                Some(consumed) => {
                    stacked += consumed;
                    None
                }
                None => align::clip_to_row(&frame, &row_frame),
            };

            self.push(
                frame,
                clip,
                block.kind().clone(),
                ItemRef::Block {
                    row: index,
                    block: block_index,
                },
            );
        }
        self.row_blocks.push(first_block..self.items.len());

        height
    }

    fn metrics(&mut self, block: &Block, row: &Rect) -> BlockMetrics {
        let h = align::horizontal(&block.horizontal, row);
        if let Some((value, clamped)) = h.degenerate {
            self.diagnostics.push(Diagnostic::DegenerateGeometry {
                block: block.id.clone(),
                axis: Axis::Horizontal,
                value,
                clamped,
            });
        }

        let height = block
            .vertical
            .height()
            .map(|rule| self.resolve_height(block, rule, h.extent));

        BlockMetrics {
            x: h.start,
            width: h.extent,
            height,
        }
    }

    /// Declared or measured height. Unmeasurable kinds resolve to zero and
    /// are reported once per kind, not per block.
    fn resolve_height(&mut self, block: &Block, rule: Height, width: f32) -> f32 {
        let height = match rule {
            Height::Static(v) => v,
            Height::Intrinsic => {
                let deflect = block.border_width() * 2.0;
                let inner = (width - block.insets.horizontal() - deflect).max(0.0);
                match self.measurer.measure(&block.payload, inner) {
                    Some(content) => content + block.insets.vertical() + deflect,
                    None => {
                        if self.unmeasured.insert(block.kind().clone()) {
                            self.diagnostics.push(Diagnostic::MissingMeasurer {
                                block: block.id.clone(),
                                kind: block.kind().clone(),
                            });
                        }
                        return 0.0;
                    }
                }
            }
        };
        if height <= 0.0 {
            self.diagnostics.push(Diagnostic::DegenerateGeometry {
                block: block.id.clone(),
                axis: Axis::Vertical,
                value: height,
                clamped: false,
            });
        }
        height
    }

    fn push(&mut self, frame: Rect, clip: Option<Rect>, kind: BlockKind, source: ItemRef) {
        self.items.push(DisplayItem {
            frame,
            clip,
            paint_order: self.next_paint_order,
            kind,
            source,
        });
        self.next_paint_order += 1;
    }
}
