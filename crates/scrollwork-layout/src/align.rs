//! Per-axis placement formulas.
//!
//! Left/Center/Right clamp their declared width at zero; Fill passes a
//! negative width straight through. Both cases report a degenerate extent.

use scrollwork_core::{HorizontalAlignment, Rect, VerticalAlignment};

/// Result of placing one extent along an axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub start: f32,
    pub extent: f32,
    /// Set when the extent is zero or negative: `(raw value, clamped)`.
    pub degenerate: Option<(f32, bool)>,
}

fn declared(raw: f32) -> (f32, Option<(f32, bool)>) {
    let extent = raw.max(0.0);
    let degenerate = (raw <= 0.0).then_some((raw, raw < 0.0));
    (extent, degenerate)
}

fn derived(raw: f32) -> Option<(f32, bool)> {
    (raw <= 0.0).then_some((raw, false))
}

pub fn horizontal(alignment: &HorizontalAlignment, bounds: &Rect) -> Span {
    let basis = bounds.width();
    match *alignment {
        HorizontalAlignment::Left { offset, width } => {
            let (w, degenerate) = declared(width.resolve(basis));
            Span {
                start: bounds.left + offset.resolve(basis),
                extent: w,
                degenerate,
            }
        }
        HorizontalAlignment::Center { offset, width } => {
            let (w, degenerate) = declared(width.resolve(basis));
            Span {
                start: bounds.left + (basis - w) / 2.0 + offset.resolve(basis),
                extent: w,
                degenerate,
            }
        }
        HorizontalAlignment::Right { offset, width } => {
            let (w, degenerate) = declared(width.resolve(basis));
            Span {
                start: bounds.right - w - offset.resolve(basis),
                extent: w,
                degenerate,
            }
        }
        HorizontalAlignment::Fill { left, right } => {
            let l = left.resolve(basis);
            let w = basis - l - right.resolve(basis);
            Span {
                start: bounds.left + l,
                extent: w,
                degenerate: derived(w),
            }
        }
    }
}

/// Places a block vertically inside `bounds`.
///
/// `height` is the block's resolved height (ignored for `Fill`), and
/// `stacked_offset` the space already consumed by earlier stacked siblings.
pub fn vertical(
    alignment: &VerticalAlignment,
    bounds: &Rect,
    height: f32,
    stacked_offset: f32,
) -> Span {
    match *alignment {
        VerticalAlignment::Top { offset, .. } => Span {
            start: bounds.top + offset,
            extent: height,
            degenerate: None,
        },
        VerticalAlignment::Bottom { offset, .. } => Span {
            start: bounds.bottom - height - offset,
            extent: height,
            degenerate: None,
        },
        VerticalAlignment::Middle { offset, .. } => Span {
            start: bounds.top + (bounds.height() - height) / 2.0 + offset,
            extent: height,
            degenerate: None,
        },
        VerticalAlignment::Stacked { top, .. } => Span {
            start: bounds.top + stacked_offset + top,
            extent: height,
            degenerate: None,
        },
        VerticalAlignment::Fill { top, bottom } => {
            let h = bounds.height() - top - bottom;
            Span {
                start: bounds.top + top,
                extent: h,
                degenerate: derived(h),
            }
        }
    }
}

/// Vertical space a stacked block consumes in its row, margins included.
pub fn stacked_extent(alignment: &VerticalAlignment, height: f32) -> Option<f32> {
    match *alignment {
        VerticalAlignment::Stacked { top, bottom, .. } => Some(height + top + bottom),
        _ => None,
    }
}

/// Visible part of `frame` within the row's vertical span, in the frame's
/// own coordinates. `None` when the frame fits.
pub fn clip_to_row(frame: &Rect, row: &Rect) -> Option<Rect> {
    if row.contains_vertically(frame) {
        return None;
    }
    let top = frame.top.max(row.top);
    let bottom = frame.bottom.min(row.bottom);
    let local = if bottom > top {
        Rect::new(frame.left, top, frame.right, bottom)
    } else {
        // Entirely outside the row: nothing visible.
        Rect::new(frame.left, frame.top, frame.right, frame.top)
    };
    Some(local.relative_to(frame))
}
