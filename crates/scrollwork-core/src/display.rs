use crate::{Background, BlockKind, ConfigError, Diagnostic, Rect};

/// Points back at the row or block a display item came from, by position in
/// the solved [`crate::Screen`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemRef {
    Row { row: usize },
    Block { row: usize, block: usize },
}

impl ItemRef {
    pub fn row(&self) -> usize {
        match *self {
            ItemRef::Row { row } | ItemRef::Block { row, .. } => row,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, ItemRef::Block { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayItem {
    /// Absolute, screen-space frame.
    pub frame: Rect,
    /// Visible part of the frame in the item's own coordinates. Only present
    /// when the item overflows its row.
    pub clip: Option<Rect>,
    /// Later paint order draws on top.
    pub paint_order: u32,
    pub kind: BlockKind,
    pub source: ItemRef,
}

impl DisplayItem {
    /// Absolute rectangle actually drawn, after clipping.
    pub fn visible_frame(&self) -> Option<Rect> {
        match self.clip {
            None => Some(self.frame),
            Some(clip) => {
                let abs = clip.translate(self.frame.left, self.frame.top);
                abs.intersect(&self.frame)
            }
        }
    }
}

/// Flattened, paint-ordered output of the layout solver.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    pub items: Vec<DisplayItem>,
    pub total_height: f32,
    pub width: f32,
    pub background: Background,
    /// Indices into `items`, topmost block first. Row backgrounds are not
    /// hit targets.
    pub hit_order: Vec<usize>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Layout {
    pub fn empty(width: f32) -> Self {
        Layout {
            width,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&DisplayItem> {
        self.items.get(index)
    }

    /// Configuration problems found while solving, one per offending kind.
    pub fn config_errors(&self) -> Vec<ConfigError> {
        self.diagnostics
            .iter()
            .filter_map(Diagnostic::as_config_error)
            .collect()
    }

    /// Largest scroll offset that keeps a viewport of `viewport_height` filled.
    pub fn max_offset(&self, viewport_height: f32) -> f32 {
        (self.total_height - viewport_height).max(0.0)
    }
}
