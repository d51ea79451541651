//! # Content model
//!
//! A [`Screen`] is an ordered list of [`Row`]s; each row is an ordered list of
//! [`Block`]s. Every block carries one alignment rule per axis:
//!
//! - [`HorizontalAlignment`] places the block inside the row's width.
//! - [`VerticalAlignment`] either *stacks* the block (its height feeds the row
//!   height, in declared order) or *floats* it at an absolute position inside
//!   the row, where it may overflow and get clipped.
//!
//! The model is immutable once built. Decoding it from a wire format happens
//! elsewhere; the builders below exist for hosts and tests.
//!
//! ```rust
//! use scrollwork_core::*;
//!
//! let title = Block::new("title", Payload::new(BlockKind::TEXT, "Hello".to_string()))
//!     .horizontal(HorizontalAlignment::fill(16.0, 16.0))
//!     .vertical(VerticalAlignment::stacked(8.0, 8.0, Height::Intrinsic));
//!
//! let screen = Screen::new("home").row(Row::new("header").block(title));
//! assert_eq!(screen.rows.len(), 1);
//! ```

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::{Background, Color, Insets, Length};

pub type BlockId = String;
pub type RowId = String;
pub type ScreenId = String;

/// Tag naming the kind of content a block holds. Measurers and element
/// factories are registered per kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKind(Cow<'static, str>);

impl BlockKind {
    /// Reserved for row background items.
    pub const ROW: BlockKind = BlockKind::from_static("row");
    pub const TEXT: BlockKind = BlockKind::from_static("text");
    pub const IMAGE: BlockKind = BlockKind::from_static("image");
    pub const BUTTON: BlockKind = BlockKind::from_static("button");
    pub const RECTANGLE: BlockKind = BlockKind::from_static("rectangle");
    pub const BARCODE: BlockKind = BlockKind::from_static("barcode");
    pub const WEB_VIEW: BlockKind = BlockKind::from_static("web-view");
    pub const POLL: BlockKind = BlockKind::from_static("poll");

    pub const fn from_static(name: &'static str) -> Self {
        BlockKind(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        BlockKind(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind-tagged block content. The layout core never looks inside; only
/// measurers and binders for the matching kind downcast it.
#[derive(Clone)]
pub struct Payload {
    kind: BlockKind,
    content: Arc<dyn Any + Send + Sync>,
}

impl Payload {
    pub fn new<T: Any + Send + Sync>(kind: BlockKind, content: T) -> Self {
        Self {
            kind,
            content: Arc::new(content),
        }
    }

    /// A payload with no content of its own (rectangles, spacers).
    pub fn empty(kind: BlockKind) -> Self {
        Self::new(kind, ())
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.content.downcast_ref::<T>()
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && Arc::ptr_eq(&self.content, &other.content)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("kind", &self.kind)
            .field("content", &"<opaque>")
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HorizontalAlignment {
    Fill { left: Length, right: Length },
    Left { offset: Length, width: Length },
    Center { offset: Length, width: Length },
    Right { offset: Length, width: Length },
}

impl Default for HorizontalAlignment {
    fn default() -> Self {
        HorizontalAlignment::Fill {
            left: Length::Points(0.0),
            right: Length::Points(0.0),
        }
    }
}

impl HorizontalAlignment {
    pub fn fill(left: f32, right: f32) -> Self {
        HorizontalAlignment::Fill {
            left: left.into(),
            right: right.into(),
        }
    }
    pub fn left(offset: f32, width: f32) -> Self {
        HorizontalAlignment::Left {
            offset: offset.into(),
            width: width.into(),
        }
    }
    pub fn center(offset: f32, width: f32) -> Self {
        HorizontalAlignment::Center {
            offset: offset.into(),
            width: width.into(),
        }
    }
    pub fn right(offset: f32, width: f32) -> Self {
        HorizontalAlignment::Right {
            offset: offset.into(),
            width: width.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Height {
    Static(f32),
    /// Resolved by the measurer registered for the block's kind.
    Intrinsic,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VerticalAlignment {
    Fill { top: f32, bottom: f32 },
    Top { offset: f32, height: Height },
    Bottom { offset: f32, height: Height },
    Middle { offset: f32, height: Height },
    Stacked { top: f32, bottom: f32, height: Height },
}

impl Default for VerticalAlignment {
    fn default() -> Self {
        VerticalAlignment::Stacked {
            top: 0.0,
            bottom: 0.0,
            height: Height::Intrinsic,
        }
    }
}

impl VerticalAlignment {
    pub fn fill(top: f32, bottom: f32) -> Self {
        VerticalAlignment::Fill { top, bottom }
    }
    pub fn top(offset: f32, height: Height) -> Self {
        VerticalAlignment::Top { offset, height }
    }
    pub fn bottom(offset: f32, height: Height) -> Self {
        VerticalAlignment::Bottom { offset, height }
    }
    pub fn middle(offset: f32, height: Height) -> Self {
        VerticalAlignment::Middle { offset, height }
    }
    pub fn stacked(top: f32, bottom: f32, height: Height) -> Self {
        VerticalAlignment::Stacked {
            top,
            bottom,
            height,
        }
    }

    pub fn is_stacked(&self) -> bool {
        matches!(self, VerticalAlignment::Stacked { .. })
    }

    /// The declared height rule, if this mode has one (`Fill` derives its
    /// height from the row).
    pub fn height(&self) -> Option<Height> {
        match *self {
            VerticalAlignment::Fill { .. } => None,
            VerticalAlignment::Top { height, .. }
            | VerticalAlignment::Bottom { height, .. }
            | VerticalAlignment::Middle { height, .. }
            | VerticalAlignment::Stacked { height, .. } => Some(height),
        }
    }
}

/// Stroke drawn inside a block's frame; its width deflects the content area
/// on every side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Border {
    pub width: f32,
    pub radius: f32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TapAction {
    GoToScreen { screen_id: ScreenId },
    OpenUrl { url: String },
    PresentWebsite { url: String },
    Close,
    Custom { name: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub insets: Insets,
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
    pub opacity: f32,
    pub border: Option<Border>,
    pub background: Background,
    pub payload: Payload,
    pub tap_action: Option<TapAction>,
}

impl Block {
    pub fn new(id: impl Into<BlockId>, payload: Payload) -> Self {
        Block {
            id: id.into(),
            insets: Insets::ZERO,
            horizontal: HorizontalAlignment::default(),
            vertical: VerticalAlignment::default(),
            opacity: 1.0,
            border: None,
            background: Background::None,
            payload,
            tap_action: None,
        }
    }
    pub fn insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }
    pub fn horizontal(mut self, h: HorizontalAlignment) -> Self {
        self.horizontal = h;
        self
    }
    pub fn vertical(mut self, v: VerticalAlignment) -> Self {
        self.vertical = v;
        self
    }
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }
    pub fn background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }
    pub fn on_tap(mut self, action: TapAction) -> Self {
        self.tap_action = Some(action);
        self
    }

    pub fn kind(&self) -> &BlockKind {
        self.payload.kind()
    }

    pub fn border_width(&self) -> f32 {
        self.border.map(|b| b.width).unwrap_or(0.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RowHeight {
    Static(f32),
    /// Sum of the row's stacked blocks.
    #[default]
    Auto,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub blocks: Vec<Block>,
    pub height: RowHeight,
    pub background: Background,
}

impl Row {
    pub fn new(id: impl Into<RowId>) -> Self {
        Row {
            id: id.into(),
            blocks: vec![],
            height: RowHeight::Auto,
            background: Background::None,
        }
    }
    pub fn height(mut self, height: RowHeight) -> Self {
        self.height = height;
        self
    }
    pub fn background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }
    pub fn block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }
    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Screen {
    pub id: ScreenId,
    pub rows: Vec<Row>,
    pub background: Background,
}

impl Screen {
    pub fn new(id: impl Into<ScreenId>) -> Self {
        Screen {
            id: id.into(),
            rows: vec![],
            background: Background::None,
        }
    }
    pub fn background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }
    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    /// Looks up the row or block a display item was produced from.
    pub fn resolve(&self, source: crate::ItemRef) -> Option<Source<'_>> {
        match source {
            crate::ItemRef::Row { row } => self.rows.get(row).map(Source::Row),
            crate::ItemRef::Block { row, block } => self
                .rows
                .get(row)
                .and_then(|r| r.blocks.get(block))
                .map(Source::Block),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Source<'a> {
    Row(&'a Row),
    Block(&'a Block),
}
