//! # Geometry and content model
//!
//! Value types shared by the layout solver and the virtualization manager:
//!
//! - [`geometry`]: `Rect`, `Insets`, `Length`.
//! - [`content`]: the declarative `Screen` → `Row` → `Block` tree.
//! - [`display`]: the solver's output, a paint-ordered `Layout` of
//!   `DisplayItem`s.
//! - [`measure`]: the intrinsic-height interface content kinds implement.
//! - [`error`]: configuration errors and solve diagnostics.
//!
//! Everything here is immutable data; nothing performs I/O.

pub mod color;
pub mod content;
pub mod display;
pub mod error;
pub mod geometry;
pub mod measure;

pub use color::*;
pub use content::*;
pub use display::*;
pub use error::*;
pub use geometry::*;
pub use measure::*;
