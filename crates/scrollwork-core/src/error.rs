use thiserror::Error;

use crate::{BlockId, BlockKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A kind referenced by content has nothing registered to handle it. Fatal
/// for that kind only: affected items render empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    #[error("no element factory registered for block kind `{kind}`")]
    MissingFactory { kind: BlockKind },
    #[error("no measurer registered for block kind `{kind}`")]
    MissingMeasurer { kind: BlockKind },
}

/// Non-fatal findings collected while solving a layout.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// An intrinsic height was requested but nothing can measure the kind;
    /// the height resolved to zero.
    MissingMeasurer { block: BlockId, kind: BlockKind },
    /// A width or height came out zero or negative. `clamped` tells whether
    /// the solver clamped it to zero or passed the raw value through.
    DegenerateGeometry {
        block: BlockId,
        axis: Axis,
        value: f32,
        clamped: bool,
    },
}

impl Diagnostic {
    pub fn block(&self) -> &str {
        match self {
            Diagnostic::MissingMeasurer { block, .. }
            | Diagnostic::DegenerateGeometry { block, .. } => block,
        }
    }

    pub fn as_config_error(&self) -> Option<ConfigError> {
        match self {
            Diagnostic::MissingMeasurer { kind, .. } => {
                Some(ConfigError::MissingMeasurer { kind: kind.clone() })
            }
            Diagnostic::DegenerateGeometry { .. } => None,
        }
    }

    pub(crate) fn log(&self) {
        match self {
            Diagnostic::MissingMeasurer { block, kind } => {
                log::warn!("block `{block}`: no measurer for kind `{kind}`, height resolves to 0")
            }
            Diagnostic::DegenerateGeometry {
                block,
                axis,
                value,
                clamped: true,
            } => log::warn!("block `{block}`: {axis:?} extent {value} clamped to 0"),
            Diagnostic::DegenerateGeometry {
                block, axis, value, ..
            } => log::warn!("block `{block}`: degenerate {axis:?} extent {value}"),
        }
    }
}

/// Collects diagnostics for one solve, logging each as it arrives.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.entries.push(diagnostic);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
