//! Intrinsic measurement.
//!
//! The solver only ever talks to [`IntrinsicMeasurer`]. Content kinds plug in
//! by implementing [`Measurable`] and registering with a [`MeasurerRegistry`].
//! Measurers must be synchronous, deterministic, and CPU-only (text shaping is
//! fine, network or disk access is not).

use std::collections::HashMap;
use std::sync::Arc;

use crate::{BlockKind, Payload};

/// Natural content height of one block kind at a given width.
pub trait Measurable: Send + Sync {
    fn measure(&self, payload: &Payload, available_width: f32) -> f32;
}

impl<F> Measurable for F
where
    F: Fn(&Payload, f32) -> f32 + Send + Sync,
{
    fn measure(&self, payload: &Payload, available_width: f32) -> f32 {
        self(payload, available_width)
    }
}

pub trait IntrinsicMeasurer {
    /// `None` when nothing can measure `payload`'s kind.
    fn measure(&self, payload: &Payload, available_width: f32) -> Option<f32>;
}

/// Measures nothing; every intrinsic height resolves to zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMeasurer;

impl IntrinsicMeasurer for NoMeasurer {
    fn measure(&self, _payload: &Payload, _available_width: f32) -> Option<f32> {
        None
    }
}

#[derive(Clone, Default)]
pub struct MeasurerRegistry {
    by_kind: HashMap<BlockKind, Arc<dyn Measurable>>,
}

impl MeasurerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: BlockKind, measurer: impl Measurable + 'static) {
        if self.by_kind.insert(kind.clone(), Arc::new(measurer)).is_some() {
            log::debug!("replacing measurer for kind `{kind}`");
        }
    }

    pub fn with(mut self, kind: BlockKind, measurer: impl Measurable + 'static) -> Self {
        self.register(kind, measurer);
        self
    }

    pub fn contains(&self, kind: &BlockKind) -> bool {
        self.by_kind.contains_key(kind)
    }
}

impl IntrinsicMeasurer for MeasurerRegistry {
    fn measure(&self, payload: &Payload, available_width: f32) -> Option<f32> {
        self.by_kind
            .get(payload.kind())
            .map(|m| m.measure(payload, available_width).max(0.0))
    }
}

impl<M: IntrinsicMeasurer + ?Sized> IntrinsicMeasurer for &M {
    fn measure(&self, payload: &Payload, available_width: f32) -> Option<f32> {
        (**self).measure(payload, available_width)
    }
}

impl std::fmt::Debug for MeasurerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.by_kind.keys().map(BlockKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("MeasurerRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}
