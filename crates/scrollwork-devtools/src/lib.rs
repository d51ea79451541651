//! Debug overlay for a virtualized screen.
//!
//! An [`Inspector`] samples a [`VirtualizationManager`] each frame into a
//! [`Snapshot`] (solve cost, window position, pool health) and, while
//! enabled, renders it as text lines plus a highlight over the hovered item.

use web_time::Instant;

use scrollwork_core::{BlockKind, Color, Rect, Vec2};
use scrollwork_virtual::{Binder, ElementFactory, PoolStats, VirtualizationManager};

pub mod tests;

/// Weight of the newest sample in the smoothed frame rate.
const FPS_SMOOTHING: f32 = 0.2;

/// Frame counter with an exponentially smoothed rate.
#[derive(Clone, Debug, Default)]
pub struct FrameClock {
    frames: u64,
    last: Option<Instant>,
    fps: f32,
}

impl FrameClock {
    pub fn tick(&mut self, now: Instant) {
        self.frames += 1;
        let Some(prev) = self.last.replace(now) else {
            return;
        };
        let dt = now.saturating_duration_since(prev).as_secs_f32();
        if dt <= 0.0 {
            return;
        }
        let sample = 1.0 / dt;
        self.fps = if self.fps == 0.0 {
            sample
        } else {
            self.fps + FPS_SMOOTHING * (sample - self.fps)
        };
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Virtualization state captured for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub solve_ms: f32,
    pub items: usize,
    pub visible: usize,
    pub offset: f32,
    pub max_offset: f32,
    pub pool: PoolStats,
}

impl Snapshot {
    pub fn capture<F, B>(manager: &VirtualizationManager<F, B>, solve_ms: f32) -> Self
    where
        F: ElementFactory,
        B: Binder<F::Element>,
    {
        Snapshot {
            solve_ms,
            items: manager.layout().map_or(0, |l| l.len()),
            visible: manager.visible_indices().len(),
            offset: manager.offset(),
            max_offset: manager.max_offset(),
            pool: manager.stats(),
        }
    }

    /// Share of acquisitions served from the pool instead of the factory.
    pub fn reuse_ratio(&self) -> f32 {
        let total = self.pool.reuse_count + self.pool.total_created;
        if total == 0 {
            0.0
        } else {
            self.pool.reuse_count as f32 / total as f32
        }
    }

    /// Scroll position as a fraction of the scrollable range.
    pub fn progress(&self) -> f32 {
        if self.max_offset > 0.0 {
            self.offset / self.max_offset
        } else {
            0.0
        }
    }

    fn lines(&self) -> Vec<String> {
        vec![
            format!("solve: {:.2} ms", self.solve_ms),
            format!("items: {}/{} visible", self.visible, self.items),
            format!(
                "offset: {:.0}/{:.0} ({:.0}%)",
                self.offset,
                self.max_offset,
                self.progress() * 100.0
            ),
            format!(
                "pool: {} in use, {} idle, {} created, {:.0}% reused",
                self.pool.items_in_use,
                self.pool.items_in_pool,
                self.pool.total_created,
                self.reuse_ratio() * 100.0
            ),
        ]
    }
}

/// Item under the pointer, with its frame in viewport coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Hover {
    pub index: usize,
    pub kind: BlockKind,
    pub frame: Rect,
}

/// Text and highlight to draw over the viewport for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub lines: Vec<String>,
    pub text_color: Color,
    pub highlight: Option<(Rect, Color)>,
}

impl Overlay {
    pub fn text(&self) -> String {
        self.lines.join("  |  ")
    }
}

#[derive(Debug, Default)]
pub struct Inspector {
    enabled: bool,
    clock: FrameClock,
    snapshot: Option<Snapshot>,
    hover: Option<Hover>,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        log::debug!("inspector {}", if self.enabled { "on" } else { "off" });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn observe<F, B>(&mut self, manager: &VirtualizationManager<F, B>, solve_ms: f32)
    where
        F: ElementFactory,
        B: Binder<F::Element>,
    {
        self.snapshot = Some(Snapshot::capture(manager, solve_ms));
    }

    /// Hit-tests `point` (viewport coordinates) and remembers the result.
    pub fn hover<F, B>(&mut self, manager: &VirtualizationManager<F, B>, point: Vec2)
    where
        F: ElementFactory,
        B: Binder<F::Element>,
    {
        let offset = manager.offset();
        self.hover = manager.hit_test(point).map(|(index, item)| Hover {
            index,
            kind: item.kind.clone(),
            frame: item.frame.translate(0.0, -offset),
        });
    }

    pub fn hovered(&self) -> Option<&Hover> {
        self.hover.as_ref()
    }

    /// Advances the frame clock; returns the overlay only while enabled.
    pub fn frame(&mut self, now: Instant) -> Option<Overlay> {
        self.clock.tick(now);
        if !self.enabled {
            return None;
        }

        let mut lines = vec![format!(
            "frame {} @ {:.1} fps",
            self.clock.frames(),
            self.clock.fps()
        )];
        if let Some(snapshot) = &self.snapshot {
            lines.extend(snapshot.lines());
        }
        if let Some(hover) = &self.hover {
            lines.push(format!("hover: #{} {}", hover.index, hover.kind));
        }

        Some(Overlay {
            lines,
            text_color: Color::from_hex("#AAAAAA"),
            highlight: self
                .hover
                .as_ref()
                .map(|h| (h.frame, Color::from_hex("#44AAFF"))),
        })
    }
}
