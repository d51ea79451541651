//! Bucketed vertical index over a display list.
//!
//! Visibility is a half-open overlap test, so a linear scan is always correct
//! but costs O(items) per frame. [`SpanIndex`] buckets items by the vertical
//! range they cover so a query only inspects items near the window. It
//! returns exactly what the scan would.

use smallvec::SmallVec;

use scrollwork_core::{DisplayItem, Rect};

const MAX_BUCKETS: usize = 1 << 16;

pub struct SpanIndex {
    origin: f32,
    bucket_size: f32,
    buckets: Vec<SmallVec<[u32; 8]>>,
}

impl SpanIndex {
    pub fn build(items: &[DisplayItem], bucket_size: f32) -> Self {
        let (mut lo, mut hi) = (f32::INFINITY, f32::NEG_INFINITY);
        for (a, b) in items.iter().filter_map(|item| extent(&item.frame)) {
            lo = lo.min(a);
            hi = hi.max(b);
        }
        if lo > hi {
            lo = 0.0;
            hi = 0.0;
        }
        let bucket_size = if bucket_size > 0.0 { bucket_size } else { 512.0 };
        let bucket_size = bucket_size.max((hi - lo) / MAX_BUCKETS as f32);

        let count = ((((hi - lo) / bucket_size).floor() as usize) + 1).min(MAX_BUCKETS);
        let mut index = SpanIndex {
            origin: lo,
            bucket_size,
            buckets: vec![SmallVec::new(); count],
        };
        for (i, item) in items.iter().enumerate() {
            // Non-finite frames land everywhere; the exact filter sorts them out.
            let (first, last) = match extent(&item.frame) {
                Some((a, b)) => (index.bucket(a), index.bucket(b)),
                None => (0, count - 1),
            };
            for bucket in &mut index.buckets[first..=last] {
                bucket.push(i as u32);
            }
        }
        index
    }

    fn bucket(&self, y: f32) -> usize {
        let raw = ((y - self.origin) / self.bucket_size).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.buckets.len() - 1)
        }
    }

    /// Indices of items with `bottom > start && top < end`, ascending.
    pub fn query(&self, items: &[DisplayItem], start: f32, end: f32) -> Vec<usize> {
        if items.is_empty() {
            return Vec::new();
        }
        let (first, last) = (self.bucket(start.min(end)), self.bucket(start.max(end)));
        let mut hits: Vec<usize> = self.buckets[first..=last]
            .iter()
            .flat_map(|b| b.iter().map(|&i| i as usize))
            .filter(|&i| items.get(i).is_some_and(|it| it.frame.overlaps_span(start, end)))
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

/// Vertical extent as `(min, max)`; degenerate Fill frames can be inverted.
fn extent(frame: &Rect) -> Option<(f32, f32)> {
    let (a, b) = (frame.top.min(frame.bottom), frame.top.max(frame.bottom));
    (a.is_finite() && b.is_finite()).then_some((a, b))
}

/// Reference scan: every item overlapping `[start, end)`.
pub fn scan(items: &[DisplayItem], start: f32, end: f32) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.frame.overlaps_span(start, end))
        .map(|(i, _)| i)
        .collect()
}
