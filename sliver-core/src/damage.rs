//! Damage region accumulation
//!
//! Records the areas of a layer that must be redrawn before the next frame.
//! Rectangles can be merged in any order: overlapping rectangles are
//! coalesced into their union, and when the fixed capacity is exhausted the
//! whole set collapses into a single bounding rectangle. Either way every
//! damaged pixel stays covered.

use heapless::Vec;

use crate::geometry::Rect;
use crate::scheduler::LayerId;

/// Maximum distinct damage rectangles tracked per layer
pub const MAX_DAMAGE_RECTS: usize = 8;

/// Drained damage for one layer
pub type DamageList = Vec<Rect, MAX_DAMAGE_RECTS>;

/// Anything that accepts damage rectangles
///
/// Property mutators on elements compute the affected rectangle and push it
/// here; the frame scheduler later consumes it.
pub trait DamageSink {
    /// Record `rect` as stale on `layer`
    ///
    /// With `combine` set, the rectangle is merged with any overlapping
    /// rectangles already recorded.
    fn add_damage_rect(&mut self, layer: LayerId, rect: Rect, combine: bool);
}

/// Per-layer damage accumulator
#[derive(Debug, Clone, Default)]
pub struct DamageAccumulator {
    rects: DamageList,
}

impl DamageAccumulator {
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Add a damage rectangle
    ///
    /// Empty rectangles are ignored. A rectangle already covered by a
    /// recorded one is dropped.
    pub fn add(&mut self, rect: Rect, combine: bool) {
        if rect.is_empty() {
            return;
        }
        if self.rects.iter().any(|r| r.contains(&rect)) {
            return;
        }

        if combine {
            let mut merged = rect;
            self.rects.retain(|r| {
                if r.intersects(&merged) {
                    merged = merged.union(r);
                    false
                } else {
                    true
                }
            });
            self.push(merged);
            self.coalesce();
        } else {
            self.push(rect);
        }
    }

    /// Take all accumulated damage, leaving the accumulator empty
    pub fn drain(&mut self) -> DamageList {
        core::mem::take(&mut self.rects)
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Check if `rect` touches any damaged area
    pub fn intersects(&self, rect: &Rect) -> bool {
        self.rects.iter().any(|r| r.intersects(rect))
    }

    /// Smallest rectangle covering all damage
    pub fn bounding_box(&self) -> Option<Rect> {
        bounding_box(&self.rects)
    }

    fn push(&mut self, rect: Rect) {
        if let Err(rect) = self.rects.push(rect) {
            let collapsed = bounding_box(&self.rects).map_or(rect, |b| b.union(&rect));
            debug!(
                "damage list full ({} rects), collapsing to bounding box",
                MAX_DAMAGE_RECTS
            );
            self.rects.clear();
            // Capacity is at least one after clear
            let _ = self.rects.push(collapsed);
        }
    }

    /// Merge rectangles until no two overlap
    ///
    /// A union can grow into a neighbour that did not overlap either input,
    /// so this repeats until a full pass makes no change.
    fn coalesce(&mut self) {
        loop {
            let mut merged_any = false;
            let mut i = 0;
            while i < self.rects.len() {
                let mut j = i + 1;
                while j < self.rects.len() {
                    if self.rects[i].intersects(&self.rects[j]) {
                        let other = self.rects.swap_remove(j);
                        self.rects[i] = self.rects[i].union(&other);
                        merged_any = true;
                    } else {
                        j += 1;
                    }
                }
                i += 1;
            }
            if !merged_any {
                break;
            }
        }
    }
}

/// Smallest rectangle covering every rectangle in `rects`
pub fn bounding_box(rects: &[Rect]) -> Option<Rect> {
    let mut iter = rects.iter().filter(|r| !r.is_empty());
    let first = *iter.next()?;
    Some(iter.fold(first, |acc, r| acc.union(r)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_rect_ignored() {
        let mut acc = DamageAccumulator::new();
        acc.add(Rect::new(0, 0, 0, 10), true);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_overlapping_rects_merge() {
        let mut acc = DamageAccumulator::new();
        acc.add(Rect::new(0, 0, 10, 10), true);
        acc.add(Rect::new(5, 5, 10, 10), true);
        assert_eq!(acc.rects(), &[Rect::new(0, 0, 15, 15)]);
    }

    #[test]
    fn test_disjoint_rects_kept_apart() {
        let mut acc = DamageAccumulator::new();
        acc.add(Rect::new(0, 0, 4, 4), true);
        acc.add(Rect::new(20, 20, 4, 4), true);
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_bridge_merges_transitively() {
        let mut acc = DamageAccumulator::new();
        acc.add(Rect::new(0, 0, 4, 4), true);
        acc.add(Rect::new(10, 0, 4, 4), true);
        // Overlaps both
        acc.add(Rect::new(2, 0, 10, 2), true);
        assert_eq!(acc.rects(), &[Rect::new(0, 0, 14, 4)]);
    }

    #[test]
    fn test_uncombined_rects_not_merged() {
        let mut acc = DamageAccumulator::new();
        acc.add(Rect::new(0, 0, 10, 10), false);
        acc.add(Rect::new(5, 5, 10, 10), false);
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn test_covered_rect_dropped() {
        let mut acc = DamageAccumulator::new();
        acc.add(Rect::new(0, 0, 10, 10), false);
        acc.add(Rect::new(2, 2, 3, 3), false);
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_overflow_collapses() {
        let mut acc = DamageAccumulator::new();
        for i in 0..(MAX_DAMAGE_RECTS as i32 + 1) {
            acc.add(Rect::new(i * 10, 0, 2, 2), true);
        }
        assert_eq!(acc.len(), 1);
        assert_eq!(
            acc.rects()[0],
            Rect::new(0, 0, MAX_DAMAGE_RECTS as u32 * 10 + 2, 2)
        );
    }

    #[test]
    fn test_drain_empties() {
        let mut acc = DamageAccumulator::new();
        acc.add(Rect::new(0, 0, 2, 2), true);
        let drained = acc.drain();
        assert_eq!(drained.len(), 1);
        assert!(acc.is_empty());
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (0i32..100, 0i32..100, 1u32..30, 1u32..30).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_damage_covers_every_input(rects in proptest::collection::vec(rect_strategy(), 0..20)) {
            let mut acc = DamageAccumulator::new();
            for r in &rects {
                acc.add(*r, true);
            }
            for r in &rects {
                prop_assert!(acc.rects().iter().any(|d| d.contains(r)));
            }
        }

        #[test]
        fn prop_combined_damage_never_overlaps(rects in proptest::collection::vec(rect_strategy(), 0..20)) {
            let mut acc = DamageAccumulator::new();
            for r in &rects {
                acc.add(*r, true);
            }
            let out = acc.rects();
            for i in 0..out.len() {
                for j in (i + 1)..out.len() {
                    prop_assert!(!out[i].intersects(&out[j]));
                }
            }
        }

        #[test]
        fn prop_merge_order_does_not_change_coverage(rects in proptest::collection::vec(rect_strategy(), 1..12)) {
            let mut forward = DamageAccumulator::new();
            let mut backward = DamageAccumulator::new();
            for r in &rects {
                forward.add(*r, true);
            }
            for r in rects.iter().rev() {
                backward.add(*r, true);
            }
            prop_assert_eq!(forward.bounding_box(), backward.bounding_box());
        }
    }
}
