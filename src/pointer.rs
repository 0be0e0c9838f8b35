//! Tracking of currently pressed pointers (mouse buttons and touch points).
//!
//! Every other interaction component reads from the tracker; it holds no
//! gesture knowledge of its own.

#[cfg(test)]
#[path = "pointer_test.rs"]
mod pointer_test;

use std::collections::BTreeMap;

use crate::geom::Point;

/// Identifier the input source assigns to a pointer for the life of one press.
pub type PointerId = i32;

/// Last known state of one pressed pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub id: PointerId,
    pub position: Point,
    /// Always `true` while the sample is tracked; released samples are handed back with `false`.
    pub active: bool,
}

/// The set of pressed pointers.
///
/// Samples are kept ordered by pointer id so `positions()` is stable across
/// the handling of a single event.
#[derive(Debug, Default)]
pub struct PointerTracker {
    samples: BTreeMap<PointerId, PointerSample>,
}

impl PointerTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `id`, replacing any stale sample with the same id.
    pub fn press(&mut self, id: PointerId, position: Point) {
        self.samples.insert(id, PointerSample { id, position, active: true });
    }

    /// Update the position of a tracked pointer.
    ///
    /// Returns the previous position, or `None` when `id` is not tracked (the
    /// pointer was pressed before the controller attached, or belongs to
    /// someone else) and the update was ignored.
    pub fn move_to(&mut self, id: PointerId, position: Point) -> Option<Point> {
        let sample = self.samples.get_mut(&id)?;
        let previous = sample.position;
        sample.position = position;
        Some(previous)
    }

    /// Stop tracking `id`, returning its final sample.
    pub fn release(&mut self, id: PointerId) -> Option<PointerSample> {
        self.samples.remove(&id).map(|sample| PointerSample { active: false, ..sample })
    }

    /// Forget every pointer.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn is_tracked(&self, id: PointerId) -> bool {
        self.samples.contains_key(&id)
    }

    #[must_use]
    pub fn position(&self, id: PointerId) -> Option<Point> {
        self.samples.get(&id).map(|s| s.position)
    }

    /// Positions of all tracked pointers, ordered by pointer id.
    #[must_use]
    pub fn positions(&self) -> Vec<Point> {
        self.samples.values().map(|s| s.position).collect()
    }

    /// The two pointers of a pinch, if exactly two are tracked.
    #[must_use]
    pub fn pair(&self) -> Option<(Point, Point)> {
        if self.samples.len() != 2 {
            return None;
        }
        let mut it = self.samples.values();
        let a = it.next()?.position;
        let b = it.next()?.position;
        Some((a, b))
    }

    /// The only tracked pointer, if exactly one is tracked.
    #[must_use]
    pub fn single(&self) -> Option<Point> {
        if self.samples.len() != 1 {
            return None;
        }
        self.samples.values().next().map(|s| s.position)
    }
}
