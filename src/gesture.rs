//! Gesture state machine: idle, dragging one puppet, or pinch-zooming one puppet.
//!
//! `GestureState` is the active gesture tracked between pointer-down and
//! pointer-up, carrying all context needed to compute the next transform.
//! `GestureClassifier` owns the state plus the tap-suppression flag and
//! applies drag and pinch updates to a renderer node. Deciding *which* puppet
//! a gesture targets is the controller's job; this module only moves it.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::consts::{MAX_ZOOM, MIN_ZOOM, PINCH_MIN_DISTANCE};
use crate::geom::Point;
use crate::scene::{ObjectId, Transformable};

/// The active gesture. Exactly one variant holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A single pointer is moving a puppet.
    Dragging {
        /// Puppet being dragged.
        target: ObjectId,
        /// Pointer position minus puppet position at grab time, in parent space.
        grab_offset: Point,
    },
    /// Two pointers are scaling a puppet.
    Pinching {
        /// Puppet being scaled (always the selection when the pinch began).
        target: ObjectId,
        /// Distance between the two pointers when the pinch began.
        initial_distance: f64,
        /// Midpoint of the two pointers when the pinch began; stays fixed on the puppet.
        initial_midpoint: Point,
        /// Puppet scale when the pinch began.
        initial_scale: f64,
    },
}

impl GestureState {
    /// Puppet the gesture acts on, if any.
    #[must_use]
    pub fn target(&self) -> Option<ObjectId> {
        match *self {
            Self::Idle => None,
            Self::Dragging { target, .. } | Self::Pinching { target, .. } => Some(target),
        }
    }

    /// Number of tracked pointers this gesture requires.
    #[must_use]
    pub fn required_pointers(&self) -> usize {
        match self {
            Self::Idle => 0,
            Self::Dragging { .. } => 1,
            Self::Pinching { .. } => 2,
        }
    }
}

/// Clamp a scale into `[min, max]`.
#[must_use]
pub fn clamp_zoom(scale: f64, min: f64, max: f64) -> f64 {
    scale.max(min).min(max)
}

/// Rescale `node` while keeping the parent-space point `anchor` fixed on it.
///
/// The anchor is mapped into local space before the scale changes and back
/// out afterwards; the node is then shifted by the difference.
pub fn zoom_about<T: Transformable + ?Sized>(node: &mut T, anchor: Point, new_scale: f64) {
    let local = node.parent_to_local(anchor);
    node.set_scale(new_scale);
    let moved = node.local_to_parent(local);
    node.set_position(node.position() - (moved - anchor));
}

/// Scale after one wheel notch. Negative `delta_y` (wheel up) zooms in.
#[must_use]
pub fn wheel_scale(current: f64, delta_y: f64, sensitivity: f64) -> f64 {
    if delta_y.abs() < f64::EPSILON {
        return current;
    }
    let direction = if delta_y < 0.0 { 1.0 } else { -1.0 };
    current * (direction * sensitivity).exp()
}

/// Owns the gesture state and applies its transform updates.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    state: GestureState,
    suppress_tap: bool,
    min_zoom: f64,
    max_zoom: f64,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(MIN_ZOOM, MAX_ZOOM)
    }
}

impl GestureClassifier {
    #[must_use]
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        Self { state: GestureState::Idle, suppress_tap: false, min_zoom, max_zoom }
    }

    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    #[must_use]
    pub fn target(&self) -> Option<ObjectId> {
        self.state.target()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        matches!(self.state, GestureState::Pinching { .. })
    }

    /// Whether movement since the interaction started rules out a tap.
    #[must_use]
    pub fn tap_suppressed(&self) -> bool {
        self.suppress_tap
    }

    /// Record positional change that rules out a tap for this interaction.
    pub fn mark_moved(&mut self) {
        self.suppress_tap = true;
    }

    /// Read and clear the tap-suppression flag.
    pub fn take_tap_suppression(&mut self) -> bool {
        std::mem::take(&mut self.suppress_tap)
    }

    /// Start dragging `target`, grabbed at parent-space `pointer`.
    pub fn begin_drag<T: Transformable + ?Sized>(&mut self, target: ObjectId, pointer: Point, node: &T) {
        self.state = GestureState::Dragging { target, grab_offset: pointer - node.position() };
    }

    /// Move the dragged puppet under `pointer`. Returns false when not dragging.
    pub fn drag_to<T: Transformable + ?Sized>(&mut self, pointer: Point, node: &mut T) -> bool {
        let GestureState::Dragging { grab_offset, .. } = self.state else {
            return false;
        };
        node.set_position(pointer - grab_offset);
        self.suppress_tap = true;
        true
    }

    /// Start pinching `target` with pointers at `a` and `b`.
    ///
    /// Any drag in progress is replaced. A pinch always counts as movement.
    pub fn begin_pinch<T: Transformable + ?Sized>(&mut self, target: ObjectId, a: Point, b: Point, node: &T) {
        self.state = GestureState::Pinching {
            target,
            initial_distance: a.distance(b),
            initial_midpoint: a.midpoint(b),
            initial_scale: node.scale(),
        };
        self.suppress_tap = true;
    }

    /// Rescale the pinched puppet for pointers now at `a` and `b`.
    ///
    /// Returns the new scale when it changed. Pinches that began with
    /// coincident pointers never rescale.
    pub fn pinch_to<T: Transformable + ?Sized>(&mut self, a: Point, b: Point, node: &mut T) -> Option<f64> {
        let GestureState::Pinching { initial_distance, initial_midpoint, initial_scale, .. } = self.state else {
            return None;
        };
        self.suppress_tap = true;
        if initial_distance < PINCH_MIN_DISTANCE {
            return None;
        }
        let factor = a.distance(b) / initial_distance;
        let new_scale = clamp_zoom(initial_scale * factor, self.min_zoom, self.max_zoom);
        if (new_scale - node.scale()).abs() < f64::EPSILON {
            return None;
        }
        zoom_about(node, initial_midpoint, new_scale);
        Some(new_scale)
    }

    /// Drop the current gesture, returning the puppet it targeted.
    pub fn end(&mut self) -> Option<ObjectId> {
        let target = self.state.target();
        self.state = GestureState::Idle;
        target
    }

    /// Abort the gesture if it targets `id`. Returns true when aborted.
    pub fn forget(&mut self, id: ObjectId) -> bool {
        if self.state.target() == Some(id) {
            self.state = GestureState::Idle;
            return true;
        }
        false
    }

    /// Clamp `scale` with this classifier's zoom limits.
    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        clamp_zoom(scale, self.min_zoom, self.max_zoom)
    }
}
