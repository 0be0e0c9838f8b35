#![allow(clippy::float_cmp)]

use super::*;
use crate::geom::Rect;
use crate::puppet::BoxPuppet;
use crate::scene::HitTestable;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn puppet_at(x: f64, y: f64) -> BoxPuppet {
    BoxPuppet::new(100.0, 100.0).at(pt(x, y), 1.0)
}

const ID: ObjectId = ObjectId(7);

// =============================================================
// GestureState
// =============================================================

#[test]
fn default_state_is_idle() {
    let g = GestureClassifier::default();
    assert_eq!(g.state(), GestureState::Idle);
    assert!(g.target().is_none());
    assert!(!g.tap_suppressed());
}

#[test]
fn required_pointers_per_state() {
    assert_eq!(GestureState::Idle.required_pointers(), 0);
    assert_eq!(GestureState::Dragging { target: ID, grab_offset: pt(0.0, 0.0) }.required_pointers(), 1);
    let pinch = GestureState::Pinching {
        target: ID,
        initial_distance: 1.0,
        initial_midpoint: pt(0.0, 0.0),
        initial_scale: 1.0,
    };
    assert_eq!(pinch.required_pointers(), 2);
}

// =============================================================
// Dragging
// =============================================================

#[test]
fn begin_drag_records_grab_offset() {
    let mut g = GestureClassifier::default();
    let node = puppet_at(100.0, 100.0);
    g.begin_drag(ID, pt(110.0, 95.0), &node);
    assert_eq!(g.state(), GestureState::Dragging { target: ID, grab_offset: pt(10.0, -5.0) });
    assert!(g.is_dragging());
    assert!(!g.tap_suppressed());
}

#[test]
fn drag_keeps_grab_offset_so_puppet_does_not_jump() {
    let mut g = GestureClassifier::default();
    let mut node = puppet_at(100.0, 100.0);
    g.begin_drag(ID, pt(110.0, 95.0), &node);
    assert!(g.drag_to(pt(210.0, 195.0), &mut node));
    assert_eq!(node.position(), pt(200.0, 200.0));
    assert!(g.tap_suppressed());
}

#[test]
fn drag_to_without_drag_is_noop() {
    let mut g = GestureClassifier::default();
    let mut node = puppet_at(100.0, 100.0);
    assert!(!g.drag_to(pt(0.0, 0.0), &mut node));
    assert_eq!(node.position(), pt(100.0, 100.0));
    assert!(!g.tap_suppressed());
}

// =============================================================
// Pinching
// =============================================================

#[test]
fn begin_pinch_captures_initial_geometry_and_suppresses_tap() {
    let mut g = GestureClassifier::default();
    let node = puppet_at(100.0, 100.0);
    g.begin_pinch(ID, pt(50.0, 100.0), pt(150.0, 100.0), &node);
    assert_eq!(
        g.state(),
        GestureState::Pinching {
            target: ID,
            initial_distance: 100.0,
            initial_midpoint: pt(100.0, 100.0),
            initial_scale: 1.0,
        }
    );
    assert!(g.tap_suppressed());
}

#[test]
fn pinch_doubling_distance_doubles_scale() {
    let mut g = GestureClassifier::default();
    let mut node = puppet_at(100.0, 100.0);
    g.begin_pinch(ID, pt(50.0, 100.0), pt(150.0, 100.0), &node);
    let scale = g.pinch_to(pt(0.0, 100.0), pt(200.0, 100.0), &mut node);
    assert_eq!(scale, Some(2.0));
    assert_eq!(node.scale(), 2.0);
}

#[test]
fn pinch_keeps_initial_midpoint_fixed_on_puppet() {
    let mut g = GestureClassifier::default();
    let mut node = puppet_at(100.0, 100.0);
    let a = pt(110.0, 80.0);
    let b = pt(130.0, 120.0);
    let mid = a.midpoint(b);
    let local_before = node.parent_to_local(mid);

    g.begin_pinch(ID, a, b, &node);
    g.pinch_to(pt(90.0, 40.0), pt(150.0, 160.0), &mut node);

    let after = node.local_to_parent(local_before);
    assert!(approx_eq(after.x, mid.x));
    assert!(approx_eq(after.y, mid.y));
    assert!(approx_eq(node.scale(), 3.0));
}

#[test]
fn pinch_scale_is_clamped_to_max() {
    let mut g = GestureClassifier::new(0.5, 2.5);
    let mut node = puppet_at(0.0, 0.0);
    g.begin_pinch(ID, pt(-5.0, 0.0), pt(5.0, 0.0), &node);
    g.pinch_to(pt(-500.0, 0.0), pt(500.0, 0.0), &mut node);
    assert_eq!(node.scale(), 2.5);
}

#[test]
fn pinch_scale_is_clamped_to_min() {
    let mut g = GestureClassifier::new(0.5, 2.5);
    let mut node = puppet_at(0.0, 0.0);
    g.begin_pinch(ID, pt(-500.0, 0.0), pt(500.0, 0.0), &node);
    g.pinch_to(pt(-1.0, 0.0), pt(1.0, 0.0), &mut node);
    assert_eq!(node.scale(), 0.5);
}

#[test]
fn pinch_from_zero_distance_never_rescales() {
    let mut g = GestureClassifier::default();
    let mut node = puppet_at(0.0, 0.0);
    g.begin_pinch(ID, pt(10.0, 10.0), pt(10.0, 10.0), &node);
    assert_eq!(g.pinch_to(pt(0.0, 0.0), pt(100.0, 100.0), &mut node), None);
    assert_eq!(node.scale(), 1.0);
    assert_eq!(node.position(), pt(0.0, 0.0));
    assert!(g.tap_suppressed());
}

#[test]
fn pinch_to_without_pinch_is_noop() {
    let mut g = GestureClassifier::default();
    let mut node = puppet_at(0.0, 0.0);
    assert_eq!(g.pinch_to(pt(0.0, 0.0), pt(10.0, 0.0), &mut node), None);
}

// =============================================================
// Ending and forgetting
// =============================================================

#[test]
fn end_returns_previous_target() {
    let mut g = GestureClassifier::default();
    let node = puppet_at(0.0, 0.0);
    g.begin_drag(ID, pt(0.0, 0.0), &node);
    assert_eq!(g.end(), Some(ID));
    assert_eq!(g.state(), GestureState::Idle);
}

#[test]
fn forget_aborts_only_matching_target() {
    let mut g = GestureClassifier::default();
    let node = puppet_at(0.0, 0.0);
    g.begin_drag(ID, pt(0.0, 0.0), &node);
    assert!(!g.forget(ObjectId(99)));
    assert!(g.is_dragging());
    assert!(g.forget(ID));
    assert_eq!(g.state(), GestureState::Idle);
}

#[test]
fn take_tap_suppression_clears_flag() {
    let mut g = GestureClassifier::default();
    g.mark_moved();
    assert!(g.take_tap_suppression());
    assert!(!g.take_tap_suppression());
}

// =============================================================
// Free helpers
// =============================================================

#[test]
fn clamp_zoom_bounds() {
    assert_eq!(clamp_zoom(100.0, MIN_ZOOM, MAX_ZOOM), MAX_ZOOM);
    assert_eq!(clamp_zoom(0.0, MIN_ZOOM, MAX_ZOOM), MIN_ZOOM);
    assert_eq!(clamp_zoom(1.5, MIN_ZOOM, MAX_ZOOM), 1.5);
}

#[test]
fn zoom_about_anchor_stays_put() {
    let mut node = BoxPuppet::new(200.0, 100.0).at(pt(300.0, 200.0), 1.0);
    let anchor = pt(250.0, 180.0);
    let local = node.parent_to_local(anchor);
    zoom_about(&mut node, anchor, 4.0);
    let after = node.local_to_parent(local);
    assert!(approx_eq(after.x, anchor.x));
    assert!(approx_eq(after.y, anchor.y));
}

#[test]
fn zoom_about_centre_only_scales() {
    let mut node = BoxPuppet::new(100.0, 100.0).at(pt(50.0, 50.0), 1.0);
    zoom_about(&mut node, pt(50.0, 50.0), 2.0);
    assert!(approx_eq(node.position().x, 50.0));
    assert_eq!(node.bounds(), Rect::new(-50.0, -50.0, 200.0, 200.0));
}

#[test]
fn wheel_scale_direction() {
    assert!(wheel_scale(1.0, -120.0, 0.075) > 1.0);
    assert!(wheel_scale(1.0, 120.0, 0.075) < 1.0);
    assert!(approx_eq(wheel_scale(1.0, -1.0, 0.075), 0.075_f64.exp()));
    assert_eq!(wheel_scale(1.3, 0.0, 0.075), 1.3);
}
