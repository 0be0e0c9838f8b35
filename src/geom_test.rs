#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_distance_is_euclidean() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_distance_is_symmetric() {
    let a = Point::new(-2.0, 7.5);
    let b = Point::new(10.0, -1.0);
    assert!(approx_eq(a.distance(b), b.distance(a)));
}

#[test]
fn point_midpoint() {
    let mid = Point::new(0.0, 10.0).midpoint(Point::new(100.0, 30.0));
    assert_eq!(mid, Point::new(50.0, 20.0));
}

#[test]
fn point_add_and_sub() {
    let a = Point::new(5.0, 6.0);
    let b = Point::new(1.0, 2.0);
    assert_eq!(a - b, Point::new(4.0, 4.0));
    assert_eq!(a + b, Point::new(6.0, 8.0));
}

// --- Rect ---

#[test]
fn rect_contains_interior_and_edges() {
    let r = Rect::new(10.0, 10.0, 20.0, 20.0);
    assert!(r.contains(Point::new(15.0, 15.0)));
    assert!(r.contains(Point::new(10.0, 10.0)));
    assert!(r.contains(Point::new(30.0, 30.0)));
}

#[test]
fn rect_excludes_outside_points() {
    let r = Rect::new(10.0, 10.0, 20.0, 20.0);
    assert!(!r.contains(Point::new(9.9, 15.0)));
    assert!(!r.contains(Point::new(15.0, 30.1)));
}

#[test]
fn rect_center() {
    assert_eq!(Rect::new(0.0, 0.0, 40.0, 20.0).center(), Point::new(20.0, 10.0));
}

// --- Transform ---

#[test]
fn transform_default_is_identity() {
    let t = Transform::default();
    let p = Point::new(12.0, -3.0);
    assert!(point_approx_eq(t.local_to_parent(p), p));
    assert!(point_approx_eq(t.parent_to_local(p), p));
}

#[test]
fn transform_anchor_maps_to_position() {
    let t = Transform { position: Point::new(200.0, 150.0), scale: 3.0, anchor: Point::new(50.0, 40.0) };
    assert!(point_approx_eq(t.local_to_parent(t.anchor), t.position));
}

#[test]
fn transform_scales_around_anchor() {
    let t = Transform { position: Point::new(100.0, 100.0), scale: 2.0, anchor: Point::new(10.0, 10.0) };
    assert!(point_approx_eq(t.local_to_parent(Point::new(0.0, 0.0)), Point::new(80.0, 80.0)));
}

#[test]
fn transform_round_trips_through_local_space() {
    let t = Transform { position: Point::new(-40.0, 75.0), scale: 0.37, anchor: Point::new(120.0, 300.0) };
    let parent = Point::new(13.5, 92.25);
    assert!(point_approx_eq(t.local_to_parent(t.parent_to_local(parent)), parent));
}

#[test]
fn transform_zero_scale_collapses_to_anchor() {
    let t = Transform { position: Point::new(5.0, 5.0), scale: 0.0, anchor: Point::new(1.0, 2.0) };
    assert_eq!(t.parent_to_local(Point::new(100.0, 100.0)), Point::new(1.0, 2.0));
}

#[test]
fn transform_rect_to_parent() {
    let t = Transform { position: Point::new(100.0, 100.0), scale: 2.0, anchor: Point::new(25.0, 50.0) };
    let r = t.rect_to_parent(Rect::new(0.0, 0.0, 50.0, 100.0));
    assert!(approx_eq(r.x, 50.0));
    assert!(approx_eq(r.y, 0.0));
    assert!(approx_eq(r.width, 100.0));
    assert!(approx_eq(r.height, 200.0));
}
