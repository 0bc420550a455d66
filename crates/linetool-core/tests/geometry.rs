// File: crates/linetool-core/tests/geometry.rs
// Purpose: Validate the geometry kernel's intersections, distances and containment tests.

use linetool_core::geometry::{
    distance_to_line, distance_to_segment, intersect_line_and_box, intersect_line_segment_and_box,
    intersect_lines, intersect_polygon_and_half_plane, intersect_ray_and_box, half_plane_through_point,
    line, line_segment, line_through_points, point_in_box, point_in_circle, point_in_polygon,
    point_in_triangle, Box2, BoxClip, Point,
};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[test]
fn line_box_intersection_lies_on_line_and_boundary() {
    let l = line_through_points(pt(-10.0, -10.0), pt(20.0, 14.0));
    let b = Box2::new(pt(0.0, 0.0), pt(10.0, 10.0));

    match intersect_line_and_box(l, b) {
        Some(BoxClip::Segment(segment)) => {
            for p in segment {
                // On the line equation...
                assert!((l.a * p.x + l.b * p.y + l.c).abs() < 1e-9);
                // ...and on the box boundary.
                let on_vertical = (p.x - b.min.x).abs() < 1e-9 || (p.x - b.max.x).abs() < 1e-9;
                let on_horizontal = (p.y - b.min.y).abs() < 1e-9 || (p.y - b.max.y).abs() < 1e-9;
                assert!(on_vertical || on_horizontal, "clip point {p:?} not on boundary");
                assert!(point_in_box(p, b));
            }
        }
        other => panic!("expected a segment, got {other:?}"),
    }
}

#[test]
fn line_box_miss_returns_none() {
    let l = line_through_points(pt(0.0, 100.0), pt(10.0, 100.0));
    let b = Box2::new(pt(0.0, 0.0), pt(10.0, 10.0));
    assert_eq!(intersect_line_and_box(l, b), None);
}

#[test]
fn horizontal_and_vertical_lines_clip_to_full_span() {
    let b = Box2::new(pt(0.0, 0.0), pt(10.0, 10.0));
    // a == 0: horizontal line y = 5
    match intersect_line_and_box(line(0.0, 1.0, -5.0), b) {
        Some(BoxClip::Segment([p0, p1])) => {
            assert_eq!((p0.x, p0.y), (0.0, 5.0));
            assert_eq!((p1.x, p1.y), (10.0, 5.0));
        }
        other => panic!("unexpected {other:?}"),
    }
    // b == 0: vertical line x = 3
    match intersect_line_and_box(line(1.0, 0.0, -3.0), b) {
        Some(BoxClip::Segment([p0, p1])) => {
            assert_eq!((p0.x, p0.y), (3.0, 0.0));
            assert_eq!((p1.x, p1.y), (3.0, 10.0));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn segment_box_clip_terminates_and_clips() {
    let b = Box2::new(pt(0.0, 0.0), pt(100.0, 100.0));

    // Fully inside: unchanged.
    let inside = intersect_line_segment_and_box(line_segment(pt(10.0, 10.0), pt(20.0, 20.0)), b);
    assert_eq!(inside, Some(BoxClip::Segment([pt(10.0, 10.0), pt(20.0, 20.0)])));

    // Crossing: clipped to the boundary.
    match intersect_line_segment_and_box(line_segment(pt(-50.0, 50.0), pt(150.0, 50.0)), b) {
        Some(BoxClip::Segment([p0, p1])) => {
            assert_eq!(p0, pt(0.0, 50.0));
            assert_eq!(p1, pt(100.0, 50.0));
        }
        other => panic!("unexpected {other:?}"),
    }

    // Fully outside on one side: nothing left.
    let outside = intersect_line_segment_and_box(line_segment(pt(-10.0, -10.0), pt(-5.0, -20.0)), b);
    assert_eq!(outside, None);
}

#[test]
fn ray_box_exits_through_far_edge() {
    let b = Box2::new(pt(0.0, 0.0), pt(100.0, 100.0));
    let exit = intersect_ray_and_box(pt(50.0, 50.0), pt(60.0, 50.0), b).expect("ray exits");
    assert!((exit.x - 100.0).abs() < 1e-9);
    assert!((exit.y - 50.0).abs() < 1e-9);
}

#[test]
fn near_parallel_lines_do_not_intersect() {
    let l0 = line(1.0, 1.0, 0.0);
    let l1 = line(1.0, 1.0 + 1e-9, -5.0);
    assert_eq!(intersect_lines(l0, l1), None);
}

#[test]
fn distance_coeff_is_projection_parameter() {
    let result = distance_to_line(pt(0.0, 0.0), pt(10.0, 0.0), pt(5.0, 4.0));
    assert!((result.coeff - 0.5).abs() < 1e-9);
    assert!((result.distance - 4.0).abs() < 1e-9);

    // Beyond the segment end, the segment distance clamps to the endpoint.
    let clamped = distance_to_segment(pt(0.0, 0.0), pt(10.0, 0.0), pt(14.0, 3.0));
    assert_eq!(clamped.coeff, 1.0);
    assert!((clamped.distance - 5.0).abs() < 1e-9);
}

#[test]
fn polygon_containment_even_odd() {
    let square = [pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)];
    assert!(point_in_polygon(pt(5.0, 5.0), &square));
    assert!(!point_in_polygon(pt(15.0, 5.0), &square));
    assert!(!point_in_polygon(pt(-3.0, -3.0), &square));

    let concave = [pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(5.0, 5.0), pt(0.0, 10.0)];
    assert!(point_in_polygon(pt(2.0, 3.0), &concave));
    assert!(!point_in_polygon(pt(5.0, 8.0), &concave));
}

#[test]
fn triangle_and_circle_containment() {
    assert!(point_in_triangle(pt(3.0, 2.0), pt(0.0, 0.0), pt(10.0, 0.0), pt(0.0, 10.0)));
    assert!(!point_in_triangle(pt(8.0, 8.0), pt(0.0, 0.0), pt(10.0, 0.0), pt(0.0, 10.0)));

    assert!(point_in_circle(pt(3.0, 4.0), pt(0.0, 0.0), 5.0));
    assert!(!point_in_circle(pt(3.0, 4.1), pt(0.0, 0.0), 5.0));
}

#[test]
fn half_plane_clip_keeps_inner_region() {
    let square = vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)];
    // Keep everything left of x = 5 (the side containing (0, 5)).
    let hp = half_plane_through_point(line(1.0, 0.0, -5.0), pt(0.0, 5.0));
    let clipped = intersect_polygon_and_half_plane(&square, hp).expect("non-degenerate clip");

    assert!(clipped.len() >= 3);
    for p in &clipped {
        assert!(p.x <= 5.0 + 1e-9, "{p:?} ended up on the wrong side");
    }

    // Clipping away everything leaves nothing.
    let hp_outside = half_plane_through_point(line(1.0, 0.0, 20.0), pt(-30.0, 0.0));
    assert_eq!(intersect_polygon_and_half_plane(&square, hp_outside), None);
}
