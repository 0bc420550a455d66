// File: crates/linetool-core/src/geometry.rs
// Summary: Pure 2D geometry kernel: points, lines, boxes, half-planes, intersections, distances.

/// Determinant magnitude below which two directions count as parallel.
const EPSILON: f64 = 1e-6;

/// Iteration cap for the Cohen-Sutherland clip loop.
const CLIP_ITERATIONS_MAX: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn add_scaled(self, other: Point, scale: f64) -> Point {
        Point::new(self.x + scale * other.x, self.y + scale * other.y)
    }

    pub fn subtract(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn scaled(self, scale: f64) -> Point {
        Point::new(self.x * scale, self.y * scale)
    }

    pub fn normalized(self) -> Point {
        self.scaled(1.0 / self.length())
    }

    /// Perpendicular direction (rotated 90 degrees counter-clockwise).
    pub fn transposed(self) -> Point {
        Point::new(-self.y, self.x)
    }
}

/// A line in `ax + by + c = 0` form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

pub fn line(a: f64, b: f64, c: f64) -> Line {
    Line { a, b, c }
}

/// Line through two distinct points.
///
/// Panics if the points coincide; callers must ensure distinctness.
pub fn line_through_points(a: Point, b: Point) -> Line {
    assert!(a != b, "points of a line should be distinct");
    line(a.y - b.y, b.x - a.x, a.x * b.y - b.x * a.y)
}

pub type Segment = [Point; 2];

pub fn line_segment(a: Point, b: Point) -> Segment {
    assert!(a != b, "points of a segment should be distinct");
    [a, b]
}

/// Axis-aligned box normalized so that `min <= max` on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Box2 {
    pub min: Point,
    pub max: Point,
}

impl Box2 {
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HalfPlane {
    pub edge: Line,
    pub is_positive: bool,
}

pub fn half_plane_through_point(edge: Line, point: Point) -> HalfPlane {
    HalfPlane { edge, is_positive: edge.a * point.x + edge.b * point.y + edge.c > 0.0 }
}

pub fn point_in_half_plane(point: Point, half_plane: HalfPlane) -> bool {
    let edge = half_plane.edge;
    (edge.a * point.x + edge.b * point.y + edge.c > 0.0) == half_plane.is_positive
}

/// Result of clipping a line or segment against a box: either it degenerates
/// to a single point or survives as a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoxClip {
    Point(Point),
    Segment(Segment),
}

impl BoxClip {
    pub fn as_segment(self) -> Option<Segment> {
        match self {
            BoxClip::Segment(segment) => Some(segment),
            BoxClip::Point(_) => None,
        }
    }
}

fn push_unique(points: &mut Vec<Point>, point: Point) {
    if !points.iter().any(|p| *p == point) {
        points.push(point);
    }
}

/// Intersect an infinite line with a box. Returns the boundary crossing(s),
/// or `None` when the line misses the box entirely.
pub fn intersect_line_and_box(l: Line, b: Box2) -> Option<BoxClip> {
    if l.a == 0.0 {
        let y = -l.c / l.b;
        return if b.min.y <= y && y <= b.max.y {
            Some(BoxClip::Segment(line_segment(Point::new(b.min.x, y), Point::new(b.max.x, y))))
        } else {
            None
        };
    }
    if l.b == 0.0 {
        let x = -l.c / l.a;
        return if b.min.x <= x && x <= b.max.x {
            Some(BoxClip::Segment(line_segment(Point::new(x, b.min.y), Point::new(x, b.max.y))))
        } else {
            None
        };
    }

    let mut points: Vec<Point> = Vec::with_capacity(2);
    let at_x = |x: f64, points: &mut Vec<Point>| {
        let y = -(l.c + l.a * x) / l.b;
        if b.min.y <= y && y <= b.max.y {
            push_unique(points, Point::new(x, y));
        }
    };
    let at_y = |y: f64, points: &mut Vec<Point>| {
        let x = -(l.c + l.b * y) / l.a;
        if b.min.x <= x && x <= b.max.x {
            push_unique(points, Point::new(x, y));
        }
    };

    at_x(b.min.x, &mut points);
    at_y(b.min.y, &mut points);
    at_x(b.max.x, &mut points);
    at_y(b.max.y, &mut points);

    match points.len() {
        0 => None,
        1 => Some(BoxClip::Point(points[0])),
        2 => {
            if points[0] == points[1] {
                Some(BoxClip::Point(points[0]))
            } else {
                Some(BoxClip::Segment(line_segment(points[0], points[1])))
            }
        }
        _ => unreachable!("a line meets a box boundary in at most two points"),
    }
}

/// Intersect the ray `point0 -> point1 -> ...` with a box, returning the exit
/// point (or entry point when the origin lies outside).
pub fn intersect_ray_and_box(point0: Point, point1: Point, b: Box2) -> Option<Point> {
    let corners = [
        (b.min, Point::new(b.max.x, b.min.y)),
        (Point::new(b.max.x, b.min.y), b.max),
        (b.max, Point::new(b.min.x, b.max.y)),
        (Point::new(b.min.x, b.max.y), b.min),
    ];

    let mut params: Vec<f64> = Vec::with_capacity(4);
    for (edge0, edge1) in corners {
        if let Some(t) = intersect_line_segments(point0, point1, edge0, edge1) {
            if t >= 0.0 {
                params.push(t);
            }
        }
    }

    if params.is_empty() {
        return None;
    }
    params.sort_by(f64::total_cmp);

    let t = if point_in_box(point0, b) { params[0] } else { params[params.len() - 1] };
    Some(point0.add_scaled(point1.subtract(point0), t))
}

/// Parameter along `point0->point1` where it crosses segment `point2->point3`,
/// or `None` when parallel or the crossing misses the second segment.
pub fn intersect_line_segments(point0: Point, point1: Point, point2: Point, point3: Point) -> Option<f64> {
    let dir0 = point1.subtract(point0);
    let dir1 = point3.subtract(point2);
    let det = dir0.x * dir1.y - dir0.y * dir1.x;
    if det.abs() < EPSILON {
        return None;
    }
    let offset = point0.subtract(point2);
    let t = (offset.y * dir1.x - offset.x * dir1.y) / det;

    let crossing = point1.subtract(point0).scaled(t).add(point0);
    let on_other = distance_to_segment(point2, point3, crossing);
    if on_other.distance.abs() < EPSILON {
        Some(t)
    } else {
        None
    }
}

fn out_code(x: f64, y: f64, b: Box2) -> u8 {
    let mut code = 0u8;
    if x < b.min.x {
        code |= 1;
    } else if x > b.max.x {
        code |= 2;
    }
    if y < b.min.y {
        code |= 4;
    } else if y > b.max.y {
        code |= 8;
    }
    code
}

/// Cohen-Sutherland clip of a finite segment against a box.
///
/// Panics if the clip loop fails to terminate within the iteration cap; that
/// indicates a logic defect, not bad input.
pub fn intersect_line_segment_and_box(segment: Segment, b: Box2) -> Option<BoxClip> {
    let (mut x0, mut y0) = (segment[0].x, segment[0].y);
    let (mut x1, mut y1) = (segment[1].x, segment[1].y);

    let mut code0 = out_code(x0, y0, b);
    let mut code1 = out_code(x1, y1, b);
    let mut inside = false;

    let mut iterations = 0u32;
    loop {
        if iterations > CLIP_ITERATIONS_MAX {
            panic!("Cohen-Sutherland clip loop failed to terminate");
        }
        iterations += 1;

        if code0 | code1 == 0 {
            inside = true;
            break;
        }
        if code0 & code1 != 0 {
            break;
        }

        let outside = if code0 != 0 { code0 } else { code1 };
        let (x, y);
        if outside & 8 != 0 {
            x = x0 + (x1 - x0) * (b.max.y - y0) / (y1 - y0);
            y = b.max.y;
        } else if outside & 4 != 0 {
            x = x0 + (x1 - x0) * (b.min.y - y0) / (y1 - y0);
            y = b.min.y;
        } else if outside & 2 != 0 {
            y = y0 + (y1 - y0) * (b.max.x - x0) / (x1 - x0);
            x = b.max.x;
        } else {
            y = y0 + (y1 - y0) * (b.min.x - x0) / (x1 - x0);
            x = b.min.x;
        }

        if outside == code0 {
            x0 = x;
            y0 = y;
            code0 = out_code(x0, y0, b);
        } else {
            x1 = x;
            y1 = y;
            code1 = out_code(x1, y1, b);
        }
    }

    if !inside {
        return None;
    }
    let p0 = Point::new(x0, y0);
    let p1 = Point::new(x1, y1);
    if p0 == p1 {
        Some(BoxClip::Point(p0))
    } else {
        Some(BoxClip::Segment(line_segment(p0, p1)))
    }
}

/// Distance from a point to a line plus the normalized projection parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceResult {
    pub distance: f64,
    pub coeff: f64,
}

pub fn distance_to_line(point0: Point, point1: Point, target: Point) -> DistanceResult {
    let direction = point1.subtract(point0);
    let coeff = target.subtract(point0).dot(direction) / direction.dot(direction);
    DistanceResult { coeff, distance: point0.add_scaled(direction, coeff).subtract(target).length() }
}

pub fn distance_to_segment(point0: Point, point1: Point, target: Point) -> DistanceResult {
    let line_distance = distance_to_line(point0, point1, target);
    if (0.0..=1.0).contains(&line_distance.coeff) {
        return line_distance;
    }

    let to_start = point0.subtract(target).length();
    let to_end = point1.subtract(target).length();
    if to_start < to_end {
        DistanceResult { coeff: 0.0, distance: to_start }
    } else {
        DistanceResult { coeff: 1.0, distance: to_end }
    }
}

pub fn point_in_box(point: Point, b: Box2) -> bool {
    point.x >= b.min.x && point.x <= b.max.x && point.y >= b.min.y && point.y <= b.max.y
}

/// Ray-casting containment test (even-odd rule).
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let mut inside = false;
    let mut j = polygon.len().wrapping_sub(1);
    for i in 0..polygon.len() {
        let curr = polygon[i];
        let prev = polygon[j];
        j = i;

        let crosses = (curr.y < point.y && prev.y >= point.y) || (prev.y < point.y && curr.y >= point.y);
        if crosses && curr.x + (point.y - curr.y) / (prev.y - curr.y) * (prev.x - curr.x) < point.x {
            inside = !inside;
        }
    }
    inside
}

/// The segment from the centroid to an interior point crosses no triangle edge.
pub fn point_in_triangle(point: Point, end0: Point, end1: Point, end2: Point) -> bool {
    let middle = end0.add(end1).scaled(0.5).add(end2).scaled(0.5);
    intersect_line_segments(end0, end1, middle, point).is_none()
        && intersect_line_segments(end1, end2, middle, point).is_none()
        && intersect_line_segments(end2, end0, middle, point).is_none()
}

pub fn point_in_circle(point: Point, center: Point, radius: f64) -> bool {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    dx * dx + dy * dy <= radius * radius
}

pub fn intersect_lines(line0: Line, line1: Line) -> Option<Point> {
    let det = line0.a * line1.b - line1.a * line0.b;
    if det.abs() < EPSILON {
        return None;
    }
    let x = (line0.b * line1.c - line1.b * line0.c) / det;
    let y = (line1.a * line0.c - line0.a * line1.c) / det;
    Some(Point::new(x, y))
}

fn push_clip_point(points: &mut Vec<Point>, point: Point) {
    let duplicate = match (points.last(), points.first()) {
        (Some(&last), Some(&first)) => last == point && first == point,
        _ => false,
    };
    if !duplicate {
        points.push(point);
    }
}

/// Sutherland-Hodgman style clip of a polygon against one half-plane.
/// Returns `None` when fewer than 3 vertices survive.
pub fn intersect_polygon_and_half_plane(points: &[Point], half_plane: HalfPlane) -> Option<Vec<Point>> {
    let mut clipped: Vec<Point> = Vec::with_capacity(points.len() + 1);
    for i in 0..points.len() {
        let current = points[i];
        let next = points[(i + 1) % points.len()];
        let edge = line_through_points(current, next);

        if point_in_half_plane(current, half_plane) {
            push_clip_point(&mut clipped, current);
            if !point_in_half_plane(next, half_plane) {
                if let Some(crossing) = intersect_lines(edge, half_plane.edge) {
                    push_clip_point(&mut clipped, crossing);
                }
            }
        } else if point_in_half_plane(next, half_plane) {
            if let Some(crossing) = intersect_lines(edge, half_plane.edge) {
                push_clip_point(&mut clipped, crossing);
            }
        }
    }
    if clipped.len() >= 3 {
        Some(clipped)
    } else {
        None
    }
}
