// File: crates/linetool-core/src/view/brush.rs
// Summary: Brush stroke densification and moving-average smoothing.

use crate::geometry::Point;

/// Insert evenly spaced sub-segment points between consecutive stroke points.
/// Coincident neighbors contribute no sub-segments and cannot loop.
pub fn interpolate(points: &[Point], smooth: f64) -> Vec<Point> {
    let smooth = smooth.max(1.0);
    if points.is_empty() {
        return Vec::new();
    }
    let mut computed = vec![points[0]];
    for i in 1..points.len() {
        let heading = points[i].subtract(points[i - 1]);
        let distance = heading.length();
        let iterations = ((distance / smooth).floor() as usize).min(5);
        if iterations >= 1 {
            let segment = heading.normalized().scaled(distance / iterations as f64);
            for j in 0..iterations.saturating_sub(1) {
                computed.push(points[i - 1].add(segment.scaled(j as f64)));
            }
        }
        computed.push(points[i]);
    }
    computed
}

/// Symmetric moving-average smoothing over `interval` neighbors; keeps the
/// final point so the stroke still ends under the pointer.
pub fn smooth_points(points: &[Point], interval: usize) -> Vec<Point> {
    if points.len() <= 1 {
        return points.to_vec();
    }
    let interval = interval.max(1);
    let mut computed = Vec::with_capacity(points.len() + 1);
    for j in 0..points.len() {
        let mut current = Point::new(0.0, 0.0);
        for i in 0..interval {
            let t = j.saturating_sub(i);
            let r = (j + i).min(points.len() - 1);
            current = current.add(points[t]);
            current = current.add(points[r]);
        }
        computed.push(current.scaled(0.5 / interval as f64));
    }
    computed.push(points[points.len() - 1]);
    computed
}
