// File: crates/linetool-core/src/tool/channel.rs
// Summary: Parallel channel constraints: third-point correction, virtual handles, axis points.

use crate::geometry::Point;

use super::{CoordinateMapper, LineTool, ToolPoint};

/// Signed pixel height between the second boundary and the first.
fn find_pixels_height(tool: &LineTool, conv: &dyn CoordinateMapper) -> Option<f64> {
    let end2 = conv.point_to_screen(*tool.points.get(2)?)?;
    let end0 = conv.point_to_screen(*tool.points.get(0)?)?;
    Some(end2.y - end0.y)
}

/// Project the in-flight third point onto the vertical through the first point
/// so the second boundary stays parallel to the first.
pub fn correct_last_point(tool: &LineTool, point2: ToolPoint, conv: &dyn CoordinateMapper) -> ToolPoint {
    if tool.points.len() < 2 || tool.points[1].timestamp == tool.points[0].timestamp {
        return point2;
    }
    let (Some(screen2), Some(screen1), Some(screen0)) = (
        conv.point_to_screen(point2),
        conv.point_to_screen(tool.points[1]),
        conv.point_to_screen(tool.points[0]),
    ) else {
        return point2;
    };

    let heading = screen1.subtract(screen0);
    let scale = (screen2.x - screen0.x) / heading.x;
    let on_line = screen0.add_scaled(heading, scale);
    let displace_y = screen2.y - on_line.y;
    let corrected = screen0.add(Point::new(0.0, displace_y));
    conv.screen_to_point(corrected).unwrap_or(point2)
}

/// Anchor writes. Indices 0..2 are the stored points (moving an end drags the
/// opposite boundary along to preserve the channel height); 3 is the derived
/// second end of the second boundary; 4 and 5 are the midpoint handles that
/// displace one or both boundaries vertically.
pub fn set_point(tool: &mut LineTool, index: usize, point: ToolPoint, conv: &dyn CoordinateMapper) {
    if tool.points.len() < 3 {
        if index < tool.points.len() {
            tool.points[index] = point;
        }
        return;
    }
    if tool.points[0].timestamp == tool.points[1].timestamp && index >= 4 {
        return;
    }
    let (Some(screen0), Some(screen1), Some(screen)) = (
        conv.point_to_screen(tool.points[0]),
        conv.point_to_screen(tool.points[1]),
        conv.point_to_screen(point),
    ) else {
        return;
    };
    let moving_offset = find_pixels_height(tool, conv).unwrap_or(0.0);

    match index {
        0 => {
            tool.points[0] = point;
            if let Some(below) = conv.screen_to_point(Point::new(screen.x, screen.y + moving_offset)) {
                tool.points[2].price = below.price;
            }
        }
        1 => tool.points[1] = point,
        2 => {
            tool.points[2] = point;
            tool.points[0].timestamp = point.timestamp;
            if let Some(above) = conv.screen_to_point(Point::new(screen.x, screen.y - moving_offset)) {
                tool.points[0].price = above.price;
            }
        }
        3 => {
            tool.points[1].timestamp = point.timestamp;
            if let Some(above) = conv.screen_to_point(Point::new(screen.x, screen.y - moving_offset)) {
                tool.points[1].price = above.price;
            }
        }
        4 => {
            // Second-boundary midpoint: displace the third point only.
            let heading = screen1.subtract(screen0);
            let scale = (screen.x - screen0.x) / heading.x;
            let displace = screen.y - screen0.add_scaled(heading, scale).y;
            if let Some(moved) = conv.screen_to_point(Point::new(screen0.x, screen0.y + displace)) {
                tool.points[2].price = moved.price;
            }
        }
        5 => {
            // First-boundary midpoint: displace both stored ends.
            let heading = screen1.subtract(screen0);
            let scale = (screen.x - screen0.x) / heading.x;
            let displace = screen.y - screen0.add_scaled(heading, scale).y;
            if let Some(moved0) = conv.screen_to_point(Point::new(screen0.x, screen0.y + displace)) {
                tool.points[0].price = moved0.price;
            }
            if let Some(moved1) = conv.screen_to_point(Point::new(screen1.x, screen1.y + displace)) {
                tool.points[1].price = moved1.price;
            }
        }
        _ => {}
    }
}

/// Virtual anchors: 3 is the far end of the second boundary, 4 and 5 the
/// midpoints of the second and first boundary.
pub fn get_point(tool: &LineTool, index: usize, conv: &dyn CoordinateMapper) -> Option<ToolPoint> {
    if tool.points.len() < 3 {
        return None;
    }
    let end0 = conv.point_to_screen(tool.points[0])?;
    let end1 = conv.point_to_screen(tool.points[1])?;
    let end2 = conv.point_to_screen(tool.points[2])?;

    let height = end2.y - end0.y;
    let end3 = end1.add(Point::new(0.0, height));
    match index {
        3 => conv.screen_to_point(end3),
        4 => conv.screen_to_point(end2.add(end3).scaled(0.5)),
        5 => conv.screen_to_point(end0.add(end1).scaled(0.5)),
        _ => None,
    }
}

/// Stored points plus the derived fourth corner, for axis label placement.
pub fn axis_points(tool: &LineTool, conv: &dyn CoordinateMapper) -> Vec<ToolPoint> {
    let mut points = tool.points(conv);
    if tool.points.len() >= 3 {
        if let (Some(screen0), Some(screen1), Some(screen2)) = (
            conv.point_to_screen(tool.points[0]),
            conv.point_to_screen(tool.points[1]),
            conv.point_to_screen(tool.points[2]),
        ) {
            let height = screen1.y - screen0.y;
            if let Some(fourth) = conv.screen_to_point(screen2.add(Point::new(0.0, height))) {
                points.push(fourth);
            }
        }
    }
    points
}
