// File: crates/linetool-core/src/tool/position.rs
// Summary: Long/short position tool: target derivation, min-move clamping, flip detection.

use super::{CoordinateMapper, LineTool, ToolPoint};

/// Multiplier applied to the entry-to-stop distance when deriving the target.
const TARGET_MULTIPLIER: f64 = 3.0;

/// Per-instance state for the long/short position tool. `click_count` drives
/// the two-click creation protocol; `is_long` is the orientation latched at
/// drag start so a crossing can be detected mid-drag.
#[derive(Clone, Copy, Debug, Default)]
pub struct PositionState {
    pub is_long: Option<bool>,
    pub preview_is_long: Option<bool>,
    pub click_count: u8,
}

/// Orientation implied by the current points: long iff entry above stop.
pub fn is_current_long(tool: &LineTool) -> bool {
    tool.points.len() == 3 && tool.points[0].price > tool.points[1].price
}

/// Creation protocol. The first click seeds entry plus a rolling stop/target
/// preview; the second click fixes the stop and finishes the tool.
pub fn add_point(tool: &mut LineTool, mut point: ToolPoint, conv: &dyn CoordinateMapper) {
    point.price = conv.round_price(point.price);

    if tool.points.is_empty() && tool.position.click_count == 1 {
        tool.points.push(point);
        tool.points.push(point);
        let target = calculate_third_point(tool, point, true, false, conv);
        tool.points.push(target);
    } else if !tool.finished && tool.position.click_count == 1 {
        tool.points[1] = point;
        let target = calculate_third_point(tool, point, true, false, conv);
        tool.points[2] = target;
    } else if tool.position.click_count == 2 && !tool.finished {
        tool.points[1] = point;
        let target = calculate_third_point(tool, point, true, false, conv);
        tool.points[2] = target;
        tool.try_finish(conv);
        tool.set_editing(false);
        tool.set_creating(false);
    } else {
        tool.points.push(point);
    }
}

/// Rolling preview while the pointer moves between the first and second click.
pub fn update_preview(tool: &mut LineTool, mut point: ToolPoint, conv: &dyn CoordinateMapper) {
    if tool.finished || tool.points.len() < 3 {
        return;
    }
    point.price = conv.round_price(point.price);
    tool.points[1] = point;
    tool.position.preview_is_long = Some(tool.points[0].price > point.price);
    let target = calculate_third_point(tool, point, true, false, conv);
    tool.points[2] = target;
    tool.touch();
}

/// Write an anchor and re-derive the target so it tracks entry/stop moves.
pub fn set_point(tool: &mut LineTool, index: usize, mut point: ToolPoint, flipped: bool, conv: &dyn CoordinateMapper) {
    point.price = conv.round_price(point.price);
    if index < tool.points.len() {
        tool.points[index] = point;
    }
    if index <= 2 && tool.points.len() == 3 {
        let target = calculate_third_point(tool, tool.points[2], false, flipped, conv);
        tool.points[2] = target;
    }
}

pub fn get_point(tool: &LineTool, index: usize, conv: &dyn CoordinateMapper) -> Option<ToolPoint> {
    if index == 3 && tool.points.len() == 3 {
        // Hidden right-hand target anchor.
        return Some(calculate_third_point(tool, tool.points[2], false, false, conv));
    }
    None
}

/// Re-derive the target after an orientation flip or an entry/stop move.
pub fn update_target(tool: &mut LineTool, flipped: bool, conv: &dyn CoordinateMapper) {
    if tool.points.len() == 3 {
        let target = calculate_third_point(tool, tool.points[2], false, flipped, conv);
        tool.points[2] = target;
        tool.touch();
    }
}

/// Does dragging `point_index` to `new_price` cross the opposite level and
/// reverse the long/short orientation latched in `is_long`?
pub fn check_flip(tool: &LineTool, point_index: usize, new_price: f64, is_long: Option<bool>) -> bool {
    if tool.points.len() < 2 || point_index > 1 {
        return false;
    }
    let Some(is_long) = is_long else { return false };

    match point_index {
        // Entry dragged across the stop.
        0 => {
            (is_long && new_price < tool.points[1].price) || (!is_long && new_price > tool.points[1].price)
        }
        // Stop dragged across the entry.
        1 => {
            (is_long && new_price > tool.points[0].price) || (!is_long && new_price < tool.points[0].price)
        }
        _ => false,
    }
}

/// Target derivation. During creation the target sits at three times the
/// entry-to-stop distance on the profit side; afterwards the dragged target is
/// kept, re-multiplied only on a flip, and always clamped to at least one
/// minimum price move beyond the entry on the correct side.
pub fn calculate_third_point(
    tool: &LineTool,
    target_point: ToolPoint,
    initial_creation: bool,
    flipped: bool,
    conv: &dyn CoordinateMapper,
) -> ToolPoint {
    if tool.points.len() < 2 {
        return ToolPoint::default();
    }

    let min_move = conv.min_price_move();
    let entry_price = conv.round_price(tool.points[0].price);
    let stop_price = conv.round_price(tool.points[1].price);
    let distance = (entry_price - stop_price).abs();

    let mut target_price = conv.round_price(target_point.price);

    if initial_creation {
        let long = tool.position.preview_is_long.unwrap_or(entry_price > stop_price);
        target_price = if long {
            entry_price + distance * TARGET_MULTIPLIER
        } else {
            entry_price - distance * TARGET_MULTIPLIER
        };
    } else {
        let long = is_current_long(tool);
        if flipped {
            target_price = if long {
                entry_price + distance * TARGET_MULTIPLIER
            } else {
                entry_price - distance * TARGET_MULTIPLIER
            };
        }
        target_price = if long {
            target_price.max(entry_price + min_move)
        } else {
            target_price.min(entry_price - min_move)
        };
    }

    ToolPoint::new(target_price, tool.points[1].timestamp)
}
