//! Human readable progress lines from farm status snapshots.

use lnr_data::{NodeStatus, RenderMeta, TimeLeft};

pub const BAR_LENGTH: usize = 20;

/// `[####----]` with `round(length * progress)` filled blocks
pub fn progress_bar(length: usize, progress: f64) -> String {
    let blocks = (length as f64 * progress).round_ties_even();
    let blocks = blocks.max(0.0).min(length as f64) as usize;
    format!("[{}{}]", "#".repeat(blocks), "-".repeat(length - blocks))
}

pub fn format_frame(frame: Option<i64>) -> String {
    format!("{:>3}", frame.unwrap_or(0))
}

pub fn format_time_left(time_left: Option<&TimeLeft>) -> String {
    match time_left.and_then(TimeLeft::parts) {
        Some((minutes, seconds, millis)) => {
            format!("{:02}:{:02}.{:02}", minutes, seconds, millis)
        }
        None => "unknown".to_string(),
    }
}

pub fn format_percent(progress: f64) -> String {
    format!("{:>3}", (progress * 100.0).round_ties_even() as i64)
}

/// share of finished tiles of the current frame
pub fn tile_progress(node: &NodeStatus) -> f64 {
    match (node.current_tile, node.num_tiles) {
        (Some(tile), Some(total)) if total != 0 => tile as f64 / total as f64,
        _ => 0.0,
    }
}

/// overall animation progress as the farm defines it: the frame offset
/// divided by the absolute end frame
pub fn animation_progress(node: &NodeStatus, meta: &RenderMeta) -> f64 {
    match (node.current_frame, meta.start_frame, meta.end_frame) {
        (Some(frame), Some(start), Some(end)) if end != 0 => (frame - start) as f64 / end as f64,
        _ => 0.0,
    }
}

pub fn format_status(
    frame: Option<i64>,
    time_left: Option<&TimeLeft>,
    progress: f64,
    overall: Option<f64>,
) -> String {
    let mut line = format!(
        "frame: {} | time left: {} | progress: {}% {}",
        format_frame(frame),
        format_time_left(time_left),
        format_percent(progress),
        progress_bar(BAR_LENGTH, progress)
    );
    if let Some(overall) = overall {
        line.push_str(&format!(
            " | overall progress: {}% {}",
            format_percent(overall),
            progress_bar(BAR_LENGTH, overall)
        ));
    }
    line
}

/// progress line for the node, with the overall bar for animations
pub fn status_line(node: &NodeStatus, meta: Option<&RenderMeta>) -> String {
    let overall = meta
        .filter(|meta| meta.is_animation)
        .map(|meta| animation_progress(node, meta));
    format_status(
        node.current_frame,
        node.time_left.as_ref(),
        tile_progress(node),
        overall,
    )
}
