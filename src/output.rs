//! CLI output formatting for batch runs.
//!
//! # Output Format
//!
//! ```text
//! Resizing 3 images to 800x600 (crop-to-fill)
//!     Output: thumbs/
//! [001/003] dawn.jpg
//!     → thumbs/dawn_resized.jpg
//! [002/003] notes.gif
//!     ✗ could not decode photos/notes.gif: ...
//! [003/003] dusk.png
//!     → thumbs/dusk_resized.png
//!
//! Resized 2 of 3 images (1 failed)
//! ```
//!
//! Progress lines lead with the 1-based position and the item's display
//! name; the written path or the error follows as an indented context line.
//!
//! # Architecture
//!
//! Each piece has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::batch::{BatchConfig, BatchEvent};
use crate::types::BatchResult;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "image" } else { "images" }
}

// ============================================================================
// Batch header
// ============================================================================

/// Lines printed once before the first item.
///
/// ```text
/// Resizing 3 images to 800x600 (crop-to-fill)
///     Output: thumbs/
/// ```
pub fn format_batch_header(total: usize, config: &BatchConfig) -> Vec<String> {
    let mut lines = vec![format!(
        "Resizing {} {} to {} ({})",
        total,
        plural(total),
        config.target,
        config.fit_mode
    )];
    lines.push(format!("    Output: {}", config.output_dir.display()));
    if let Some(factor) = config.brightness.filter(|f| *f != 1.0) {
        lines.push(format!("    Brightness: x{factor}"));
    }
    if config.jobs > 1 {
        lines.push(format!("    Workers: {}", config.jobs));
    }
    lines
}

pub fn print_batch_header(total: usize, config: &BatchConfig) {
    for line in format_batch_header(total, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Progress events
// ============================================================================

/// `[003/010] dawn.jpg` for the 0-based `index`.
pub fn format_progress(index: usize, total: usize, display_name: &str) -> String {
    format!(
        "[{}/{}] {}",
        format_index(index + 1),
        format_index(total),
        display_name
    )
}

pub fn format_item_done(output: &Path) -> String {
    format!("    → {}", output.display())
}

pub fn format_item_failed(error: &str) -> String {
    format!("    ✗ {}", error)
}

/// Final summary, with failure and cancellation counts only when non-zero.
///
/// ```text
/// Resized 8 of 10 images (1 failed, 1 cancelled)
/// ```
pub fn format_summary(result: &BatchResult) -> String {
    let mut extras = Vec::new();
    if result.failed > 0 {
        extras.push(format!("{} failed", result.failed));
    }
    if result.cancelled > 0 {
        extras.push(format!("{} cancelled", result.cancelled));
    }
    let head = format!(
        "Resized {} of {} {}",
        result.processed,
        result.total,
        plural(result.total)
    );
    if extras.is_empty() {
        head
    } else {
        format!("{} ({})", head, extras.join(", "))
    }
}

/// Format a single batch event as display lines.
pub fn format_event(event: &BatchEvent) -> Vec<String> {
    match event {
        BatchEvent::Started {
            index,
            total,
            display_name,
        } => vec![format_progress(*index, *total, display_name)],
        BatchEvent::Done { output, .. } => vec![format_item_done(output)],
        BatchEvent::Failed { error, .. } => vec![format_item_failed(error)],
        BatchEvent::Finished(result) => vec![String::new(), format_summary(result)],
    }
}

pub fn print_event(event: &BatchEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}
