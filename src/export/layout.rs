//! Pure layout math for the export renderer.
//!
//! All functions here are pure and testable without decoding a single image.
//! Dimensions are in logical units; the renderer multiplies by the
//! supersampling factor when it allocates the bitmap.

/// Supersampling factor between logical units and physical pixels.
pub const SCALE: u32 = 6;

/// Outer padding on all four sides.
pub const PADDING: f64 = 16.0;

/// Width of the tier label column.
pub const LABEL_WIDTH: f64 = 80.0;

/// Display height every item is drawn at; width follows the aspect ratio.
pub const IMAGE_HEIGHT: f64 = 64.0;

/// Gap between consecutive items in a row (no trailing gap).
pub const IMAGE_GAP: f64 = 6.0;

/// Height of each tier row.
pub const ROW_HEIGHT: f64 = 80.0;

/// Gap between consecutive rows (no trailing gap).
pub const ROW_GAP: f64 = 4.0;

/// Floor for the shared row width, so an empty list still exports a
/// reasonably sized image (400 logical units minus the outer padding).
pub const MIN_ROW_WIDTH: f64 = 400.0 - 2.0 * PADDING;

/// Corner radius of label and content blocks (outer corners only).
pub const BLOCK_RADIUS: f64 = 8.0;

/// Corner radius items are clipped to.
pub const IMAGE_RADIUS: f64 = 6.0;

/// Label text: starting font size, shrink floor, and horizontal inset.
pub const LABEL_FONT_START: u32 = 18;
pub const LABEL_FONT_FLOOR: u32 = 8;
pub const LABEL_TEXT_INSET: f64 = 12.0;

/// An item's display width from its intrinsic dimensions: fixed height,
/// width scaled by aspect ratio. Unknown dimensions fall back to a square.
pub fn display_width(dims: Option<(u32, u32)>) -> f64 {
    match dims {
        Some((w, h)) if w > 0 && h > 0 => IMAGE_HEIGHT * w as f64 / h as f64,
        _ => IMAGE_HEIGHT,
    }
}

/// Total width of one row's items: sum of display widths plus a gap between
/// consecutive items. An empty row has width 0.
pub fn row_width(item_widths: &[f64]) -> f64 {
    if item_widths.is_empty() {
        return 0.0;
    }
    item_widths.iter().sum::<f64>() + IMAGE_GAP * (item_widths.len() - 1) as f64
}

/// The single row width every tier shares: the widest row, floored at
/// [`MIN_ROW_WIDTH`]. Empty rows contribute 0 and can never win.
pub fn shared_row_width(rows: &[Vec<f64>]) -> f64 {
    rows.iter()
        .map(|widths| row_width(widths))
        .fold(MIN_ROW_WIDTH, f64::max)
}

/// Overall canvas geometry in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Width of each tier's content block (shared row width + inner padding).
    pub content_width: f64,
    pub total_width: f64,
    pub total_height: f64,
}

/// Compute the canvas layout from the per-tier item display widths.
pub fn compute(rows: &[Vec<f64>]) -> Layout {
    let content_width = shared_row_width(rows) + 2.0 * PADDING;
    Layout {
        content_width,
        total_width: LABEL_WIDTH + content_width + 2.0 * PADDING,
        total_height: rows.len() as f64 * (ROW_HEIGHT + ROW_GAP) + 2.0 * PADDING - ROW_GAP,
    }
}
