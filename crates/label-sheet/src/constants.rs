//! Shared constants for label sheet composition
//!
//! This module centralizes the physical measurements of the four-up sheet
//! and the unit conversions used to turn them into pixels and points.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// PDF points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert millimeters to a pixel count at the given resolution.
///
/// The result is `round(length_mm / 25.4 * dpi)` with ties rounded to the
/// even integer, so `mm_to_px(12.7, 1) == 0` and `mm_to_px(12.7, 3) == 2`.
/// Negative, NaN and infinite lengths map to 0; results beyond `u32::MAX`
/// saturate.
#[inline]
pub fn mm_to_px(length_mm: f64, dpi: u32) -> u32 {
    if !length_mm.is_finite() || length_mm <= 0.0 {
        return 0;
    }
    (length_mm / MM_PER_INCH * f64::from(dpi)).round_ties_even() as u32
}

/// Convert a pixel count to PDF points at the given resolution
#[inline]
pub fn px_to_pt(px: u32, dpi: u32) -> f32 {
    px as f32 * POINTS_PER_INCH / dpi as f32
}

// =============================================================================
// Resolution
// =============================================================================

/// Default rasterisation and output resolution (dots per inch)
pub const DEFAULT_DPI: u32 = 300;

/// Highest accepted resolution
pub const MAX_DPI: u32 = 1200;

/// Largest RGB canvas, in bytes, a composition may allocate (1 GiB)
pub const MAX_CANVAS_BYTES: u64 = 1 << 30;

// =============================================================================
// Sheet Geometry (A4, four 100×150 mm labels)
// =============================================================================

/// Output page width (A4)
pub const PAGE_WIDTH_MM: f64 = 210.0;

/// Output page height (A4)
pub const PAGE_HEIGHT_MM: f64 = 297.0;

/// Width of one label slot
pub const SLOT_WIDTH_MM: f64 = 100.0;

/// Height of one label slot
pub const SLOT_HEIGHT_MM: f64 = 150.0;

/// Distance from the page edge to the first slot, on both axes
pub const MARGIN_MM: f64 = 5.0;

/// Space between adjacent slots, on both axes
pub const GAP_MM: f64 = 5.0;

/// Slot grid columns
pub const GRID_COLUMNS: usize = 2;

/// Slot grid rows
pub const GRID_ROWS: usize = 2;

/// Number of slots on a sheet
pub const SLOT_COUNT: usize = GRID_COLUMNS * GRID_ROWS;

// =============================================================================
// Preview
// =============================================================================

/// Default width of the downscaled preview image (pixels)
pub const DEFAULT_PREVIEW_WIDTH: u32 = 800;
