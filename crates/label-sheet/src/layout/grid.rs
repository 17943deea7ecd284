//! Slot grid calculation
//!
//! This module converts the physical sheet description to pixels and
//! derives the top-left corner of every slot in the 2×2 grid.

use crate::constants::{DEFAULT_DPI, GRID_COLUMNS, GRID_ROWS, SLOT_COUNT, mm_to_px};
use crate::types::Color;
use image::RgbImage;

use super::{PixelRect, SheetGeometry, SlotIndex, Template, TemplateLayout};

// =============================================================================
// Geometry
// =============================================================================

/// Convert every measurement of `layout` to pixels at `dpi`.
pub fn sheet_geometry(layout: &TemplateLayout, dpi: u32) -> SheetGeometry {
    SheetGeometry {
        dpi,
        page_width: mm_to_px(layout.page_width_mm, dpi),
        page_height: mm_to_px(layout.page_height_mm, dpi),
        slot_width: mm_to_px(layout.slot_width_mm, dpi),
        slot_height: mm_to_px(layout.slot_height_mm, dpi),
        margin_x: mm_to_px(layout.margin_x_mm, dpi),
        margin_y: mm_to_px(layout.margin_y_mm, dpi),
        gap_x: mm_to_px(layout.gap_x_mm, dpi),
        gap_y: mm_to_px(layout.gap_y_mm, dpi),
    }
}

impl SheetGeometry {
    pub fn slot_size(&self) -> (u32, u32) {
        (self.slot_width, self.slot_height)
    }

    /// Top-left corner of a slot
    pub fn slot_origin(&self, slot: SlotIndex) -> (u32, u32) {
        let pos = slot.grid_position();
        let x = self.margin_x.saturating_add(
            (pos.col as u32).saturating_mul(self.slot_width.saturating_add(self.gap_x)),
        );
        let y = self.margin_y.saturating_add(
            (pos.row as u32).saturating_mul(self.slot_height.saturating_add(self.gap_y)),
        );
        (x, y)
    }

    pub fn slot_rect(&self, slot: SlotIndex) -> PixelRect {
        let (x, y) = self.slot_origin(slot);
        PixelRect::new(x, y, self.slot_width, self.slot_height)
    }

    pub fn slot_positions(&self) -> [(u32, u32); SLOT_COUNT] {
        SlotIndex::ALL.map(|slot| self.slot_origin(slot))
    }

    pub fn page_rect(&self) -> PixelRect {
        PixelRect::new(0, 0, self.page_width, self.page_height)
    }

    /// How far the slot grid reaches past the right and bottom page edges.
    ///
    /// Anything pasted into that band is clipped by the canvas.
    pub fn overflow(&self) -> (u32, u32) {
        let span = |margin: u32, slot: u32, gap: u32, count: usize| -> u64 {
            let count = count as u64;
            u64::from(margin) + count * u64::from(slot) + (count - 1) * u64::from(gap)
        };
        let grid_right = span(self.margin_x, self.slot_width, self.gap_x, GRID_COLUMNS);
        let grid_bottom = span(self.margin_y, self.slot_height, self.gap_y, GRID_ROWS);
        let excess = |grid: u64, page: u32| {
            u32::try_from(grid.saturating_sub(u64::from(page))).unwrap_or(u32::MAX)
        };
        (
            excess(grid_right, self.page_width),
            excess(grid_bottom, self.page_height),
        )
    }

    /// Bytes needed for the RGB canvas
    pub fn canvas_bytes(&self) -> u64 {
        u64::from(self.page_width) * u64::from(self.page_height) * 3
    }
}

// =============================================================================
// Template Creation
// =============================================================================

/// Build the blank A4 four-up template at the default resolution.
pub fn build_template(background: Color) -> Template {
    build_template_with(&TemplateLayout::A4_FOUR_UP, DEFAULT_DPI, background)
}

/// Build a blank template for `layout` at `dpi`.
///
/// The canvas is filled with `background` only; slots are not drawn.
pub fn build_template_with(layout: &TemplateLayout, dpi: u32, background: Color) -> Template {
    let geometry = sheet_geometry(layout, dpi);

    log::debug!(
        "Template {}x{} px at {} dpi, slot {}x{} px, slots at {:?}",
        geometry.page_width,
        geometry.page_height,
        dpi,
        geometry.slot_width,
        geometry.slot_height,
        geometry.slot_positions()
    );

    let (overflow_x, overflow_y) = geometry.overflow();
    if overflow_x > 0 || overflow_y > 0 {
        log::warn!(
            "Slot grid extends {} px right and {} px below the page; labels there will be clipped",
            overflow_x,
            overflow_y
        );
    }

    let canvas = RgbImage::from_pixel(
        geometry.page_width,
        geometry.page_height,
        background.to_rgb(),
    );

    Template { canvas, geometry }
}

// =============================================================================
// Tests
// =============================================================================
