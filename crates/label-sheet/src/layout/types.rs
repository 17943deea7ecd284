//! Layout data types for label sheets
//!
//! These types sit between the physical sheet description (millimeters)
//! and the pixel canvas the compositor paints on.

use crate::constants::{
    GAP_MM, GRID_COLUMNS, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, SLOT_COUNT, SLOT_HEIGHT_MM,
    SLOT_WIDTH_MM,
};
use image::RgbImage;
use std::fmt;

/// One of the four label slots, numbered 1-4 in row-major order
///
/// 1 = top-left, 2 = top-right, 3 = bottom-left, 4 = bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(u8);

impl SlotIndex {
    pub const ALL: [SlotIndex; SLOT_COUNT] = [SlotIndex(1), SlotIndex(2), SlotIndex(3), SlotIndex(4)];

    /// Returns `None` unless `slot` is in 1..=4
    pub fn new(slot: usize) -> Option<Self> {
        (1..=SLOT_COUNT)
            .contains(&slot)
            .then(|| SlotIndex(slot as u8))
    }

    /// Slot pre-selected for the input at zero-based `position`:
    /// inputs one to four fill slots 1-4 in order, later inputs land on slot 1
    pub fn default_for(position: usize) -> Self {
        SlotIndex::new(position + 1).unwrap_or(SlotIndex(1))
    }

    /// The 1-based slot number
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Zero-based position in `ALL` and in slot position arrays
    pub fn zero_based(self) -> usize {
        self.get() - 1
    }

    pub fn grid_position(self) -> GridPosition {
        GridPosition::new(
            self.zero_based() / GRID_COLUMNS,
            self.zero_based() % GRID_COLUMNS,
        )
    }

    pub fn name(self) -> &'static str {
        match self.0 {
            1 => "top-left",
            2 => "top-right",
            3 => "bottom-left",
            _ => "bottom-right",
        }
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular area in pixels, origin at the top-left of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right-most column
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottom-most row
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &PixelRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Physical description of a label sheet in millimeters.
///
/// The core always composes with [`TemplateLayout::A4_FOUR_UP`]; the
/// structure exists so the placement code never sees literal measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TemplateLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub slot_width_mm: f64,
    pub slot_height_mm: f64,
    /// Distance from the left page edge to the first column
    pub margin_x_mm: f64,
    /// Distance from the top page edge to the first row
    pub margin_y_mm: f64,
    /// Horizontal space between columns
    pub gap_x_mm: f64,
    /// Vertical space between rows
    pub gap_y_mm: f64,
}

impl TemplateLayout {
    /// A4 portrait with four 100×150 mm labels, 5 mm margins and gaps
    pub const A4_FOUR_UP: TemplateLayout = TemplateLayout {
        page_width_mm: PAGE_WIDTH_MM,
        page_height_mm: PAGE_HEIGHT_MM,
        slot_width_mm: SLOT_WIDTH_MM,
        slot_height_mm: SLOT_HEIGHT_MM,
        margin_x_mm: MARGIN_MM,
        margin_y_mm: MARGIN_MM,
        gap_x_mm: GAP_MM,
        gap_y_mm: GAP_MM,
    };
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self::A4_FOUR_UP
    }
}

/// A [`TemplateLayout`] converted to pixels at one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetGeometry {
    pub dpi: u32,
    pub page_width: u32,
    pub page_height: u32,
    pub slot_width: u32,
    pub slot_height: u32,
    pub margin_x: u32,
    pub margin_y: u32,
    pub gap_x: u32,
    pub gap_y: u32,
}

/// A blank canvas plus the slot geometry it was built from
#[derive(Debug, Clone)]
pub struct Template {
    pub canvas: RgbImage,
    pub geometry: SheetGeometry,
}

impl Template {
    /// Top-left corner of every slot, indexed by `SlotIndex::zero_based`
    pub fn slot_positions(&self) -> [(u32, u32); SLOT_COUNT] {
        self.geometry.slot_positions()
    }

    /// Width and height shared by all slots
    pub fn slot_size(&self) -> (u32, u32) {
        self.geometry.slot_size()
    }

    /// Split into `(canvas, slot_positions, slot_size)`
    pub fn into_parts(self) -> (RgbImage, [(u32, u32); SLOT_COUNT], (u32, u32)) {
        let positions = self.slot_positions();
        let size = self.slot_size();
        (self.canvas, positions, size)
    }
}
