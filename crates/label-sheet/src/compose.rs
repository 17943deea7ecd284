//! Label sheet composition
//!
//! This module orchestrates one composition:
//! 1. Validate every slot index up front
//! 2. Build a fresh blank template
//! 3. Fit each label and paste it at its slot, in order
//!
//! [`compose_documents`] wraps this with decoding and encoding.

use crate::codec::{decode_first_page, encode_page};
use crate::fit::{LabelImage, fit_label};
use crate::layout::{SlotIndex, build_template_with};
use crate::options::ComposeOptions;
use crate::types::*;
use image::RgbImage;
use image::imageops;

/// A label and the slot it should occupy
#[derive(Debug, Clone)]
pub struct Assignment {
    pub label: LabelImage,
    /// Requested slot number, validated against 1-4 when composing
    pub slot: usize,
}

impl Assignment {
    pub fn new(label: impl Into<LabelImage>, slot: usize) -> Self {
        Self {
            label: label.into(),
            slot,
        }
    }
}

/// Compose labels onto the A4 four-up sheet at the default resolution.
///
/// Assignments are pasted in order; when two share a slot the later one
/// overwrites the earlier (last write wins). An empty list yields the blank
/// template.
pub fn compose(background: Color, assignments: &[Assignment]) -> Result<RgbImage> {
    let options = ComposeOptions {
        background,
        ..Default::default()
    };
    compose_with(&options, assignments)
}

/// Compose labels using the layout, resolution and background of `options`.
pub fn compose_with(options: &ComposeOptions, assignments: &[Assignment]) -> Result<RgbImage> {
    options.validate()?;
    compose_validated(options, assignments)
}

/// Composition proper, for callers that already validated `options`
fn compose_validated(options: &ComposeOptions, assignments: &[Assignment]) -> Result<RgbImage> {
    let slots = resolve_slots(assignments.iter().map(|a| a.slot))?;

    let mut template = build_template_with(&options.layout, options.dpi, options.background);
    let slot_size = template.slot_size();

    for (index, (assignment, slot)) in assignments.iter().zip(slots).enumerate() {
        let fitted = fit_label(&assignment.label, slot_size).map_err(|e| {
            ComposeError::DegenerateImage {
                assignment: index,
                width: e.width,
                height: e.height,
            }
        })?;

        let (slot_x, slot_y) = template.geometry.slot_origin(slot);
        let x = slot_x + fitted.offset.0;
        let y = slot_y + fitted.offset.1;

        log::debug!(
            "Slot {} ({}): {}x{} label at ({}, {})",
            slot,
            slot.name(),
            fitted.image.width(),
            fitted.image.height(),
            x,
            y
        );

        imageops::replace(&mut template.canvas, &fitted.image, x as i64, y as i64);
    }

    log::info!(
        "Composed {} label(s) onto a {}x{} sheet",
        assignments.len(),
        template.canvas.width(),
        template.canvas.height()
    );

    Ok(template.canvas)
}

// =============================================================================
// Document Pipeline
// =============================================================================

/// Decode the first page of each input into an assignment for its slot.
///
/// Decode failures carry the zero-based index of the failing input. Slot
/// numbers are passed through unchecked; composing validates them.
pub fn decode_assignments(inputs: &[(Vec<u8>, usize)], dpi: u32) -> Result<Vec<Assignment>> {
    inputs
        .iter()
        .enumerate()
        .map(|(input, (bytes, slot))| {
            let label = decode_first_page(bytes, dpi)
                .map_err(|source| ComposeError::Decode { input, source })?;
            Ok(Assignment {
                label,
                slot: *slot,
            })
        })
        .collect()
}

/// Decode, compose and encode in one call.
///
/// `inputs` pairs raw document bytes with a slot number. Slots are checked
/// before anything is decoded; any failure aborts the whole request.
pub fn compose_documents_sync(
    inputs: &[(Vec<u8>, usize)],
    options: &ComposeOptions,
) -> Result<Vec<u8>> {
    options.validate()?;
    resolve_slots(inputs.iter().map(|(_, slot)| *slot))?;

    let assignments = decode_assignments(inputs, options.dpi)?;
    let canvas = compose_validated(options, &assignments)?;
    Ok(encode_page(&canvas, options.dpi)?)
}

/// Async wrapper around [`compose_documents_sync`]
pub async fn compose_documents(
    inputs: Vec<(Vec<u8>, usize)>,
    options: &ComposeOptions,
) -> Result<Vec<u8>> {
    let options = options.clone();

    tokio::task::spawn_blocking(move || compose_documents_sync(&inputs, &options)).await?
}

/// Validate requested slot numbers, failing on the first one outside 1-4.
pub fn resolve_slots(slots: impl IntoIterator<Item = usize>) -> Result<Vec<SlotIndex>> {
    slots
        .into_iter()
        .enumerate()
        .map(|(assignment, slot)| {
            SlotIndex::new(slot).ok_or(ComposeError::InvalidSlot { assignment, slot })
        })
        .collect()
}
