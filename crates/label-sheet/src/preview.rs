use crate::fit::fit_dimensions;
use image::RgbImage;
use image::imageops::{self, FilterType};

/// Downscale a composed sheet for on-screen preview.
///
/// Sheets narrower than `max_width` (or a `max_width` of 0) are returned
/// as-is; previews are never enlarged.
pub fn generate_preview(canvas: &RgbImage, max_width: u32) -> RgbImage {
    let (width, height) = canvas.dimensions();
    if max_width == 0 || width <= max_width {
        return canvas.clone();
    }

    let (preview_width, preview_height) = fit_dimensions((width, height), (max_width, u32::MAX));
    imageops::resize(canvas, preview_width, preview_height, FilterType::Triangle)
}
