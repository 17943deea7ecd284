//! Fitting label images into slots
//!
//! Fitting is two pure stages: orientation normalization
//! ([`LabelImage::normalized`]) followed by a containment resize
//! ([`fit_dimensions`]) and centering inside the slot.

use crate::types::DegenerateImage;
use image::imageops::{self, FilterType};
use image::metadata::Orientation;
use image::{DynamicImage, RgbImage};
use std::borrow::Cow;

/// A decoded label together with its orientation metadata.
///
/// The stored pixels are never modified; fitting produces a new image.
#[derive(Debug, Clone)]
pub struct LabelImage {
    image: DynamicImage,
    orientation: Orientation,
}

impl LabelImage {
    /// A label whose pixels are already upright
    pub fn new(image: DynamicImage) -> Self {
        Self::with_orientation(image, Orientation::NoTransforms)
    }

    pub fn with_orientation(image: DynamicImage, orientation: Orientation) -> Self {
        Self { image, orientation }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Stored (not oriented) dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Apply the orientation metadata so the pixels read upright.
    pub fn normalized(&self) -> Cow<'_, DynamicImage> {
        if self.orientation == Orientation::NoTransforms {
            return Cow::Borrowed(&self.image);
        }
        let mut image = self.image.clone();
        image.apply_orientation(self.orientation);
        Cow::Owned(image)
    }
}

impl From<DynamicImage> for LabelImage {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

impl From<RgbImage> for LabelImage {
    fn from(image: RgbImage) -> Self {
        Self::new(DynamicImage::ImageRgb8(image))
    }
}

/// A label scaled for its slot
#[derive(Debug, Clone)]
pub struct FittedLabel {
    pub image: RgbImage,
    /// Top-left corner relative to the slot origin
    pub offset: (u32, u32),
}

/// Largest size that fits `bounds` while keeping the aspect ratio of `size`.
///
/// Images that already fit are returned unchanged, so this never enlarges.
/// The constrained axis takes the bound exactly; the other axis is the floor
/// or ceiling of its exact value, whichever keeps the aspect ratio closer
/// (floor on ties), and is never less than 1.
pub fn fit_dimensions(size: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (width, height) = size;
    let (max_width, max_height) = bounds;

    if width <= max_width && height <= max_height {
        return size;
    }

    let aspect = width as f64 / height as f64;
    let (bound_x, bound_y) = (max_width as f64, max_height as f64);

    if bound_x / bound_y >= aspect {
        let x = round_aspect(bound_y * aspect, |n| (aspect - n as f64 / bound_y).abs());
        (x, max_height)
    } else {
        let y = round_aspect(bound_x / aspect, |n| {
            if n == 0 {
                f64::INFINITY
            } else {
                (aspect - bound_x / n as f64).abs()
            }
        });
        (max_width, y)
    }
}

fn round_aspect(exact: f64, aspect_error: impl Fn(u32) -> f64) -> u32 {
    let floor = exact.floor() as u32;
    let ceil = exact.ceil() as u32;
    let best = if aspect_error(ceil) < aspect_error(floor) {
        ceil
    } else {
        floor
    };
    best.max(1)
}

/// Orient, downscale and center a label inside a slot of `slot_size`.
pub fn fit_label(
    label: &LabelImage,
    slot_size: (u32, u32),
) -> std::result::Result<FittedLabel, DegenerateImage> {
    let (width, height) = label.dimensions();
    if width == 0 || height == 0 {
        return Err(DegenerateImage { width, height });
    }

    let upright = label.normalized().to_rgb8();
    let (target_width, target_height) = fit_dimensions(upright.dimensions(), slot_size);

    let image = if (target_width, target_height) == upright.dimensions() {
        upright
    } else {
        imageops::resize(&upright, target_width, target_height, FilterType::Lanczos3)
    };

    let (slot_width, slot_height) = slot_size;
    let offset = (
        slot_width.saturating_sub(image.width()) / 2,
        slot_height.saturating_sub(image.height()) / 2,
    );

    Ok(FittedLabel { image, offset })
}
