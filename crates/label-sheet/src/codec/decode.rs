//! Decoding input documents to label images

use crate::fit::LabelImage;
use crate::types::DecodeError;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;

#[cfg(feature = "pdfium")]
use super::scratch::ScratchFile;
#[cfg(feature = "pdfium")]
use crate::constants::POINTS_PER_INCH;
#[cfg(feature = "pdfium")]
use pdfium_render::prelude::*;
#[cfg(feature = "pdfium")]
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How far into a file the `%PDF-` header may appear
const PDF_HEADER_SEARCH_LEN: usize = 1024;

/// Input document kinds accepted by [`decode_first_page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Pdf,
    Raster(ImageFormat),
}

/// Identify an input from its leading bytes.
pub fn detect_format(bytes: &[u8]) -> Result<InputFormat, DecodeError> {
    let head = &bytes[..bytes.len().min(PDF_HEADER_SEARCH_LEN)];
    if head.windows(5).any(|window| window == b"%PDF-") {
        return Ok(InputFormat::Pdf);
    }

    image::guess_format(bytes)
        .map(InputFormat::Raster)
        .map_err(|_| DecodeError::UnsupportedFormat)
}

/// Decode the first page of `bytes` into a label image.
///
/// PDFs are rasterised at `dpi`; raster images keep their own pixel size and
/// carry their EXIF orientation into the returned label.
pub fn decode_first_page(bytes: &[u8], dpi: u32) -> Result<LabelImage, DecodeError> {
    match detect_format(bytes)? {
        InputFormat::Pdf => decode_pdf(bytes, dpi),
        InputFormat::Raster(format) => decode_raster(bytes, format),
    }
}

fn decode_raster(bytes: &[u8], format: ImageFormat) -> Result<LabelImage, DecodeError> {
    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format).into_decoder()?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let image = DynamicImage::from_decoder(decoder)?;

    log::debug!(
        "Decoded {:?} label {}x{} ({:?})",
        format,
        image.width(),
        image.height(),
        orientation
    );

    Ok(LabelImage::with_orientation(image, orientation))
}

fn decode_pdf(bytes: &[u8], dpi: u32) -> Result<LabelImage, DecodeError> {
    let document = lopdf::Document::load_mem(bytes)?;
    let page_count = document.get_pages().len();
    if page_count == 0 {
        return Err(DecodeError::NoPages);
    }
    if page_count > 1 {
        log::debug!("Input has {} pages, using page 1", page_count);
    }

    let image = render_first_page(bytes, dpi)?;
    log::debug!(
        "Rendered PDF label {}x{} at {} dpi",
        image.width(),
        image.height(),
        dpi
    );

    // pdfium applies the page's /Rotate entry while rendering
    Ok(LabelImage::new(image))
}

#[cfg(feature = "pdfium")]
fn render_first_page(bytes: &[u8], dpi: u32) -> Result<DynamicImage, DecodeError> {
    let scratch = ScratchFile::create(bytes, ".pdf")?;

    let guard = shared_pdfium()?;
    let pdfium = guard
        .as_ref()
        .ok_or_else(|| DecodeError::Render("pdfium is not bound".to_string()))?;
    let document = pdfium
        .load_pdf_from_file(scratch.path(), None)
        .map_err(render_error)?;
    let pages = document.pages();
    if pages.len() == 0 {
        return Err(DecodeError::NoPages);
    }
    let page = pages.get(0).map_err(render_error)?;

    let config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / POINTS_PER_INCH);
    let bitmap = page.render_with_config(&config).map_err(render_error)?;

    Ok(bitmap.as_image())
}

#[cfg(not(feature = "pdfium"))]
fn render_first_page(_bytes: &[u8], _dpi: u32) -> Result<DynamicImage, DecodeError> {
    Err(DecodeError::RendererUnavailable)
}

#[cfg(feature = "pdfium")]
fn render_error(e: PdfiumError) -> DecodeError {
    DecodeError::Render(e.to_string())
}

/// The process-wide pdfium instance.
///
/// pdfium initialises and tears down global library state, so the binding is
/// created once, never dropped, and used by one render at a time.
#[cfg(feature = "pdfium")]
static PDFIUM: Mutex<Option<Pdfium>> = Mutex::new(None);

/// Lock the shared pdfium instance, binding it on first use
#[cfg(feature = "pdfium")]
fn shared_pdfium() -> Result<MutexGuard<'static, Option<Pdfium>>, DecodeError> {
    // A render that panicked does not invalidate the binding
    let mut guard = PDFIUM.lock().unwrap_or_else(PoisonError::into_inner);
    if guard.is_none() {
        let pdfium = bind_pdfium().map_err(render_error)?;
        log::debug!("Bound pdfium");
        *guard = Some(pdfium);
    }
    Ok(guard)
}

/// Make sure pdfium can be bound, binding the shared instance if needed.
#[cfg(feature = "pdfium")]
pub fn init_pdfium() -> Result<(), DecodeError> {
    shared_pdfium().map(drop)
}

/// Bind pdfium, trying `LABEL_SHEET_PDFIUM_DIR`, then the vendored library,
/// then the system library.
#[cfg(feature = "pdfium")]
fn bind_pdfium() -> Result<Pdfium, PdfiumError> {
    let candidates = std::env::var_os("LABEL_SHEET_PDFIUM_DIR")
        .map(std::path::PathBuf::from)
        .into_iter()
        .chain(std::env::current_dir().ok().map(|mut p| {
            p.push("vendor/pdfium/lib");
            p
        }));

    for dir in candidates.filter(|dir| dir.exists()) {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pdf_header() {
        assert_eq!(detect_format(b"%PDF-1.7\n...").unwrap(), InputFormat::Pdf);
        // Some producers write a few junk bytes before the header
        assert_eq!(
            detect_format(b"\xef\xbb\xbf%PDF-1.4\n").unwrap(),
            InputFormat::Pdf
        );
    }

    #[test]
    fn test_detect_png() {
        let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert_eq!(
            detect_format(png).unwrap(),
            InputFormat::Raster(ImageFormat::Png)
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert!(matches!(
            detect_format(b"hello, world"),
            Err(DecodeError::UnsupportedFormat)
        ));
        assert!(matches!(
            detect_format(b""),
            Err(DecodeError::UnsupportedFormat)
        ));
    }
}
