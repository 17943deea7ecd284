//! Encoding the composed canvas

use crate::constants::px_to_pt;
use crate::types::EncodeError;
use image::{ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object, Stream};
use std::io::Cursor;

/// Encode `canvas` as a single-page PDF.
///
/// The canvas is embedded at full resolution and the page is sized so that
/// one pixel measures `1 / dpi` inch, preserving the physical page size.
pub fn encode_page(canvas: &RgbImage, dpi: u32) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::EmptyCanvas { width, height });
    }
    if dpi == 0 {
        return Err(EncodeError::InvalidResolution);
    }

    let width_pt = px_to_pt(width, dpi);
    let height_pt = px_to_pt(height, dpi);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    // Page image
    let image_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(width as i64)),
        ("Height", Object::Integer(height as i64)),
        ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
    ]);
    let mut image_stream = Stream::new(image_dict, canvas.as_raw().clone());
    image_stream.compress()?;
    let image_id = doc.add_object(image_stream);

    // Stretch the unit-square image over the whole page
    let content = format!("q {} 0 0 {} 0 0 cm /Im0 Do Q\n", width_pt, height_pt);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set("Im0", Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width_pt),
                Object::Real(height_pt),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]));

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;

    log::debug!(
        "Encoded {}x{} px page ({:.1}x{:.1} pt) into {} bytes",
        width,
        height,
        width_pt,
        height_pt,
        writer.len()
    );

    Ok(writer)
}

/// Encode an image as PNG (used for previews and blank templates).
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::EmptyCanvas { width, height });
    }

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
