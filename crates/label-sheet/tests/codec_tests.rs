use image::{Rgb, RgbImage};
use label_sheet::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

fn create_test_pdf(num_pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(283),
                    Object::Integer(425),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

fn first_page(doc: &Document) -> ObjectId {
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    *pages.values().next().unwrap()
}

fn media_box(doc: &Document) -> Vec<f32> {
    doc.get_object(first_page(doc))
        .unwrap()
        .as_dict()
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_float().unwrap())
        .collect()
}

fn page_image(doc: &Document) -> &Stream {
    let page = doc.get_object(first_page(doc)).unwrap().as_dict().unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let image_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
    doc.get_object(image_id).unwrap().as_stream().unwrap()
}

fn png_label(width: u32, height: u32, color: Rgb<u8>) -> Vec<u8> {
    encode_png(&RgbImage::from_pixel(width, height, color)).unwrap()
}

// =============================================================================
// Encoding
// =============================================================================

#[test]
fn test_encode_page_preserves_physical_size() {
    let canvas = build_template(Color::WHITE).canvas;
    let bytes = encode_page(&canvas, 300).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    let doc = Document::load_mem(&bytes).unwrap();
    let media_box = media_box(&doc);

    // 2480x3508 px at 300 dpi is 595.2x841.92 pt (A4)
    assert_eq!(media_box.len(), 4);
    assert!((media_box[2] - 595.2).abs() < 0.01);
    assert!((media_box[3] - 841.92).abs() < 0.01);
}

#[test]
fn test_encode_page_embeds_full_resolution_image() {
    let mut canvas = RgbImage::from_pixel(30, 20, Rgb([255, 255, 255]));
    canvas.put_pixel(0, 0, Rgb([255, 0, 0]));
    canvas.put_pixel(29, 19, Rgb([0, 0, 255]));

    let bytes = encode_page(&canvas, 150).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let image = page_image(&doc);

    assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), 30);
    assert_eq!(image.dict.get(b"Height").unwrap().as_i64().unwrap(), 20);
    assert_eq!(
        image.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
        b"DeviceRGB"
    );

    let raw = image
        .decompressed_content()
        .unwrap_or_else(|_| image.content.clone());
    assert_eq!(raw, canvas.as_raw().clone());
}

#[test]
fn test_encode_page_rejects_empty_canvas() {
    let result = encode_page(&RgbImage::new(0, 10), 300);
    assert!(matches!(
        result,
        Err(EncodeError::EmptyCanvas {
            width: 0,
            height: 10
        })
    ));
}

#[test]
fn test_encode_page_rejects_zero_dpi() {
    let result = encode_page(&RgbImage::new(10, 10), 0);
    assert!(matches!(result, Err(EncodeError::InvalidResolution)));
}

#[test]
fn test_encode_is_deterministic() {
    let canvas = RgbImage::from_pixel(64, 64, Rgb([12, 34, 56]));
    assert_eq!(
        encode_page(&canvas, 300).unwrap(),
        encode_page(&canvas, 300).unwrap()
    );
}

// =============================================================================
// Decoding
// =============================================================================

#[test]
fn test_decode_png_label() {
    let bytes = png_label(40, 60, Rgb([0, 128, 0]));
    let label = decode_first_page(&bytes, 300).unwrap();

    assert_eq!(label.dimensions(), (40, 60));
    assert_eq!(
        label.orientation(),
        image::metadata::Orientation::NoTransforms
    );
    assert_eq!(*label.image().to_rgb8().get_pixel(5, 5), Rgb([0, 128, 0]));
}

#[test]
fn test_decode_pdf_without_pages() {
    let bytes = create_test_pdf(0);
    let result = decode_first_page(&bytes, 300);
    assert!(matches!(result, Err(DecodeError::NoPages)));
}

#[test]
fn test_decode_malformed_pdf() {
    // No cross-reference table, so lopdf cannot open it
    let result = decode_first_page(b"%PDF-1.7\nthis is not a pdf", 300);
    assert!(matches!(result, Err(DecodeError::Pdf(_))));
}

/// A JPEG whose EXIF block carries `orientation` (TIFF tag 0x0112)
fn jpeg_with_orientation(width: u32, height: u32, orientation: u8) -> Vec<u8> {
    let mut jpeg = Vec::new();
    RgbImage::from_pixel(width, height, Rgb([0, 0, 200]))
        .write_to(&mut std::io::Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .unwrap();

    let mut exif = b"Exif\0\0".to_vec();
    // Big-endian TIFF header, first IFD at offset 8
    exif.extend_from_slice(b"MM\0\x2a\0\0\0\x08");
    // One entry: Orientation, SHORT, count 1
    exif.extend_from_slice(&[0x00, 0x01, 0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    exif.extend_from_slice(&[0x00, orientation, 0x00, 0x00]);
    // No next IFD
    exif.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let length = (exif.len() + 2) as u16;
    let mut app1 = vec![0xff, 0xe1];
    app1.extend_from_slice(&length.to_be_bytes());
    app1.extend_from_slice(&exif);

    // Insert APP1 right after SOI
    jpeg.splice(2..2, app1);
    jpeg
}

#[test]
fn test_decode_jpeg_keeps_exif_orientation() {
    // 6 = rotate 90 degrees clockwise to display
    let bytes = jpeg_with_orientation(40, 20, 6);
    let label = decode_first_page(&bytes, 300).unwrap();

    assert_eq!(
        label.orientation(),
        image::metadata::Orientation::Rotate90
    );
    // Stored pixels are untouched; the upright view is portrait
    assert_eq!(label.dimensions(), (40, 20));
    assert_eq!(label.normalized().to_rgb8().dimensions(), (20, 40));

    let fitted = fit_label(&label, (10, 10)).unwrap();
    assert_eq!(fitted.image.dimensions(), (5, 10));
}

#[test]
fn test_decode_jpeg_upright_orientation() {
    let bytes = jpeg_with_orientation(40, 20, 1);
    let label = decode_first_page(&bytes, 300).unwrap();

    assert_eq!(
        label.orientation(),
        image::metadata::Orientation::NoTransforms
    );
    assert_eq!(label.normalized().to_rgb8().dimensions(), (40, 20));
}

#[test]
fn test_decode_unknown_format() {
    let result = decode_first_page(b"just some text", 300);
    assert!(matches!(result, Err(DecodeError::UnsupportedFormat)));
}

#[test]
fn test_decode_truncated_png() {
    let bytes = png_label(40, 60, Rgb([0, 0, 0]));
    let result = decode_first_page(&bytes[..20], 300);
    assert!(matches!(result, Err(DecodeError::Image(_))));
}

#[cfg(not(feature = "pdfium"))]
#[test]
fn test_decode_pdf_without_renderer() {
    let bytes = create_test_pdf(1);
    let result = decode_first_page(&bytes, 300);
    assert!(matches!(result, Err(DecodeError::RendererUnavailable)));
}

// =============================================================================
// Document pipeline
// =============================================================================

#[test]
fn test_compose_documents_from_png_labels() {
    let inputs = vec![
        (png_label(1181, 1772, Rgb([255, 0, 0])), 1),
        (png_label(600, 400, Rgb([0, 0, 255])), 4),
    ];
    let options = ComposeOptions {
        dpi: 300,
        ..Default::default()
    };

    let bytes = compose_documents_sync(&inputs, &options).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let image = page_image(&doc);

    assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), 2480);
    assert_eq!(image.dict.get(b"Height").unwrap().as_i64().unwrap(), 3508);

    // Red pixel at the slot 1 origin (59, 59)
    let raw = image
        .decompressed_content()
        .unwrap_or_else(|_| image.content.clone());
    let offset = ((59 * 2480 + 59) * 3) as usize;
    assert_eq!(&raw[offset..offset + 3], &[255, 0, 0]);
}

#[test]
fn test_compose_documents_checks_slots_before_decoding() {
    // The second input is garbage, but its slot is checked first
    let inputs = vec![
        (png_label(10, 10, Rgb([0, 0, 0])), 1),
        (b"garbage".to_vec(), 5),
    ];

    match compose_documents_sync(&inputs, &ComposeOptions::default()) {
        Err(ComposeError::InvalidSlot { assignment, slot }) => {
            assert_eq!(assignment, 1);
            assert_eq!(slot, 5);
        }
        other => panic!("Expected InvalidSlot, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_compose_documents_reports_failing_input() {
    let inputs = vec![
        (png_label(10, 10, Rgb([0, 0, 0])), 1),
        (b"garbage".to_vec(), 2),
    ];

    match compose_documents_sync(&inputs, &ComposeOptions::default()) {
        Err(ComposeError::Decode { input, source }) => {
            assert_eq!(input, 1);
            assert!(matches!(source, DecodeError::UnsupportedFormat));
        }
        other => panic!("Expected Decode error, got {:?}", other.map(|b| b.len())),
    }
}

#[test]
fn test_decode_assignments_keeps_order_and_slots() {
    let inputs = vec![
        (png_label(10, 20, Rgb([1, 1, 1])), 3),
        (png_label(30, 40, Rgb([2, 2, 2])), 9),
    ];

    // Slots are not checked at this stage
    let assignments = decode_assignments(&inputs, 300).unwrap();
    assert_eq!(assignments.len(), 2);
    assert_eq!(assignments[0].slot, 3);
    assert_eq!(assignments[0].label.dimensions(), (10, 20));
    assert_eq!(assignments[1].slot, 9);
    assert_eq!(assignments[1].label.dimensions(), (30, 40));
}

#[test]
fn test_decode_assignments_reports_failing_input() {
    let inputs = vec![
        (png_label(10, 10, Rgb([0, 0, 0])), 1),
        (png_label(10, 10, Rgb([0, 0, 0])), 2),
        (b"%PDF-1.7\nbroken".to_vec(), 3),
    ];

    match decode_assignments(&inputs, 300) {
        Err(ComposeError::Decode { input, source }) => {
            assert_eq!(input, 2);
            assert!(matches!(source, DecodeError::Pdf(_)));
        }
        _ => panic!("Expected Decode error"),
    }
}

#[tokio::test]
async fn test_compose_documents_async() {
    let inputs = vec![(png_label(100, 150, Rgb([0, 200, 0])), 2)];
    let options = ComposeOptions {
        dpi: 72,
        ..Default::default()
    };

    let bytes = compose_documents(inputs, &options).await.unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let media_box = media_box(&doc);

    // 210 mm at 72 dpi rounds to 595 px, one point per pixel
    assert_eq!(media_box[2], 595.0);
    assert_eq!(media_box[3], 842.0);
}

#[tokio::test]
async fn test_load_and_save_documents() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("label.png");
    let output = dir.path().join("sheet.pdf");
    std::fs::write(&input, png_label(20, 30, Rgb([1, 2, 3]))).unwrap();

    let documents = load_multiple_documents(&[&input]).await.unwrap();
    assert_eq!(documents.len(), 1);

    let bytes = compose_documents(vec![(documents[0].clone(), 1)], &ComposeOptions::default())
        .await
        .unwrap();
    save_document(&bytes, &output).await.unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), bytes);
}

#[tokio::test]
async fn test_load_missing_document() {
    let result = load_document("/nonexistent/label.pdf").await;
    assert!(matches!(result, Err(ComposeError::Io(_))));
}
