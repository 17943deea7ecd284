use label_sheet::layout::{GridPosition, PixelRect, sheet_geometry};
use label_sheet::*;

#[test]
fn test_slot_index_range() {
    assert!(SlotIndex::new(0).is_none());
    assert!(SlotIndex::new(5).is_none());
    for n in 1..=4 {
        assert_eq!(SlotIndex::new(n).unwrap().get(), n);
    }
}

#[test]
fn test_slot_grid_positions() {
    let positions: Vec<GridPosition> = SlotIndex::ALL.iter().map(|s| s.grid_position()).collect();
    assert_eq!(
        positions,
        vec![
            GridPosition::new(0, 0),
            GridPosition::new(0, 1),
            GridPosition::new(1, 0),
            GridPosition::new(1, 1),
        ]
    );
}

#[test]
fn test_slot_names_and_display() {
    let names: Vec<&str> = SlotIndex::ALL.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["top-left", "top-right", "bottom-left", "bottom-right"]);
    assert_eq!(SlotIndex::new(3).unwrap().to_string(), "3");
}

#[test]
fn test_template_slot_positions() {
    let template = build_template(Color::WHITE);
    let (canvas, positions, size) = template.into_parts();

    assert_eq!(canvas.dimensions(), (2480, 3508));
    assert_eq!(positions, [(59, 59), (1299, 59), (59, 1890), (1299, 1890)]);
    assert_eq!(size, (1181, 1772));
}

#[test]
fn test_geometry_overflow_is_reported() {
    let geometry = sheet_geometry(&TemplateLayout::default(), 300);

    // Two 150 mm rows plus spacing need 310 mm of a 297 mm page
    assert_eq!(geometry.overflow(), (0, 154));
    assert!(!geometry.page_rect().contains(59, 1890 + 1772 - 1));
}

#[test]
fn test_slots_do_not_overlap() {
    let geometry = sheet_geometry(&TemplateLayout::A4_FOUR_UP, 300);
    let rects: Vec<PixelRect> = SlotIndex::ALL.iter().map(|&s| geometry.slot_rect(s)).collect();

    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
        }
    }
}

#[test]
fn test_color_parsing() {
    assert_eq!("#ffffff".parse::<Color>().unwrap(), Color::WHITE);
    assert_eq!("000000".parse::<Color>().unwrap(), Color::BLACK);
    assert_eq!(" #1A2b3C ".parse::<Color>().unwrap(), Color::new(0x1a, 0x2b, 0x3c));

    for bad in ["", "#fff", "#gggggg", "#1234567", "#ééé"] {
        assert!(
            matches!(bad.parse::<Color>(), Err(ComposeError::Config(_))),
            "Parsed {:?}",
            bad
        );
    }
}

#[test]
fn test_color_display() {
    assert_eq!(Color::new(1, 162, 255).to_string(), "#01a2ff");
    assert_eq!(Color::default(), Color::WHITE);
}

#[test]
fn test_mm_to_px() {
    assert_eq!(mm_to_px(210.0, 300), 2480);
    assert_eq!(mm_to_px(297.0, 300), 3508);
    assert_eq!(mm_to_px(5.0, 300), 59);
    assert_eq!(mm_to_px(100.0, 150), 591);
}
