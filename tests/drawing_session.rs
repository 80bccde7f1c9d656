use eframe_whiteboard::{
    Document, InputEvent, MemoryStore, PersistenceGateway, PointerSource, RasterSnapshot, ToolKind, Whiteboard,
    WhiteboardConfig,
};
use eframe_whiteboard::stroke::CompletedStroke;
use eframe_whiteboard::surface::PixelRect;
use egui::{Pos2, Rect};

const INK: [u8; 4] = [0, 0, 0, 255];
const RULE: [u8; 4] = [0xe5, 0xe7, 0xeb, 255];
const BLANK: [u8; 4] = [0, 0, 0, 0];

fn small_config() -> WhiteboardConfig {
    WhiteboardConfig {
        initial_width: 200,
        initial_height: 150,
        ..WhiteboardConfig::default()
    }
}

fn settled(store: MemoryStore) -> Whiteboard {
    let mut whiteboard = Whiteboard::new(small_config(), Box::new(store));
    whiteboard.poll(0.0);
    whiteboard
}

fn draw(whiteboard: &mut Whiteboard, points: &[(f32, f32)]) {
    let (first, rest) = points.split_first().expect("at least one point");
    whiteboard.begin_stroke(Pos2::new(first.0, first.1));
    for &(x, y) in rest {
        whiteboard.extend_stroke(Pos2::new(x, y));
    }
    whiteboard.end_stroke();
}

#[test]
fn test_pen_stroke_is_captured() {
    let mut whiteboard = settled(MemoryStore::new());
    draw(&mut whiteboard, &[(10.0, 10.0), (50.0, 50.0)]);

    assert_eq!(whiteboard.history().len(), 1);
    assert_eq!(whiteboard.surface().pixel(30, 30), Some(INK));

    let snapshot = whiteboard.document().load_active_snapshot().expect("stored snapshot");
    assert_eq!(Some(snapshot), whiteboard.history().current());
    let image = snapshot.decode().unwrap();
    assert_eq!(image.get_pixel(30, 30).0, INK);
    // the ruled background is part of the snapshot
    assert_eq!(image.get_pixel(100, 20).0, RULE);
}

#[test]
fn test_every_stroke_adds_one_history_entry() {
    let mut whiteboard = settled(MemoryStore::new());
    for i in 0..3 {
        let y = 30.0 + 10.0 * i as f32;
        draw(&mut whiteboard, &[(60.0, y), (120.0, y)]);
    }
    assert_eq!(whiteboard.history().len(), 3);
    assert_eq!(whiteboard.history().cursor(), Some(2));
}

#[test]
fn test_eraser_restores_ruled_background() {
    let mut whiteboard = settled(MemoryStore::new());
    draw(&mut whiteboard, &[(60.0, 40.0), (150.0, 40.0)]);
    assert_eq!(whiteboard.surface().pixel(100, 40), Some(INK));

    whiteboard.select_tool(ToolKind::Eraser);
    whiteboard.set_eraser_width(8.0);
    draw(&mut whiteboard, &[(100.0, 30.0), (100.0, 50.0)]);

    let surface = whiteboard.surface();
    assert_eq!(surface.pixel(100, 40), Some(RULE));
    assert_eq!(surface.pixel(100, 38), Some(BLANK));
    assert_eq!(surface.pixel(140, 40), Some(INK));
    assert_eq!(whiteboard.history().len(), 2);
}

#[test]
fn test_tool_changes_apply_to_next_stroke() {
    let mut whiteboard = settled(MemoryStore::new());
    whiteboard.set_pen_color("#ff0000").unwrap();
    whiteboard.set_pen_width(10.0);
    draw(&mut whiteboard, &[(100.0, 70.0)]);
    assert_eq!(whiteboard.surface().pixel(103, 70), Some([255, 0, 0, 255]));

    assert!(whiteboard.set_pen_color("not a colour").is_err());
    assert_eq!(whiteboard.tools().pen_color(), "#ff0000");
}

#[test]
fn test_corrupt_snapshot_restores_blank_ruled_page() {
    let broken = RasterSnapshot::from_data_url("data:image/png;base64,!!!not base64!!!");
    let document = Document::default()
        .store_snapshot(
            eframe_whiteboard::document::DEFAULT_NOTEBOOK_ID,
            eframe_whiteboard::document::DEFAULT_SHEET_ID,
            broken,
        )
        .unwrap();
    let json = PersistenceGateway::encode(&document).unwrap();

    let whiteboard = settled(MemoryStore::with_value("whiteboard-data", json));
    assert_eq!(whiteboard.document(), &document);
    assert_eq!(whiteboard.surface().pixel(100, 20), Some(RULE));
    assert_eq!(whiteboard.surface().pixel(100, 10), Some(BLANK));
}

#[test]
fn test_stroke_waits_for_pending_restore() {
    let mut whiteboard = settled(MemoryStore::new());
    draw(&mut whiteboard, &[(60.0, 30.0), (100.0, 30.0)]);
    let first_sheet = whiteboard.document().active_sheet_id().to_owned();

    whiteboard.create_sheet().unwrap();
    whiteboard.poll(0.0);
    assert_eq!(whiteboard.surface().pixel(80, 30), Some(BLANK));

    // switching back queues the restore; drawing right away must not lose it
    whiteboard.switch_sheet(&first_sheet).unwrap();
    assert!(whiteboard.is_restore_pending());
    draw(&mut whiteboard, &[(60.0, 70.0), (100.0, 70.0)]);

    assert!(!whiteboard.is_restore_pending());
    assert_eq!(whiteboard.surface().pixel(80, 30), Some(INK));
    assert_eq!(whiteboard.surface().pixel(80, 70), Some(INK));
}

#[test]
fn test_last_switch_wins() {
    let mut whiteboard = settled(MemoryStore::new());
    let first_sheet = whiteboard.document().active_sheet_id().to_owned();
    draw(&mut whiteboard, &[(60.0, 30.0), (100.0, 30.0)]);

    let second_sheet = whiteboard.create_sheet().unwrap();
    whiteboard.poll(0.0);
    draw(&mut whiteboard, &[(60.0, 90.0), (100.0, 90.0)]);

    whiteboard.switch_sheet(&first_sheet).unwrap();
    whiteboard.switch_sheet(&second_sheet).unwrap();
    whiteboard.poll(0.0);

    assert_eq!(whiteboard.surface().pixel(80, 30), Some(BLANK));
    assert_eq!(whiteboard.surface().pixel(80, 90), Some(INK));
}

#[test]
fn test_history_resets_on_sheet_change() {
    let mut whiteboard = settled(MemoryStore::new());
    draw(&mut whiteboard, &[(60.0, 30.0), (100.0, 30.0)]);
    assert_eq!(whiteboard.history().len(), 1);

    whiteboard.create_sheet().unwrap();
    assert!(whiteboard.history().is_empty());
}

#[test]
fn test_clear_records_blank_page() {
    let mut whiteboard = settled(MemoryStore::new());
    draw(&mut whiteboard, &[(60.0, 30.0), (100.0, 30.0)]);
    whiteboard.clear_active_sheet();

    assert_eq!(whiteboard.surface().pixel(80, 30), Some(BLANK));
    assert_eq!(whiteboard.surface().pixel(80, 40), Some(RULE));
    assert_eq!(whiteboard.history().len(), 2);
    let stored = whiteboard.document().load_active_snapshot().unwrap().decode().unwrap();
    assert_eq!(stored.get_pixel(80, 30).0, BLANK);
}

#[test]
fn test_pointer_leave_ends_stroke() {
    let mut whiteboard = settled(MemoryStore::new());
    let rect = Rect::from_min_size(Pos2::new(10.0, 10.0), egui::vec2(200.0, 150.0));

    whiteboard.handle_input(&InputEvent::PointerEnter { source: PointerSource::mouse(60.0, 60.0) }, rect);
    whiteboard.handle_input(&InputEvent::PointerDown { source: PointerSource::mouse(60.0, 60.0) }, rect);
    whiteboard.handle_input(&InputEvent::PointerMove { source: PointerSource::mouse(90.0, 60.0) }, rect);
    whiteboard.handle_input(&InputEvent::PointerLeave, rect);
    assert!(!whiteboard.is_drawing());
    assert_eq!(whiteboard.history().len(), 1);

    // moves after leaving do nothing until the next down
    let version = whiteboard.surface_version();
    whiteboard.handle_input(&InputEvent::PointerMove { source: PointerSource::mouse(150.0, 60.0) }, rect);
    assert_eq!(whiteboard.surface_version(), version);
    assert_eq!(whiteboard.surface().pixel(70, 50), Some(INK));
}

#[test]
fn test_touch_uses_first_point() {
    let mut whiteboard = settled(MemoryStore::new());
    let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(200.0, 150.0));
    let touches = |a: (f32, f32)| PointerSource::Touch {
        touches: vec![Pos2::new(a.0, a.1), Pos2::new(190.0, 130.0)],
    };

    whiteboard.handle_input(&InputEvent::PointerDown { source: touches((60.0, 110.0)) }, rect);
    whiteboard.handle_input(&InputEvent::PointerMove { source: touches((120.0, 110.0)) }, rect);
    whiteboard.handle_input(&InputEvent::PointerUp, rect);

    assert_eq!(whiteboard.surface().pixel(90, 110), Some(INK));
    assert_eq!(whiteboard.surface().pixel(190, 130), Some(BLANK));
}

fn segment_distance(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let t = if ab.length_sq() == 0.0 {
        0.0
    } else {
        ((p - a).dot(ab) / ab.length_sq()).clamp(0.0, 1.0)
    };
    (p - (a + ab * t)).length()
}

/// Every pixel that differs between `before` and the current surface lies
/// within `reach` of the stroke's path and inside its reported dirty rect
fn assert_changes_stay_on_path(
    whiteboard: &Whiteboard,
    before: &image::RgbaImage,
    points: &[Pos2],
    reach: f32,
    dirty: PixelRect,
) {
    let mut changed = 0;
    for (x, y, pixel) in whiteboard.surface().pixels().enumerate_pixels() {
        if pixel == before.get_pixel(x, y) {
            continue;
        }
        changed += 1;
        let centre = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
        let on_path = points
            .windows(2)
            .any(|w| segment_distance(centre, w[0], w[1]) <= reach);
        assert!(on_path, "pixel ({x}, {y}) changed away from the stroke");
        assert!(dirty.contains(x, y), "pixel ({x}, {y}) outside dirty rect {dirty:?}");
    }
    assert!(changed > 0);
}

fn stroke_through(whiteboard: &mut Whiteboard, points: &[Pos2]) -> CompletedStroke {
    whiteboard.begin_stroke(points[0]);
    for &point in &points[1..] {
        whiteboard.extend_stroke(point);
    }
    whiteboard.end_stroke().expect("stroke was active")
}

#[test]
fn test_erasing_blank_paper_leaves_it_unchanged() {
    let mut whiteboard = settled(MemoryStore::new());
    let before = whiteboard.surface().pixels().clone();

    whiteboard.select_tool(ToolKind::Eraser);
    whiteboard.set_eraser_width(40.0);
    // crosses the margin line on several rule rows
    draw(&mut whiteboard, &[(10.0, 5.0), (60.0, 40.0), (10.0, 80.0), (192.7, 141.3)]);

    assert_eq!(whiteboard.surface().pixel(40, 40), Some(before.get_pixel(40, 40).0));
    assert_eq!(whiteboard.surface().pixels(), &before);
}

#[test]
fn test_pen_stroke_only_changes_swept_region() {
    let mut whiteboard = settled(MemoryStore::new());
    whiteboard.set_pen_width(6.0);
    let before = whiteboard.surface().pixels().clone();

    let points = [
        Pos2::new(20.0, 20.0),
        Pos2::new(80.0, 35.0),
        Pos2::new(120.0, 110.0),
        Pos2::new(170.0, 60.0),
    ];
    let stroke = stroke_through(&mut whiteboard, &points);

    assert_eq!(stroke.points, points);
    assert_changes_stay_on_path(&whiteboard, &before, &points, 3.0 + 1.0, stroke.dirty.unwrap());
}

#[test]
fn test_eraser_stroke_only_changes_swept_region() {
    let mut whiteboard = settled(MemoryStore::new());
    whiteboard.set_pen_width(8.0);
    for y in [30.0, 60.0, 90.0, 120.0] {
        draw(&mut whiteboard, &[(20.0, y), (180.0, y)]);
    }
    let before = whiteboard.surface().pixels().clone();

    whiteboard.select_tool(ToolKind::Eraser);
    whiteboard.set_eraser_width(12.0);
    let points = [
        Pos2::new(30.0, 20.0),
        Pos2::new(90.0, 130.0),
        Pos2::new(150.0, 25.0),
    ];
    let stroke = stroke_through(&mut whiteboard, &points);

    assert_changes_stay_on_path(&whiteboard, &before, &points, 6.0 + 1.0, stroke.dirty.unwrap());
    assert_eq!(whiteboard.history().len(), 5);
}
