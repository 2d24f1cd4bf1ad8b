use std::path::Path;

use flood_eraser::{
    ClickOutcome, Command, Editor, EditorOptions, EditorSession, Error, PixelBuffer,
};
use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::tempdir;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// 100x100 green image with a 10x10 red block at (20, 20).
fn block_image() -> RgbaImage {
    RgbaImage::from_fn(100, 100, |x, y| {
        if (20..30).contains(&x) && (20..30).contains(&y) {
            RED
        } else {
            GREEN
        }
    })
}

fn editor() -> Editor {
    Editor::new(
        PixelBuffer::from_image(block_image()).unwrap(),
        EditorOptions::default(),
    )
}

#[test]
fn click_on_block_erases_exactly_the_block() {
    let mut ed = editor();
    assert_eq!(
        ed.apply_click(25.0, 25.0, 1.0),
        ClickOutcome::Erased { pixels: 100 }
    );
    let buf = ed.buffer();
    assert_eq!(buf.transparent_count(), 100);
    assert_eq!(buf.get_pixel(20, 20).unwrap(), Rgba([255, 0, 0, 0]));
    assert_eq!(buf.get_pixel(19, 20).unwrap(), GREEN);
    assert_eq!(buf.get_pixel(30, 29).unwrap(), GREEN);
}

#[test]
fn out_of_bounds_click_on_100px_image_is_ignored() {
    let mut ed = editor();
    let before = ed.buffer().clone();
    assert_eq!(ed.apply_click(150.0, 150.0, 1.0), ClickOutcome::Ignored);
    assert_eq!(ed.buffer(), &before);
    assert_eq!(ed.history().len(), 0);
}

#[test]
fn new_click_after_undo_discards_redo_branch() {
    let mut img = block_image();
    img.put_pixel(90, 90, Rgba([0, 0, 255, 255]));
    let mut ed = Editor::new(
        PixelBuffer::from_image(img).unwrap(),
        EditorOptions::default(),
    );

    ed.apply_click(25.0, 25.0, 1.0); // E1: red block
    ed.apply_click(0.0, 0.0, 1.0); // E2: green field
    ed.apply_click(90.0, 90.0, 1.0); // E3: blue dot
    assert!(ed.undo());
    assert!(ed.undo());
    ed.apply_click(90.0, 90.0, 1.0); // E4

    assert_eq!(ed.history().len(), 2);
    assert!(!ed.redo());
    assert_eq!(ed.buffer().get_pixel(0, 0).unwrap(), GREEN);
    assert_eq!(ed.buffer().get_pixel(90, 90).unwrap()[3], 0);
}

#[test]
fn save_and_reload_preserves_every_rgba_value() {
    let dir = tempdir().unwrap();
    let mut ed = editor();
    ed.apply_click(25.0, 25.0, 1.0);

    let written = ed.save(&dir.path().join("edited.jpg")).unwrap();
    assert_eq!(written.extension().and_then(|e| e.to_str()), Some("png"));

    let reloaded = PixelBuffer::load(&written).unwrap();
    assert_eq!(&reloaded, ed.buffer());
}

#[test]
fn save_under_a_file_fails_and_keeps_edits() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"plain file").unwrap();

    let mut ed = editor();
    ed.apply_click(25.0, 25.0, 1.0);
    let before = ed.buffer().clone();

    for target in [blocker.join("out.png"), blocker.join("nested").join("out.png")] {
        let err = ed.save(&target).unwrap_err();
        assert!(err.is_io(), "{target:?}: {err}");
        assert!(!target.exists());
    }
    assert_eq!(ed.buffer(), &before);
    assert_eq!(ed.history().len(), 1);
    assert!(ed.history().can_undo());
    assert!(ed.undo());
}

#[test]
fn jpeg_input_loads_fully_opaque() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("photo.jpg");
    RgbImage::from_pixel(16, 8, Rgb([40, 80, 120]))
        .save(&path)
        .unwrap();

    let buf = PixelBuffer::load(&path).unwrap();
    assert_eq!((buf.width(), buf.height()), (16, 8));
    assert!(buf.as_image().pixels().all(|p| p[3] == 255));
}

#[test]
fn unreadable_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();

    let err = PixelBuffer::load(&path).unwrap_err();
    assert!(err.is_io());
    assert!(PixelBuffer::load(Path::new("/no/such/file.png"))
        .unwrap_err()
        .is_io());
}

#[test]
fn session_runs_a_full_script() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.png");
    block_image().save(&input).unwrap();
    let output = dir.path().join("out.png");
    let preview = dir.path().join("view.png");

    let script = format!(
        "open {}\nzoom in\nzoom out\nclick 25 25\nclick 0 0\nundo\nsave {}\npreview {}\n",
        input.display(),
        output.display(),
        preview.display()
    );

    let mut session = EditorSession::default();
    for cmd in flood_eraser::parse_script(&script).unwrap() {
        session.execute(&cmd).unwrap();
    }

    let saved = PixelBuffer::load(&output).unwrap();
    assert_eq!(saved.transparent_count(), 100);
    let view = image::open(&preview).unwrap();
    assert_eq!((view.width(), view.height()), (100, 100));
}

#[test]
fn session_rejects_unsupported_open_without_losing_state() {
    let mut session = EditorSession::default();
    session.load_buffer(PixelBuffer::from_image(block_image()).unwrap());
    session.click(25.0, 25.0);

    let err = session
        .execute(&Command::Open("notes.gif".into()))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
    assert_eq!(session.buffer().map(PixelBuffer::transparent_count), Some(100));
}

#[test]
fn zoomed_session_clicks_map_to_source_pixels() {
    let mut session = EditorSession::default();
    session.load_buffer(PixelBuffer::from_image(block_image()).unwrap());
    for _ in 0..10 {
        session.zoom_in();
    }
    assert!((session.scale() - 5.0).abs() < f64::EPSILON);

    // 125 / 5.0 = 25 -> inside the red block
    assert_eq!(
        session.click(125.0, 125.0),
        ClickOutcome::Erased { pixels: 100 }
    );
    // 499 / 5.0 = 99.8 -> last column, still inside
    assert!(session.click(499.0, 0.0).needs_redraw());
    // 500 / 5.0 = 100 -> outside
    assert_eq!(session.click(500.0, 0.0), ClickOutcome::Ignored);
}
