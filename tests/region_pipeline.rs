//! End-to-end pipeline: upload bytes → viewer selection event → operation →
//! encoded viewer image, exercising the engine exactly the way the UI glue
//! drives it (JSON selection payloads, data-URI transport back out).

use image::{Rgba, RgbaImage};

use regionfx::{Engine, SelectionEvent, codec};

fn gradient(w: u32, h: u32) -> RgbaImage {
    let mut img = RgbaImage::new(w, h);
    for (x, y, px) in img.enumerate_pixels_mut() {
        *px = Rgba([(x * 2) as u8, (y * 2) as u8, ((x + y) % 256) as u8, 255]);
    }
    img
}

fn upload(engine: &Engine, id: uuid::Uuid, img: &RgbaImage, name: &str) {
    let png = codec::encode_png(img).unwrap();
    engine.upload(id, &png, name).unwrap();
}

#[test]
fn box_selection_round_trip_confines_the_filter() {
    let engine = Engine::new();
    let id = engine.create_session();
    let original = gradient(100, 100);
    upload(&engine, id, &original, "gradient.png");

    // Viewer coordinates: y up from the bottom edge. Rows 20..80 of a
    // 100-high image are viewer y 20..80 as well (symmetric case).
    let event: SelectionEvent =
        serde_json::from_str(r#"{"x_range":[10.0,50.0],"y_range":[20.0,80.0]}"#).unwrap();

    let view = engine
        .run_operation(id, Some(&event), Some("find_edges"), None)
        .unwrap();
    assert_eq!((view.width, view.height), (100, 100));

    let result = codec::decode_data_uri(&view.data_uri).unwrap();
    let mut changed = 0u32;
    for y in 0..100u32 {
        for x in 0..100u32 {
            let inside = (10..50).contains(&x) && (20..80).contains(&y);
            if !inside {
                assert_eq!(
                    result.get_pixel(x, y),
                    original.get_pixel(x, y),
                    "pixel ({x},{y}) outside the box changed"
                );
            } else if result.get_pixel(x, y) != original.get_pixel(x, y) {
                changed += 1;
            }
        }
    }
    assert!(changed > 0);
}

#[test]
fn lasso_selection_round_trip_confines_the_enhancement() {
    let engine = Engine::new();
    let id = engine.create_session();
    let original = gradient(60, 60);
    upload(&engine, id, &original, "gradient.png");

    // Triangle in viewer space; the engine flips it into raster rows.
    let event: SelectionEvent =
        serde_json::from_str(r#"{"x":[10.0,50.0,10.0],"y":[10.0,10.0,50.0]}"#).unwrap();

    let view = engine
        .run_operation(id, Some(&event), Some("brightness"), Some(0.0))
        .unwrap();
    let result = codec::decode_data_uri(&view.data_uri).unwrap();

    let mut blacked = 0u32;
    let mut untouched = 0u32;
    for y in 0..60u32 {
        for x in 0..60u32 {
            if result.get_pixel(x, y) == original.get_pixel(x, y) {
                untouched += 1;
            } else {
                assert_eq!(&result.get_pixel(x, y).0[..3], &[0, 0, 0]);
                blacked += 1;
            }
        }
    }
    // A filled triangle region went black; the rest of the image survived.
    assert!(blacked > 100, "only {blacked} pixels affected");
    assert!(untouched > 2000, "only {untouched} pixels untouched");
}

#[test]
fn identity_factor_round_trip_is_byte_identical() {
    let engine = Engine::new();
    let id = engine.create_session();
    let original = gradient(32, 32);
    upload(&engine, id, &original, "g.png");

    for op in ["brightness", "color", "contrast", "sharpness"] {
        let view = engine.run_operation(id, None, Some(op), Some(1.0)).unwrap();
        let result = codec::decode_data_uri(&view.data_uri).unwrap();
        assert_eq!(result, original, "{op} at factor 1.0 changed pixels");
    }
}

#[test]
fn degenerate_lasso_leaves_image_unchanged() {
    let engine = Engine::new();
    let id = engine.create_session();
    let original = gradient(24, 24);
    upload(&engine, id, &original, "g.png");

    // Two points cannot enclose area.
    let event: SelectionEvent =
        serde_json::from_str(r#"{"x":[3.0,20.0],"y":[3.0,20.0]}"#).unwrap();
    let view = engine
        .run_operation(id, Some(&event), Some("emboss"), None)
        .unwrap();
    let result = codec::decode_data_uri(&view.data_uri).unwrap();
    assert_eq!(result, original);
}

#[test]
fn factor_above_range_is_clamped_not_rejected() {
    let engine = Engine::new();
    let id = engine.create_session();
    upload(&engine, id, &gradient(16, 16), "g.png");

    let clamped = engine
        .run_operation(id, None, Some("brightness"), Some(5.0))
        .unwrap();

    // Rerun from the same starting image at exactly 2.0 for comparison.
    let engine2 = Engine::new();
    let id2 = engine2.create_session();
    upload(&engine2, id2, &gradient(16, 16), "g.png");
    let exact = engine2
        .run_operation(id2, None, Some("brightness"), Some(2.0))
        .unwrap();

    assert_eq!(clamped.data_uri, exact.data_uri);
}

#[test]
fn operations_iterate_on_the_committed_image() {
    let engine = Engine::new();
    let id = engine.create_session();
    upload(&engine, id, &gradient(20, 20), "g.png");

    // Black out the whole image, then brighten: brightening black stays black,
    // proving the second operation saw the first one's output.
    engine
        .run_operation(id, None, Some("brightness"), Some(0.0))
        .unwrap();
    let view = engine
        .run_operation(id, None, Some("brightness"), Some(2.0))
        .unwrap();
    let result = codec::decode_data_uri(&view.data_uri).unwrap();
    for px in result.pixels() {
        assert_eq!(&px.0[..3], &[0, 0, 0]);
    }
}
