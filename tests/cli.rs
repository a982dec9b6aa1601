//! CLI tests driving the compiled binary against a temporary store file.

use image::{DynamicImage, Rgba, RgbaImage};
use quick_tier::persist::{self, FileStore, TABLE_WIDTH_DEFAULT};
use quick_tier::store::Tier;
use quick_tier::theme::ThemePref;
use std::io::Cursor;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn run(store: &Path, args: &[&str]) {
    let output = Command::new(env!("CARGO_BIN_EXE_quick-tier"))
        .arg("--store")
        .arg(store)
        .args(args)
        .output()
        .expect("failed to run quick-tier");
    assert!(
        output.status.success(),
        "quick-tier {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn write_png(path: &Path, width: u32, height: u32, pixel: Rgba<u8>) {
    let img = RgbaImage::from_pixel(width, height, pixel);
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_with_encoder(image::codecs::png::PngEncoder::new(Cursor::new(&mut buf)))
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

#[test]
fn reset_all_keeps_names_theme_and_streamer_mode() {
    let tmp = TempDir::new().unwrap();
    let store_path = tmp.path().join("tier-list.json");
    let image_path = tmp.path().join("pic.png");
    write_png(&image_path, 40, 40, Rgba([120, 40, 200, 255]));

    run(&store_path, &["add", image_path.to_str().unwrap()]);
    run(&store_path, &["rename", "s", "Goated"]);
    run(
        &store_path,
        &[
            "set",
            "--theme",
            "twitch",
            "--streamer",
            "true",
            "--width",
            "800",
        ],
    );
    run(&store_path, &["reset-all", "--yes"]);

    let store = FileStore::open(&store_path);
    let names = persist::load_names(&store);
    let prefs = persist::load_preferences(&store);

    // Items gone, table width back to its default
    assert!(persist::load_state(&store).is_empty());
    assert_eq!(prefs.table_width, TABLE_WIDTH_DEFAULT);

    // Everything else the user set up survives the wipe
    assert_eq!(names.get(Tier::S), "Goated");
    assert_eq!(prefs.theme, ThemePref::Twitch);
    assert!(prefs.streamer_mode);
}

#[test]
fn reset_all_without_yes_refuses_and_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let store_path = tmp.path().join("tier-list.json");
    let image_path = tmp.path().join("pic.png");
    write_png(&image_path, 40, 40, Rgba([10, 10, 10, 255]));
    run(&store_path, &["add", image_path.to_str().unwrap()]);

    let output = Command::new(env!("CARGO_BIN_EXE_quick-tier"))
        .arg("--store")
        .arg(&store_path)
        .arg("reset-all")
        .output()
        .expect("failed to run quick-tier");
    assert!(!output.status.success());

    let store = FileStore::open(&store_path);
    assert_eq!(persist::load_state(&store).total_len(), 1);
}
