#![cfg(feature = "image-io")]

use convmatch::image::io::{
    fit_within, load_raster, raster_from_dynamic, raster_to_rgba_image, resize_to_target,
    save_png, ImageSize, MAX_LOAD_SIZE,
};
use convmatch::image::synth::{checkerboard, gradient};
use convmatch::{convolve, Preset, Raster, Rgba};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("convmatch-{}-{name}", std::process::id()))
}

#[test]
fn png_export_round_trips_engine_output() {
    let source = gradient(17, 9).unwrap();
    let mut blurred = convolve(&source, &Preset::GaussianBlur.kernel(), true);
    blurred.set_pixel(3, 4, Rgba::new(1, 2, 3, 4)).unwrap();

    let path = temp_path("roundtrip.png");
    save_png(&blurred, &path).unwrap();
    let loaded = load_raster(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, blurred);
}

#[test]
fn large_images_are_capped_on_load() {
    let source = checkerboard(1024, 300, 8).unwrap();
    let path = temp_path("large.png");
    save_png(&source, &path).unwrap();
    let loaded = load_raster(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.width(), MAX_LOAD_SIZE);
    assert_eq!(loaded.height(), 150);
}

#[test]
fn fit_within_never_enlarges() {
    assert_eq!(fit_within(100, 50, 512, 512), (100, 50));
    assert_eq!(fit_within(2048, 1024, 512, 512), (512, 256));
    assert_eq!(fit_within(1000, 1, 512, 512), (512, 1));
}

#[test]
fn size_menu_rescales_both_ways() {
    let source = gradient(100, 50).unwrap();

    let tiny = resize_to_target(&source, ImageSize::Tiny).unwrap();
    assert_eq!((tiny.width(), tiny.height()), (32, 16));

    let large = resize_to_target(&source, ImageSize::Large).unwrap();
    assert_eq!((large.width(), large.height()), (256, 128));

    let original = resize_to_target(&source, ImageSize::Original).unwrap();
    assert_eq!(original, source);
}

#[test]
fn dynamic_image_conversion_is_lossless() {
    let source: Raster = checkerboard(6, 4, 1).unwrap();
    let rgba = raster_to_rgba_image(&source).unwrap();
    let back = raster_from_dynamic(&image::DynamicImage::ImageRgba8(rgba)).unwrap();
    assert_eq!(back, source);
}
