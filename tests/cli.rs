use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use image::{GenericImageView, Rgb, RgbImage};

fn qr_meme(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qr-meme"))
        .args(args)
        .output()
        .expect("failed to run qr-meme")
}

fn solid(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb([120, 140, 160]))
        .save(&path)
        .unwrap();
    path
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn composes_a_two_by_two_meme() {
    let dir = tempfile::tempdir().unwrap();
    let a = solid(dir.path(), "a.png", 100, 100);
    let b = solid(dir.path(), "b.png", 100, 100);
    let out = dir.path().join("out.png");

    let output = qr_meme(&[
        "--no-image",
        s(&a),
        "--yes-image",
        s(&b),
        "--upper-text",
        "NO",
        "--lower-text",
        "YES",
        "--upper-qr",
        "http://x",
        "--lower-qr",
        "http://y",
        "--output",
        s(&out),
    ]);
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.trim(),
        format!("Final meme created and saved to {}", out.display())
    );

    let meme = image::open(&out).unwrap();
    assert_eq!(meme.dimensions(), (200, 200));
    let meme = meme.to_rgb8();
    for i in 0..200 {
        assert_eq!(meme.get_pixel(100, i), &Rgb([0, 0, 0]));
        assert_eq!(meme.get_pixel(i, 100), &Rgb([0, 0, 0]));
    }
    // Upper QR code: 50x50 at (125, 100), partly under the divider.
    let dark = (103..150)
        .flat_map(|y| (125..175).map(move |x| (x, y)))
        .filter(|&(x, y)| meme.get_pixel(x, y)[0] < 64)
        .count();
    assert!(dark > 0);
}

#[test]
fn missing_lower_text_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let a = solid(dir.path(), "a.png", 10, 10);
    let b = solid(dir.path(), "b.png", 10, 10);
    let out = dir.path().join("out.png");

    let output = qr_meme(&[
        "--no-image",
        s(&a),
        "--yes-image",
        s(&b),
        "--upper-text",
        "NO",
        "--upper-qr",
        "http://x",
        "--lower-qr",
        "http://y",
        "--output",
        s(&out),
    ]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--lower-text"), "{stderr}");
    assert!(!out.exists());
}

#[test]
fn oversized_qr_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let template = solid(dir.path(), "template.png", 400, 400);
    let payload = dir.path().join("payload.txt");
    std::fs::write(&payload, "q".repeat(5000)).unwrap();
    let out = dir.path().join("out.png");

    let output = qr_meme(&[
        "--template",
        s(&template),
        "--upper-qr",
        s(&payload),
        "--lower-qr",
        "http://y",
        "--output",
        s(&out),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("5000-byte payload"), "{stderr}");
    assert!(!out.exists());
}

#[test]
fn template_mode_overlays_qr_codes() {
    let dir = tempfile::tempdir().unwrap();
    let template = solid(dir.path(), "template.png", 400, 400);
    let out = dir.path().join("out.png");

    let output = qr_meme(&[
        "--template",
        s(&template),
        "--upper-qr",
        "upper",
        "--lower-qr",
        "lower",
        "--output",
        s(&out),
    ]);
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout.trim(),
        format!("QR codes added and meme saved to {}", out.display())
    );

    let result = image::open(&out).unwrap().to_rgb8();
    assert_eq!(result.dimensions(), (400, 400));
    // Outside the QR rectangles (250..350, 100..200 and 300..400) nothing moves.
    assert_eq!(result.get_pixel(10, 10), &Rgb([120, 140, 160]));
    assert_eq!(result.get_pixel(200, 200), &Rgb([120, 140, 160]));
    assert_eq!(result.get_pixel(249, 150), &Rgb([120, 140, 160]));
    // Quiet zone corner of the upper code.
    assert_eq!(result.get_pixel(251, 101), &Rgb([255, 255, 255]));
}

#[test]
fn missing_template_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.png");
    let missing = dir.path().join("nope.png");

    let output = qr_meme(&[
        "--template",
        s(&missing),
        "--upper-qr",
        "a",
        "--lower-qr",
        "b",
        "--output",
        s(&out),
    ]);
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn config_file_changes_the_layout() {
    let dir = tempfile::tempdir().unwrap();
    let template = solid(dir.path(), "template.png", 400, 400);
    let config = dir.path().join("meme.toml");
    std::fs::write(&config, "[layout]\nqr_top_offset = 0\n").unwrap();
    let out = dir.path().join("out.png");

    let output = qr_meme(&[
        "--template",
        s(&template),
        "--upper-qr",
        "a",
        "--lower-qr",
        "b",
        "--output",
        s(&out),
        "--config",
        s(&config),
    ]);
    assert!(output.status.success(), "{:?}", output);

    let result = image::open(&out).unwrap().to_rgb8();
    assert_eq!(result.get_pixel(251, 1), &Rgb([255, 255, 255]));
    assert_eq!(result.get_pixel(251, 150), &Rgb([120, 140, 160]));
}

#[test]
fn empty_caption_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let a = solid(dir.path(), "a.png", 10, 10);
    let out = dir.path().join("out.png");

    let output = qr_meme(&[
        "--no-image",
        s(&a),
        "--yes-image",
        s(&a),
        "--upper-text",
        "NO",
        "--lower-text",
        "",
        "--upper-qr",
        "http://x",
        "--lower-qr",
        "http://y",
        "--output",
        s(&out),
    ]);
    assert!(!output.status.success());
    assert!(!out.exists());
}
