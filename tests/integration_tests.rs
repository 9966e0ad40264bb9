mod common;

use assert_cmd::Command;
use assert_fs::prelude::*;
use common::{create_mixed_directory, create_temp_directory, gradient_image, write_image};
use image::ImageFormat;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("img-shrink").unwrap()
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compress"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn test_subcommand_help() {
    for sub in ["compress", "batch", "local", "info", "formats"] {
        cmd().args([sub, "--help"]).assert().success();
    }
}

#[test]
fn test_compress_missing_args() {
    cmd().arg("compress").assert().failure();
}

#[test]
fn test_compress_nonexistent_file() {
    cmd()
        .args(["compress", "nonexistent.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_compress_png_to_jpeg_at_low_quality() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = write_image(temp.path(), "photo.png", &gradient_image(120, 80), ImageFormat::Png);
    let out = temp.child("out");

    cmd()
        .arg("compress")
        .arg(&input)
        .arg("-o")
        .arg(out.path())
        .args(["-q", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("photo_compressed.jpg"));

    out.child("photo_compressed.jpg").assert(predicate::path::is_file());
}

#[test]
fn test_compress_json_report() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = write_image(temp.path(), "pic.png", &gradient_image(32, 32), ImageFormat::Png);

    let output = cmd()
        .arg("compress")
        .arg(&input)
        .arg("-o")
        .arg(temp.path())
        .args(["-q", "90", "-f", "webp", "--json", "--embed"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["original"]["width"], 32);
    assert_eq!(value["compressed"]["format"], "webp");
    assert_eq!(value["compressed"]["name"], "pic_compressed.webp");
    assert!(value["image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/webp;base64,"));
}

#[test]
fn test_compress_with_invalid_quality() {
    let temp = create_temp_directory();
    let input = write_image(temp.path(), "x.png", &gradient_image(8, 8), ImageFormat::Png);

    cmd()
        .arg("compress")
        .arg(&input)
        .args(["-q", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid quality value"));
}

#[test]
fn test_compress_with_unknown_format() {
    let temp = create_temp_directory();
    let input = write_image(temp.path(), "x.png", &gradient_image(8, 8), ImageFormat::Png);

    cmd()
        .arg("compress")
        .arg(&input)
        .args(["-f", "avif"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}

#[test]
fn test_batch_reports_partial_failure() {
    let temp = assert_fs::TempDir::new().unwrap();
    let input = temp.child("in");
    input.create_dir_all().unwrap();
    create_mixed_directory(input.path());
    let out = temp.child("out");

    let output = cmd()
        .arg("batch")
        .arg(input.path())
        .arg("-o")
        .arg(out.path())
        .args(["-q", "85", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["total"], 3);
    assert_eq!(value["summary"]["successful"], 2);
    assert_eq!(value["summary"]["failed"], 1);

    let results = value["results"].as_array().unwrap();
    assert_eq!(results[2]["success"], false);
    assert_eq!(results[2]["originalName"], "c.png");

    out.child("a_compressed.png").assert(predicate::path::is_file());
    out.child("b_compressed.jpg").assert(predicate::path::is_file());
}

#[test]
fn test_batch_async_matches_parallel() {
    let temp = assert_fs::TempDir::new().unwrap();
    create_mixed_directory(temp.path());

    let output = cmd()
        .arg("batch")
        .arg(temp.path())
        .arg("-o")
        .arg(temp.child("out").path())
        .args(["--async", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["successful"], 2);
    assert_eq!(value["results"][0]["original"]["name"], "a.png");
}

#[test]
fn test_batch_too_many_files() {
    let temp = create_temp_directory();
    for i in 0..3 {
        write_image(temp.path(), &format!("{}.png", i), &gradient_image(4, 4), ImageFormat::Png);
    }

    cmd()
        .env("IMG_SHRINK_MAX_FILES", "2")
        .arg("batch")
        .arg(temp.path())
        .arg("-o")
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Batch file count limit exceeded"));
}

#[test]
fn test_batch_nonexistent_input() {
    cmd()
        .args(["batch", "nonexistent-dir-for-test", "-o", "output"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No image files found"));
}

#[test]
fn test_local_saves_with_download_names() {
    let temp = assert_fs::TempDir::new().unwrap();
    let a = write_image(temp.path(), "a.png", &gradient_image(20, 20), ImageFormat::Png);
    let b = write_image(temp.path(), "b.png", &gradient_image(20, 20), ImageFormat::Png);
    let out = temp.child("out");

    cmd()
        .arg("local")
        .arg(&a)
        .arg(&b)
        .arg("-o")
        .arg(out.path())
        .args(["--delay-ms", "0"])
        .assert()
        .success();

    out.child("compressed_a.jpg").assert(predicate::path::is_file());
    out.child("compressed_b.jpg").assert(predicate::path::is_file());
}

#[test]
fn test_info_json() {
    let temp = create_temp_directory();
    let input = write_image(temp.path(), "i.png", &gradient_image(30, 10), ImageFormat::Png);

    let output = cmd().arg("info").arg(&input).arg("--json").output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["width"], 30);
    assert_eq!(value["format"], "png");
}

#[test]
fn test_info_nonexistent_file() {
    cmd().args(["info", "nonexistent.jpg"]).assert().failure();
}

#[test]
fn test_formats_json() {
    cmd()
        .args(["formats", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"maxFiles\": 20"))
        .stdout(predicate::str::contains("\"maxSize\": \"10 MB\""));
}
