#![cfg(feature = "cli")]

mod common;

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use boardscan::{write_detections, ScanParams};
use common::{board_image, reference_boxes, square_mask, REFERENCE_PLACEMENT};
use image::GrayImage;
use predicates::prelude::*;
use tempfile::TempDir;

struct Inputs {
    dir: TempDir,
    image: PathBuf,
    mask: PathBuf,
    detections: PathBuf,
}

impl Inputs {
    fn reference() -> Self {
        Self::with_mask(square_mask(256, 28, 227))
    }

    fn with_mask(mask: GrayImage) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let image = dir.path().join("board.png");
        let mask_path = dir.path().join("mask.png");
        let detections = dir.path().join("pieces.json");
        board_image(256).save(&image).expect("save image");
        mask.save(&mask_path).expect("save mask");
        write_detections(&detections, &reference_boxes()).expect("save detections");
        Self {
            dir,
            image,
            mask: mask_path,
            detections,
        }
    }

    fn dir(&self) -> &Path {
        self.dir.path()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("boardscan").expect("boardscan binary");
        cmd.arg("--image")
            .arg(&self.image)
            .arg("--mask")
            .arg(&self.mask)
            .arg("--detections")
            .arg(&self.detections);
        cmd
    }
}

#[test]
fn prints_the_placement() {
    let inputs = Inputs::reference();
    inputs
        .command()
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{REFERENCE_PLACEMENT}\n")));
}

#[test]
fn side_flag_appends_the_move_context() {
    let inputs = Inputs::reference();
    inputs
        .command()
        .args(["--side", "w"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{REFERENCE_PLACEMENT} w - - 0 0\n"
        )));
}

#[test]
fn config_file_is_honoured() {
    let inputs = Inputs::reference();
    let config = inputs.dir().join("scan.json");
    let params = ScanParams {
        side_to_move: Some(boardscan::Side::Black),
        ..ScanParams::default()
    };
    params.write_json(&config).expect("write config");

    inputs
        .command()
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::ends_with(" b - - 0 0\n"));
}

#[test]
fn debug_image_flag_writes_the_warped_board() {
    let inputs = Inputs::reference();
    let out = inputs.dir().join("warped.png");
    inputs
        .command()
        .arg("--debug-image")
        .arg(&out)
        .assert()
        .success();
    assert!(out.exists());
}

#[test]
fn missing_board_fails_with_a_message() {
    let inputs = Inputs::with_mask(GrayImage::new(256, 256));
    inputs
        .command()
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to process the image"));
}

#[test]
fn unreadable_detections_are_an_error() {
    let inputs = Inputs::reference();
    std::fs::write(&inputs.detections, "not json").expect("overwrite");
    inputs
        .command()
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn invalid_side_is_rejected_by_the_parser() {
    let inputs = Inputs::reference();
    inputs
        .command()
        .args(["--side", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("side must be"));
}
