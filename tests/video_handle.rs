//! FFmpeg-backed extraction tests.
//!
//! Tests require fixture files from `tests/fixtures/generate_fixtures.sh`
//! and are skipped when they are missing.

use std::{path::Path, time::Duration};

use frame_sampler::{FrameSampler, FrameSource, SamplerConfig, VideoHandle};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

#[test]
fn metadata_matches_fixture() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let handle = VideoHandle::open(path).expect("Failed to open fixture");
    let metadata = handle.metadata();

    assert_eq!((metadata.width, metadata.height), (640, 480));
    assert!((metadata.frames_per_second - 30.0).abs() < 0.01);
    assert_eq!(metadata.frame_count, 150);

    let duration = metadata.duration().expect("Fixture has a valid frame rate");
    assert!((duration.as_secs_f64() - 5.0).abs() < 0.05);
}

#[test]
fn seek_and_read_returns_full_frame() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut handle = VideoHandle::open(path).expect("Failed to open fixture");
    handle.seek(Duration::from_millis(2_500)).expect("Seek failed");
    let frame = handle.read_frame().expect("Decode failed");

    assert_eq!((frame.width(), frame.height()), (640, 480));
    assert!(matches!(frame, image::DynamicImage::ImageRgb8(_)));
}

#[test]
fn reseeking_backwards_works() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut handle = VideoHandle::open(path).expect("Failed to open fixture");
    for millis in [4_000, 1_000, 2_500] {
        handle.seek(Duration::from_millis(millis)).expect("Seek failed");
        handle.read_frame().expect("Decode failed");
    }
}

#[test]
fn read_past_end_fails() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut handle = VideoHandle::open(path).expect("Failed to open fixture");
    let result = handle
        .seek(Duration::from_secs(60))
        .and_then(|()| handle.read_frame());
    assert!(result.is_err());

    // The handle stays usable after a failed read.
    handle.seek(Duration::from_secs(1)).expect("Seek failed");
    handle.read_frame().expect("Decode after failure failed");
}

#[test]
fn run_writes_three_frames() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output_dir = temporary_directory.path().join("video_frames");
    let report = FrameSampler::new(SamplerConfig::new(path, &output_dir))
        .run()
        .expect("Run failed");

    assert!(report.is_complete());
    for index in 0..3 {
        let frame_path = output_dir.join(format!("frame_{index}.jpg"));
        let image = image::open(&frame_path).expect("Frame is not a readable JPEG");
        assert_eq!((image.width(), image.height()), (640, 480));
    }
}
