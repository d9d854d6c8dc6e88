//! Error types for the `frame-sampler` crate.
//!
//! [`SamplerError`] is returned by every fallible operation. Whether a given
//! error ends the run or only skips one timestamp is decided by the sampler,
//! not by the variant: seek and decode failures inside the sampling loop are
//! recorded and skipped, everything else propagates.

use std::{io::Error as IoError, path::PathBuf, time::Duration};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `frame-sampler` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SamplerError {
    /// The video file could not be opened.
    #[error("Could not open video at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoHandle::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file opened but contains no video stream.
    #[error("Could not open video at {path}: no video stream found")]
    NoVideoStream {
        /// Path of the opened file.
        path: PathBuf,
    },

    /// The reported frame rate cannot be used to derive a duration.
    #[error("Invalid frame rate {0}: duration is undefined")]
    InvalidFrameRate(f64),

    /// A sampling fraction lies outside `0.0..=1.0`.
    #[error("Invalid sampling fraction {0}: must be within 0.0..=1.0")]
    InvalidFraction(f64),

    /// JPEG quality outside `1..=100`.
    #[error("Invalid JPEG quality {0}: must be within 1..=100")]
    InvalidQuality(u8),

    /// No frame could be decoded at or after the requested position.
    #[error("No frame could be decoded at {0:?}")]
    FrameNotFound(Duration),

    /// A video frame could not be decoded or converted.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while creating the output directory or writing
    /// an image.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while encoding a frame.
    #[error("Image encoding error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for SamplerError {
    fn from(error: FfmpegError) -> Self {
        SamplerError::FfmpegError(error.to_string())
    }
}

impl SamplerError {
    /// Returns `true` for errors raised while opening the video source.
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            SamplerError::FileOpen { .. } | SamplerError::NoVideoStream { .. }
        )
    }
}
