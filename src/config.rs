//! Sampling configuration.
//!
//! [`SamplerConfig`] gathers every input of a sampling run (the video path,
//! the output directory, the sampling fractions, and the JPEG quality) into a
//! single value that is handed to [`FrameSampler`](crate::FrameSampler).
//!
//! # Example
//!
//! ```
//! use frame_sampler::SamplerConfig;
//!
//! let config = SamplerConfig::new("input.mp4", "video_frames").with_jpeg_quality(90);
//! assert_eq!(config.fractions, vec![0.2, 0.5, 0.8]);
//! assert!(config.frame_path(1).ends_with("frame_1.jpg"));
//! ```

use std::path::{Path, PathBuf};

use crate::error::SamplerError;

/// Positions sampled by default, as fractions of the total duration.
pub const DEFAULT_FRACTIONS: [f64; 3] = [0.2, 0.5, 0.8];

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "video_frames";

/// Inputs of a single sampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    /// Video file to sample.
    pub video_path: PathBuf,
    /// Directory receiving `frame_<index>.jpg` files. Created if missing.
    pub output_dir: PathBuf,
    /// Sample positions as fractions of the duration, in extraction order.
    pub fractions: Vec<f64>,
    /// JPEG quality (1–100).
    pub jpeg_quality: u8,
}

impl SamplerConfig {
    /// Create a configuration with the default fractions and JPEG quality.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(video_path: P, output_dir: Q) -> Self {
        Self {
            video_path: video_path.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            fractions: DEFAULT_FRACTIONS.to_vec(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the JPEG quality of written frames.
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Check that every fraction and the JPEG quality are usable.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::InvalidFraction`] for a fraction outside
    ///   `0.0..=1.0` (NaN included).
    /// - [`SamplerError::InvalidQuality`] for a quality outside `1..=100`.
    pub fn validate(&self) -> Result<(), SamplerError> {
        if let Some(&fraction) = self
            .fractions
            .iter()
            .find(|fraction| !(0.0..=1.0).contains(*fraction))
        {
            return Err(SamplerError::InvalidFraction(fraction));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(SamplerError::InvalidQuality(self.jpeg_quality));
        }

        Ok(())
    }

    /// Output path of the frame sampled at position `index`.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!("frame_{index}.jpg"))
    }
}
