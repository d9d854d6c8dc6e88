//! Fraction-based frame sampling.
//!
//! [`FrameSampler`] runs the whole extraction: open the video, derive the
//! duration from its frame count and frame rate, compute one timestamp per
//! configured fraction, then seek, decode and write `frame_<index>.jpg` for
//! each timestamp in turn.
//!
//! A timestamp whose frame cannot be sought or decoded is recorded as
//! [`FrameStatus::Failed`] and skipped. Everything else (an unopenable video,
//! an unusable frame rate, a directory or image that cannot be written) ends
//! the run with an error.
//!
//! # Example
//!
//! ```no_run
//! use frame_sampler::{FrameSampler, SamplerConfig};
//!
//! let report = FrameSampler::new(SamplerConfig::new("input.mp4", "video_frames")).run()?;
//! println!("saved {} of {} frames", report.saved_count(), report.frames.len());
//! # Ok::<(), frame_sampler::SamplerError>(())
//! ```

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use image::{DynamicImage, codecs::jpeg::JpegEncoder};

use crate::{
    config::SamplerConfig,
    conversion,
    error::SamplerError,
    progress::{NoOpProgress, ProgressCallback, ProgressTracker},
    source::FrameSource,
    video::VideoHandle,
};

/// Positions to sample, one per fraction: `duration * fraction`.
///
/// The result follows the order of `fractions`; equal or degenerate
/// positions are kept as-is. Negative or NaN products clamp to zero.
///
/// ```
/// use std::time::Duration;
///
/// use frame_sampler::sample_timestamps;
///
/// let timestamps = sample_timestamps(Duration::from_secs(10), &[0.2, 0.5, 0.8]);
/// assert_eq!(timestamps, vec![
///     Duration::from_secs(2),
///     Duration::from_secs(5),
///     Duration::from_secs(8),
/// ]);
/// ```
pub fn sample_timestamps(duration: Duration, fractions: &[f64]) -> Vec<Duration> {
    fractions
        .iter()
        .map(|fraction| conversion::seconds_to_duration(duration.as_secs_f64() * fraction))
        .collect()
}

/// Encode `image` as JPEG at `path`, replacing any existing file.
///
/// # Errors
///
/// [`SamplerError::IoError`] if the file cannot be created, or
/// [`SamplerError::ImageError`] if encoding fails.
pub fn write_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<(), SamplerError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    image.to_rgb8().write_with_encoder(encoder)?;
    writer.flush()?;
    Ok(())
}

/// What happened at one sampled timestamp.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameStatus {
    /// The frame was written to this path.
    Saved(PathBuf),
    /// The frame could not be sought or decoded.
    Failed(String),
}

/// Outcome for a single timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    /// Position in the timestamp list; also the `frame_<index>.jpg` suffix.
    pub index: usize,
    /// The sampled position.
    pub timestamp: Duration,
    /// Saved or failed.
    pub status: FrameStatus,
}

impl FrameOutcome {
    /// Output path, if the frame was saved.
    pub fn path(&self) -> Option<&Path> {
        match &self.status {
            FrameStatus::Saved(path) => Some(path),
            FrameStatus::Failed(_) => None,
        }
    }
}

/// Result of a completed sampling run.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct SampleReport {
    /// Duration derived from the frame count and frame rate.
    pub duration: Duration,
    /// One outcome per timestamp, in extraction order.
    pub frames: Vec<FrameOutcome>,
}

impl SampleReport {
    /// Number of frames written.
    pub fn saved_count(&self) -> usize {
        self.frames.iter().filter(|frame| frame.path().is_some()).count()
    }

    /// Number of timestamps skipped.
    pub fn failed_count(&self) -> usize {
        self.frames.len() - self.saved_count()
    }

    /// `true` when every timestamp produced a file.
    pub fn is_complete(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Samples still frames from a video at fixed fractions of its duration.
pub struct FrameSampler {
    config: SamplerConfig,
    progress: Arc<dyn ProgressCallback>,
}

impl FrameSampler {
    /// Create a sampler for `config`.
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Attach a progress callback, notified once per timestamp.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// The configuration this sampler runs with.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Open the configured video and sample it.
    ///
    /// The video handle is released before this returns, on success and on
    /// every error path.
    ///
    /// # Errors
    ///
    /// - Configuration errors from [`SamplerConfig::validate`].
    /// - [`SamplerError::FileOpen`] / [`SamplerError::NoVideoStream`] if the
    ///   video cannot be opened. Nothing is written to disk in that case.
    /// - Any error from [`sample`](FrameSampler::sample).
    pub fn run(&self) -> Result<SampleReport, SamplerError> {
        self.config.validate()?;

        let mut handle = VideoHandle::open(&self.config.video_path)?;
        self.sample(&mut handle)
    }

    /// Sample frames from an already opened source.
    ///
    /// Creates the output directory, then seeks, decodes and writes one
    /// frame per configured fraction.
    ///
    /// # Errors
    ///
    /// - Configuration errors from [`SamplerConfig::validate`].
    /// - [`SamplerError::IoError`] if the output directory cannot be created.
    /// - [`SamplerError::InvalidFrameRate`] if the source reports a frame
    ///   rate that is not strictly positive.
    /// - [`SamplerError::IoError`] / [`SamplerError::ImageError`] if a
    ///   decoded frame cannot be written.
    ///
    /// Seek and decode failures are not errors; they are reported as
    /// [`FrameStatus::Failed`] in the returned report.
    pub fn sample<S: FrameSource>(&self, source: &mut S) -> Result<SampleReport, SamplerError> {
        let config = &self.config;
        config.validate()?;

        fs::create_dir_all(&config.output_dir)?;

        let duration = source.metadata().duration()?;
        log::info!("Video duration: {} seconds", duration.as_secs_f64());

        let timestamps = sample_timestamps(duration, &config.fractions);
        let mut tracker = ProgressTracker::new(self.progress.clone(), timestamps.len() as u64);
        let mut frames = Vec::with_capacity(timestamps.len());

        for (index, timestamp) in timestamps.into_iter().enumerate() {
            let status = match source.seek(timestamp).and_then(|()| source.read_frame()) {
                Ok(image) => {
                    let path = config.frame_path(index);
                    write_jpeg(&image, &path, config.jpeg_quality)?;
                    log::info!("Saved {}", path.display());
                    FrameStatus::Saved(path)
                }
                Err(error) => {
                    log::warn!(
                        "Failed to extract frame at {}s: {error}",
                        timestamp.as_secs_f64()
                    );
                    FrameStatus::Failed(error.to_string())
                }
            };

            tracker.advance(timestamp, matches!(status, FrameStatus::Saved(_)));
            frames.push(FrameOutcome {
                index,
                timestamp,
                status,
            });
        }

        let report = SampleReport { duration, frames };
        log::debug!(
            "Sampling finished: {} saved, {} failed",
            report.saved_count(),
            report.failed_count()
        );
        Ok(report)
    }
}
