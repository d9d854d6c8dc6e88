//! # frame-sampler
//!
//! Sample still frames from a video file at fixed fractions of its playback
//! duration (20%, 50% and 80% by default) and save them as JPEG images,
//! powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use frame_sampler::{FrameSampler, FrameStatus, SamplerConfig};
//!
//! let config = SamplerConfig::new("input.mp4", "video_frames");
//! let report = FrameSampler::new(config).run()?;
//!
//! for frame in &report.frames {
//!     match &frame.status {
//!         FrameStatus::Saved(path) => println!("Saved {}", path.display()),
//!         FrameStatus::Failed(reason) => {
//!             println!("Failed to extract frame at {:?}: {reason}", frame.timestamp)
//!         }
//!     }
//! }
//! # Ok::<(), frame_sampler::SamplerError>(())
//! ```
//!
//! ## How a run proceeds
//!
//! 1. The video is opened; failure here is fatal and writes nothing.
//! 2. The output directory is created if missing.
//! 3. The duration is derived as `frame_count / fps`.
//! 4. For each timestamp the source is sought (millisecond resolution) and
//!    one frame is decoded and written as `frame_<index>.jpg`. A frame that
//!    cannot be decoded is reported and skipped.
//! 5. The video handle is released, whatever happened above.
//!
//! Diagnostics go through the [`log`](https://crates.io/crates/log) facade;
//! FFmpeg's own console output is tuned with [`set_ffmpeg_log_level`].
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on the build machine.

pub mod config;
mod conversion;
pub mod error;
pub mod ffmpeg;
pub mod metadata;
pub mod progress;
pub mod sampler;
pub mod source;
pub mod video;

pub use config::{DEFAULT_FRACTIONS, DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_DIR, SamplerConfig};
pub use error::SamplerError;
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use metadata::VideoMetadata;
pub use progress::{ProgressCallback, ProgressInfo};
pub use sampler::{
    FrameOutcome, FrameSampler, FrameStatus, SampleReport, sample_timestamps, write_jpeg,
};
pub use source::FrameSource;
pub use video::VideoHandle;
