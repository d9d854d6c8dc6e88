//! Progress reporting.
//!
//! [`FrameSampler`](crate::FrameSampler) notifies a [`ProgressCallback`] once
//! per sampled timestamp, whether the frame was saved or skipped.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use frame_sampler::{FrameSampler, ProgressCallback, ProgressInfo, SamplerConfig};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{}/{} ({:.0}%)", info.current, info.total, info.percentage);
//!     }
//! }
//!
//! let sampler = FrameSampler::new(SamplerConfig::new("input.mp4", "video_frames"))
//!     .with_progress(Arc::new(PrintProgress));
//! sampler.run()?;
//! # Ok::<(), frame_sampler::SamplerError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// A snapshot of sampling progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Timestamps processed so far, saved or failed.
    pub current: u64,
    /// Timestamps in the run.
    pub total: u64,
    /// Completion percentage (0.0 – 100.0).
    pub percentage: f32,
    /// Wall-clock time since sampling started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on throughput so far.
    pub estimated_remaining: Option<Duration>,
    /// The timestamp that was just processed.
    pub timestamp: Duration,
    /// Whether a frame was written for that timestamp.
    pub saved: bool,
}

/// Receives progress updates during sampling.
///
/// Callbacks observe the run but cannot stop it.
pub trait ProgressCallback: Send + Sync {
    /// Called after each timestamp is processed.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. Default when nothing is attached.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks timing across a run and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: u64,
    current: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: u64) -> Self {
        Self {
            callback,
            total,
            current: 0,
            start_time: Instant::now(),
        }
    }

    /// Record one processed timestamp and notify the callback.
    pub(crate) fn advance(&mut self, timestamp: Duration, saved: bool) {
        self.current += 1;
        let elapsed = self.start_time.elapsed();

        let percentage = if self.total > 0 {
            (self.current as f32 / self.total as f32) * 100.0
        } else {
            100.0
        };

        let remaining = self.total.saturating_sub(self.current);
        let estimated_remaining = (self.current > 0)
            .then(|| (elapsed / self.current as u32) * remaining as u32);

        self.callback.on_progress(&ProgressInfo {
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            timestamp,
            saved,
        });
    }
}
