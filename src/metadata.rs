//! Video stream metadata.
//!
//! [`VideoMetadata`] is read once when a [`VideoHandle`](crate::VideoHandle)
//! is opened and cached for the lifetime of the handle.

use std::time::Duration;

use crate::error::SamplerError;

/// Metadata for the sampled video stream.
///
/// # Example
///
/// ```
/// use frame_sampler::VideoMetadata;
///
/// let metadata = VideoMetadata {
///     width: 640,
///     height: 480,
///     frames_per_second: 25.0,
///     frame_count: 250,
///     codec: "h264".to_string(),
///     stream_index: 0,
/// };
/// assert_eq!(metadata.duration().unwrap().as_secs(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (average rate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Total number of frames, as reported by the container or estimated
    /// from the stream duration.
    pub frame_count: u64,
    /// Codec name (e.g. `"h264"`, `"vp9"`).
    pub codec: String,
    /// Index of the stream within the container.
    pub stream_index: usize,
}

impl VideoMetadata {
    /// Playback duration, `frame_count / frames_per_second`.
    ///
    /// # Errors
    ///
    /// Returns [`SamplerError::InvalidFrameRate`] unless the frame rate is
    /// finite and strictly positive, and yields a representable duration.
    pub fn duration(&self) -> Result<Duration, SamplerError> {
        let fps = self.frames_per_second;
        if !fps.is_finite() || fps <= 0.0 {
            return Err(SamplerError::InvalidFrameRate(fps));
        }
        Duration::try_from_secs_f64(self.frame_count as f64 / fps)
            .map_err(|_| SamplerError::InvalidFrameRate(fps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(frames_per_second: f64, frame_count: u64) -> VideoMetadata {
        VideoMetadata {
            width: 320,
            height: 240,
            frames_per_second,
            frame_count,
            codec: "h264".to_string(),
            stream_index: 0,
        }
    }

    #[test]
    fn duration_from_frame_count() {
        let duration = metadata(30.0, 450).duration().unwrap();
        assert!((duration.as_secs_f64() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn fractional_frame_rate() {
        let duration = metadata(30_000.0 / 1001.0, 300).duration().unwrap();
        assert!((duration.as_secs_f64() - 10.01).abs() < 1e-6);
    }

    #[test]
    fn zero_frames_is_zero_duration() {
        assert_eq!(metadata(24.0, 0).duration().unwrap(), Duration::ZERO);
    }

    #[test]
    fn rejects_unusable_frame_rates() {
        for fps in [0.0, -25.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(metadata(fps, 100).duration(), Err(SamplerError::InvalidFrameRate(_))),
                "fps {fps} should be rejected",
            );
        }
        assert!(matches!(
            metadata(1e-12, 1_000_000_000).duration(),
            Err(SamplerError::InvalidFrameRate(_))
        ));
    }
}
