//! The seek-and-decode seam used by the sampler.

use std::time::Duration;

use image::DynamicImage;

use crate::{error::SamplerError, metadata::VideoMetadata};

/// A seekable source of decoded frames.
///
/// [`VideoHandle`](crate::VideoHandle) is the FFmpeg-backed implementation.
/// [`FrameSampler::sample`](crate::FrameSampler::sample) is generic over this
/// trait so that sampling can run against any decoder.
pub trait FrameSource {
    /// Stream metadata (frame rate and frame count drive the duration).
    fn metadata(&self) -> &VideoMetadata;

    /// Reposition the read cursor to `position` from the start of playback.
    fn seek(&mut self, position: Duration) -> Result<(), SamplerError>;

    /// Decode the next frame at or after the last seek position.
    fn read_frame(&mut self) -> Result<DynamicImage, SamplerError>;
}
