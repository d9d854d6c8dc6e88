//! FFmpeg-backed video source.
//!
//! [`VideoHandle`] owns the demuxer and decoder for the best video stream of
//! a file. It is the production [`FrameSource`]: seeks land on the nearest
//! keyframe at or before the target, and decoding runs forward until the
//! first frame presented at the target.
//!
//! The handle releases its FFmpeg resources when dropped, so every exit
//! path of a sampling run (early `?` returns included) closes the file.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{conversion, error::SamplerError, metadata::VideoMetadata, source::FrameSource};

/// An opened video file, positioned for seek-and-decode.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use frame_sampler::{FrameSource, VideoHandle};
///
/// let mut handle = VideoHandle::open("input.mp4")?;
/// println!("{:.2} fps", handle.metadata().frames_per_second);
///
/// handle.seek(Duration::from_secs(3))?;
/// let frame = handle.read_frame()?;
/// frame.save("frame_3s.jpg")?;
/// # Ok::<(), frame_sampler::SamplerError>(())
/// ```
pub struct VideoHandle {
    input_context: Input,
    decoder: VideoDecoder,
    /// Built from the first decoded frame, since some codecs only report
    /// their pixel format once decoding starts.
    scaler: Option<ScalingContext>,
    stream_index: usize,
    time_base: Rational,
    /// Presentation time of the first frame; seeks are relative to it.
    start_offset: Duration,
    /// Target of the most recent seek.
    position: Duration,
    metadata: VideoMetadata,
    path: PathBuf,
}

impl Debug for VideoHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoHandle")
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl VideoHandle {
    /// Open a video file and prepare a decoder for its best video stream.
    ///
    /// # Errors
    ///
    /// - [`SamplerError::FileOpen`] if the file is missing, unreadable, not a
    ///   recognised container, or uses a codec with no available decoder.
    /// - [`SamplerError::NoVideoStream`] if the container has no video.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SamplerError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Opening video: {}", path.display());

        let open_error = |reason: String| SamplerError::FileOpen {
            path: path.clone(),
            reason,
        };

        ffmpeg_next::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| open_error(error.to_string()))?;

        let (
            decoder,
            stream_index,
            time_base,
            start_offset,
            frames_per_second,
            reported_frames,
            stream_duration,
        ) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or_else(|| SamplerError::NoVideoStream { path: path.clone() })?;

            let decoder = CodecContext::from_parameters(stream.parameters())
                .and_then(|context| context.decoder().video())
                .map_err(|error| {
                    open_error(format!(
                        "Failed to create video decoder for stream {}: {error}",
                        stream.index()
                    ))
                })?;

            let time_base = stream.time_base();

            // Prefer the average rate; fall back to the stream's base rate.
            let frames_per_second = match conversion::rational_to_fps(stream.avg_frame_rate()) {
                fps if fps > 0.0 => fps,
                _ => conversion::rational_to_fps(stream.rate()),
            };

            let start_offset = if stream.start_time() == ffmpeg_sys_next::AV_NOPTS_VALUE {
                Duration::ZERO
            } else {
                conversion::seconds_to_duration(conversion::pts_to_seconds(
                    stream.start_time(),
                    time_base,
                ))
            };

            let stream_duration = if stream.duration() > 0 {
                Some(conversion::seconds_to_duration(conversion::pts_to_seconds(
                    stream.duration(),
                    time_base,
                )))
            } else {
                None
            };

            (
                decoder,
                stream.index(),
                time_base,
                start_offset,
                frames_per_second,
                stream.frames(),
                stream_duration,
            )
        };

        // Containers without an indexed frame count get an estimate from
        // the stream (or container) duration.
        let frame_count = if reported_frames > 0 {
            reported_frames as u64
        } else {
            let duration = stream_duration
                .unwrap_or_else(|| conversion::microseconds_to_duration(input_context.duration()));
            (duration.as_secs_f64() * frames_per_second) as u64
        };

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            frame_count,
            codec,
            stream_index,
        };

        log::info!(
            "Opened video: {} (format={}, stream={}, {}x{}, {:.3} fps, {} frames, codec={})",
            path.display(),
            input_context.format().name(),
            metadata.stream_index,
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.codec,
        );

        Ok(Self {
            input_context,
            decoder,
            scaler: None,
            stream_index,
            time_base,
            start_offset,
            position: Duration::ZERO,
            metadata,
            path,
        })
    }

    /// Release the handle. Equivalent to dropping it.
    pub fn close(self) {}

    /// Predicate selecting the frame a read after the last seek returns.
    ///
    /// Frames presented within half a frame interval of the target count as
    /// reaching it; frames without any timestamp are accepted as-is.
    fn position_reached(&self) -> impl Fn(&VideoFrame) -> bool + use<> {
        let (time_base, start_offset, target, frames_per_second) = (
            self.time_base,
            self.start_offset,
            self.position,
            self.metadata.frames_per_second,
        );

        move |frame: &VideoFrame| {
            conversion::frame_reaches_position(
                frame.timestamp().or_else(|| frame.pts()),
                time_base,
                start_offset,
                target,
                frames_per_second,
            )
        }
    }
}

impl FrameSource for VideoHandle {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn seek(&mut self, position: Duration) -> Result<(), SamplerError> {
        let milliseconds = conversion::to_milliseconds(position);
        let timestamp = conversion::milliseconds_to_seek_timestamp(milliseconds, self.start_offset)
            .ok_or_else(|| {
                SamplerError::VideoDecodeError(format!("Seek position {position:?} is out of range"))
            })?;

        log::debug!("Seeking to {milliseconds} ms (AV_TIME_BASE timestamp {timestamp})");
        self.input_context.seek(timestamp, ..timestamp)?;
        self.decoder.flush();
        self.position = Duration::from_millis(milliseconds);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<DynamicImage, SamplerError> {
        let reaches_position = self.position_reached();
        let mut decoded_frame = VideoFrame::empty();
        let mut reached = false;

        'packets: for (stream, packet) in self.input_context.packets() {
            if stream.index() != self.stream_index {
                continue;
            }

            if let Err(error) = self.decoder.send_packet(&packet) {
                log::debug!("Skipping undecodable packet: {error}");
                continue;
            }

            while self.decoder.receive_frame(&mut decoded_frame).is_ok() {
                if reaches_position(&decoded_frame) {
                    reached = true;
                    break 'packets;
                }
            }
        }

        if !reached {
            self.decoder.send_eof()?;
            while self.decoder.receive_frame(&mut decoded_frame).is_ok() {
                if reaches_position(&decoded_frame) {
                    reached = true;
                    break;
                }
            }
        }

        if !reached {
            return Err(SamplerError::FrameNotFound(self.position));
        }

        frame_to_image(&mut self.scaler, &decoded_frame)
    }
}

impl Drop for VideoHandle {
    fn drop(&mut self) {
        log::debug!("Released video handle: {}", self.path.display());
    }
}

/// Convert a decoded frame of any pixel format to an RGB8 image.
fn frame_to_image(
    scaler: &mut Option<ScalingContext>,
    frame: &VideoFrame,
) -> Result<DynamicImage, SamplerError> {
    let (width, height, format) = (frame.width(), frame.height(), frame.format());

    let reusable = scaler.as_ref().is_some_and(|context| {
        let input = context.input();
        input.format == format && input.width == width && input.height == height
    });
    if !reusable {
        *scaler = Some(ScalingContext::get(
            format,
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?);
    }
    let Some(context) = scaler.as_mut() else {
        return Err(SamplerError::VideoDecodeError(
            "No pixel-format converter available".to_string(),
        ));
    };

    let mut rgb_frame = VideoFrame::empty();
    context.run(frame, &mut rgb_frame)?;

    let buffer = conversion::frame_to_buffer(&rgb_frame, width, height, 3);
    let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        SamplerError::VideoDecodeError(
            "Failed to construct RGB image from decoded frame data".to_string(),
        )
    })?;
    Ok(DynamicImage::ImageRgb8(image))
}
