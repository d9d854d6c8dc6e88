//! Internal conversion helpers.
//!
//! Timestamp arithmetic between stream time bases, seconds, and FFmpeg's
//! AV_TIME_BASE, plus pixel-buffer copying.

use std::time::Duration;

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy pixel data from a packed single-plane frame into a tightly-packed
/// buffer, dropping per-row padding.
pub(crate) fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_length = (width as usize) * bytes_per_pixel;
    let data = video_frame.data(0);

    if stride == row_length {
        data[..row_length * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_length * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_length]);
        }
        buffer
    }
}

/// Truncate a position to whole milliseconds, saturating at `u64::MAX`.
pub(crate) fn to_milliseconds(position: Duration) -> u64 {
    u64::try_from(position.as_millis()).unwrap_or(u64::MAX)
}

/// Convert a millisecond position to a seek timestamp in AV_TIME_BASE.
///
/// `offset` is the container start time, added so that position zero maps
/// to the first presented frame. `None` if the result does not fit in an
/// `i64`.
pub(crate) fn milliseconds_to_seek_timestamp(milliseconds: u64, offset: Duration) -> Option<i64> {
    let offset = i64::try_from(offset.as_micros()).ok()?;
    i64::try_from(milliseconds)
        .ok()?
        .checked_mul(1_000)?
        .checked_add(offset)
}

/// Rescale a PTS value from a stream time base to seconds.
pub(crate) fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Convert an AV_TIME_BASE value (microseconds) to a [`Duration`], clamping
/// negative values to zero.
pub(crate) fn microseconds_to_duration(microseconds: i64) -> Duration {
    if microseconds > 0 {
        Duration::from_micros(microseconds as u64)
    } else {
        Duration::ZERO
    }
}

/// Frames per second from a rational rate; zero when the rate is unset.
pub(crate) fn rational_to_fps(rate: Rational) -> f64 {
    if rate.denominator() == 0 || rate.numerator() <= 0 {
        0.0
    } else {
        rate.numerator() as f64 / rate.denominator() as f64
    }
}

/// Seconds as a [`Duration`], clamping negative and NaN values to zero and
/// values too large to represent to [`Duration::MAX`].
pub(crate) fn seconds_to_duration(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        Duration::ZERO
    } else {
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }
}

/// Whether a decoded frame is the one a read after seeking to `target`
/// should return.
///
/// The frame's presentation time is shifted by the stream's `start_offset`
/// and must lie no earlier than half a frame interval before `target`.
/// Frames without a timestamp are accepted.
pub(crate) fn frame_reaches_position(
    pts: Option<i64>,
    time_base: Rational,
    start_offset: Duration,
    target: Duration,
    frames_per_second: f64,
) -> bool {
    let Some(pts) = pts else {
        return true;
    };
    let half_interval = if frames_per_second > 0.0 {
        0.5 / frames_per_second
    } else {
        0.0
    };
    let presented = pts_to_seconds(pts, time_base) - start_offset.as_secs_f64();
    presented >= target.as_secs_f64() - half_interval
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milliseconds_truncate() {
        assert_eq!(to_milliseconds(Duration::from_secs_f64(1.2345)), 1234);
        assert_eq!(to_milliseconds(Duration::ZERO), 0);
    }

    #[test]
    fn milliseconds_saturate() {
        assert_eq!(to_milliseconds(Duration::MAX), u64::MAX);
    }

    #[test]
    fn seek_timestamp_adds_offset() {
        assert_eq!(milliseconds_to_seek_timestamp(1_500, Duration::ZERO), Some(1_500_000));
        assert_eq!(
            milliseconds_to_seek_timestamp(1_500, Duration::from_millis(20)),
            Some(1_520_000)
        );
    }

    #[test]
    fn seek_timestamp_overflow_is_none() {
        assert_eq!(milliseconds_to_seek_timestamp(u64::MAX, Duration::ZERO), None);
        assert_eq!(milliseconds_to_seek_timestamp(i64::MAX as u64 / 10, Duration::ZERO), None);
        assert_eq!(milliseconds_to_seek_timestamp(0, Duration::MAX), None);
    }

    #[test]
    fn pts_in_common_time_bases() {
        assert!((pts_to_seconds(90_000, Rational::new(1, 90_000)) - 1.0).abs() < 1e-12);
        assert!((pts_to_seconds(512, Rational::new(1, 12_800)) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn negative_microseconds_clamp() {
        assert_eq!(microseconds_to_duration(-5), Duration::ZERO);
        assert_eq!(microseconds_to_duration(2_000_000), Duration::from_secs(2));
    }

    #[test]
    fn frame_rates() {
        assert!((rational_to_fps(Rational::new(30_000, 1001)) - 29.97).abs() < 0.01);
        assert_eq!(rational_to_fps(Rational::new(0, 0)), 0.0);
        assert_eq!(rational_to_fps(Rational::new(25, 0)), 0.0);
    }

    #[test]
    fn seconds_clamp() {
        assert_eq!(seconds_to_duration(-1.0), Duration::ZERO);
        assert_eq!(seconds_to_duration(f64::NAN), Duration::ZERO);
        assert_eq!(seconds_to_duration(2.5), Duration::from_millis(2_500));
        assert_eq!(seconds_to_duration(f64::INFINITY), Duration::MAX);
        assert_eq!(seconds_to_duration(1e300), Duration::MAX);
    }

    const MPEG_TIME_BASE: Rational = Rational(1, 90_000);

    fn reaches(pts: Option<i64>, start_offset: Duration, target_millis: u64) -> bool {
        frame_reaches_position(
            pts,
            MPEG_TIME_BASE,
            start_offset,
            Duration::from_millis(target_millis),
            30.0,
        )
    }

    #[test]
    fn frames_before_target_are_skipped() {
        // 30 fps: one frame is 3_000 ticks, half a frame is 1_500.
        assert!(!reaches(Some(90_000), Duration::ZERO, 2_000));
        assert!(!reaches(Some(180_000 - 1_600), Duration::ZERO, 2_000));
    }

    #[test]
    fn frames_within_half_interval_reach_target() {
        assert!(reaches(Some(180_000 - 1_400), Duration::ZERO, 2_000));
        assert!(reaches(Some(180_000), Duration::ZERO, 2_000));
        assert!(reaches(Some(183_000), Duration::ZERO, 2_000));
    }

    #[test]
    fn start_offset_shifts_presentation_time() {
        let offset = Duration::from_secs(1);
        // Stream time 2.5s is playback time 1.5s.
        assert!(!reaches(Some(225_000), offset, 2_000));
        assert!(reaches(Some(270_000), offset, 2_000));
        assert!(reaches(Some(90_000), offset, 0));
    }

    #[test]
    fn missing_timestamp_is_accepted() {
        assert!(reaches(None, Duration::ZERO, 60_000));
        assert!(reaches(None, Duration::from_secs(1), 0));
    }

    #[test]
    fn unknown_frame_rate_has_no_tolerance() {
        let target = Duration::from_secs(2);
        assert!(!frame_reaches_position(
            Some(179_999),
            MPEG_TIME_BASE,
            Duration::ZERO,
            target,
            0.0
        ));
        assert!(frame_reaches_position(
            Some(180_000),
            MPEG_TIME_BASE,
            Duration::ZERO,
            target,
            0.0
        ));
    }
}
