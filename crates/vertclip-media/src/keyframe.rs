//! Keyframe alignment of a requested clip range.
//!
//! Re-encoding from a point inside a frame group makes the decoder start
//! without its reference frame, which shows up as corrupt or black frames at
//! the cut. The requested start is therefore moved back to the keyframe at or
//! before it and the end forward to the keyframe at or after it, so the encoder
//! always receives whole frame groups. The output may be slightly longer than
//! requested on either side.

use vertclip_models::{AlignedRange, KeyframeSet, RequestedRange, MIN_CLIP_DURATION};

/// Greatest keyframe `<= t`.
pub fn keyframe_at_or_before(keyframes: &KeyframeSet, t: f64) -> Option<f64> {
    let times = keyframes.as_slice();
    let idx = times.partition_point(|&kf| kf <= t);
    idx.checked_sub(1).map(|i| times[i])
}

/// Smallest keyframe `>= t`.
pub fn keyframe_at_or_after(keyframes: &KeyframeSet, t: f64) -> Option<f64> {
    let times = keyframes.as_slice();
    let idx = times.partition_point(|&kf| kf < t);
    times.get(idx).copied()
}

/// Compute the keyframe-aligned range for a request.
///
/// - With no keyframes the request passes through unchanged.
/// - A start before the first keyframe falls back to `0.0`.
/// - An end past the last keyframe is clamped to the last keyframe.
/// - If the aligned end does not lie after the aligned start, the end is
///   forced to `max(requested.end, start + 0.1)`.
/// - The duration never drops below [`MIN_CLIP_DURATION`].
pub fn locate(keyframes: &KeyframeSet, requested: &RequestedRange) -> AlignedRange {
    let (start, mut end) = match keyframes.last() {
        None => (requested.start, requested.end),
        Some(last) => (
            keyframe_at_or_before(keyframes, requested.start).unwrap_or(0.0),
            keyframe_at_or_after(keyframes, requested.end).unwrap_or(last),
        ),
    };

    if end <= start {
        end = requested.end.max(start + MIN_CLIP_DURATION);
    }

    AlignedRange {
        start,
        end,
        duration: (end - start).max(MIN_CLIP_DURATION),
    }
}
