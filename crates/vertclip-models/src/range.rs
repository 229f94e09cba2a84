//! Time ranges and keyframe sets.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest clip the encoder is ever asked for, in seconds.
pub const MIN_CLIP_DURATION: f64 = 0.1;

/// Invalid user-supplied range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("start time must be a finite, non-negative number of seconds (got {0})")]
    InvalidStart(f64),

    #[error("end time must be a finite number of seconds (got {0})")]
    InvalidEnd(f64),
}

/// Time range requested by the operator, in seconds.
///
/// `end` is allowed to be at or before `start`; alignment turns such a
/// request into a minimum-length clip instead of rejecting it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestedRange {
    pub start: f64,
    pub end: f64,
}

impl RequestedRange {
    pub fn new(start: f64, end: f64) -> Result<Self, RangeError> {
        if !start.is_finite() || start < 0.0 {
            return Err(RangeError::InvalidStart(start));
        }
        if !end.is_finite() {
            return Err(RangeError::InvalidEnd(end));
        }
        Ok(Self { start, end })
    }

    /// Whether the range is empty or inverted.
    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }
}

/// Keyframe-aligned range handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRange {
    pub start: f64,
    pub end: f64,
    /// Always at least [`MIN_CLIP_DURATION`].
    pub duration: f64,
}

impl AlignedRange {
    /// Seconds added on both sides compared to the request.
    pub fn widened_by(&self, requested: &RequestedRange) -> (f64, f64) {
        (
            (requested.start - self.start).max(0.0),
            (self.end - requested.end).max(0.0),
        )
    }
}

/// Sorted keyframe timestamps of a video stream, in seconds.
///
/// An empty set means the stream carried no keyframe metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyframeSet(Vec<f64>);

impl KeyframeSet {
    /// Build a set from timestamps in any order.
    pub fn from_unsorted(mut times: Vec<f64>) -> Self {
        times.sort_by(f64::total_cmp);
        Self(times)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.0.last().copied()
    }
}

impl FromIterator<f64> for KeyframeSet {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::from_unsorted(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_range_validation() {
        assert!(RequestedRange::new(0.0, 5.0).is_ok());
        assert!(RequestedRange::new(5.0, 5.0).is_ok());
        assert!(RequestedRange::new(5.0, 1.0).is_ok());
        assert_eq!(
            RequestedRange::new(-1.0, 5.0),
            Err(RangeError::InvalidStart(-1.0))
        );
        assert!(matches!(
            RequestedRange::new(1.0, f64::INFINITY),
            Err(RangeError::InvalidEnd(_))
        ));
        assert!(matches!(
            RequestedRange::new(f64::NAN, 2.0),
            Err(RangeError::InvalidStart(_))
        ));
    }

    #[test]
    fn test_degenerate_range() {
        assert!(RequestedRange::new(5.0, 5.0).unwrap().is_degenerate());
        assert!(RequestedRange::new(5.0, 4.0).unwrap().is_degenerate());
        assert!(!RequestedRange::new(4.0, 5.0).unwrap().is_degenerate());
    }

    #[test]
    fn test_keyframe_set_sorts() {
        let set: KeyframeSet = vec![4.0, 0.0, 2.0].into_iter().collect();
        assert_eq!(set.as_slice(), &[0.0, 2.0, 4.0]);
        assert_eq!(set.first(), Some(0.0));
        assert_eq!(set.last(), Some(4.0));
        assert!(KeyframeSet::empty().is_empty());
    }

    #[test]
    fn test_widened_by() {
        let requested = RequestedRange::new(2.5, 5.0).unwrap();
        let aligned = AlignedRange {
            start: 2.0,
            end: 6.0,
            duration: 4.0,
        };
        assert_eq!(aligned.widened_by(&requested), (0.5, 1.0));
    }
}
