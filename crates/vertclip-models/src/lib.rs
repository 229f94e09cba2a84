//! Shared data models for vertclip.
//!
//! This crate provides plain, Serde-serializable types for:
//! - Requested and keyframe-aligned time ranges
//! - Keyframe sets
//! - Encoding and transcode parameters
//! - Timestamp parsing

pub mod encoding;
pub mod range;
pub mod timestamp;
pub mod transcode;

// Re-export common types
pub use encoding::EncodingConfig;
pub use range::{AlignedRange, KeyframeSet, RangeError, RequestedRange, MIN_CLIP_DURATION};
pub use timestamp::{parse_timestamp, TimestampError};
pub use transcode::{LoudnessTarget, SubtitleOverlay, SubtitleStyle, TargetGeometry, TranscodeSpec};
