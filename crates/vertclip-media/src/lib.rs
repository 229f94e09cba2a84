//! FFmpeg CLI wrapper for keyframe-aligned vertical clips.
//!
//! This crate provides:
//! - Keyframe probing through `ffprobe`
//! - Keyframe alignment of a requested time range
//! - Typed FFmpeg filter-chain building
//! - FFmpeg command building and a runner that streams encoder output

pub mod clip;
pub mod command;
pub mod error;
pub mod filters;
pub mod fs_utils;
pub mod keyframe;
pub mod probe;

pub use clip::{align_request, create_vertical_clip, plan_clip};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use filters::{build_audio_filter, build_video_filter, FilterChain, FilterStage};
pub use keyframe::locate;
pub use probe::{FfprobeKeyframeProbe, KeyframeProbe};
