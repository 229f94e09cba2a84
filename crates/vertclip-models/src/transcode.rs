//! Fixed transcode parameters for vertical clips.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::encoding::EncodingConfig;

/// Portrait output width in pixels.
pub const TARGET_WIDTH: u32 = 1080;
/// Portrait output height in pixels.
pub const TARGET_HEIGHT: u32 = 1920;
/// Output frame rate.
pub const TARGET_FPS: u32 = 30;

/// Integrated loudness target (LUFS).
pub const LOUDNESS_INTEGRATED: f64 = -16.0;
/// True-peak ceiling (dBTP).
pub const LOUDNESS_TRUE_PEAK: f64 = -1.5;
/// Loudness range target (LU).
pub const LOUDNESS_RANGE: f64 = 11.0;

/// Burned-in subtitle font size.
pub const SUBTITLE_FONT_SIZE: u32 = 36;
/// Burned-in subtitle colour, ASS `&HBBGGRR&` notation.
pub const SUBTITLE_PRIMARY_COLOUR: &str = "&HFFFFFF&";

/// Output frame geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGeometry {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for TargetGeometry {
    fn default() -> Self {
        Self {
            width: TARGET_WIDTH,
            height: TARGET_HEIGHT,
            fps: TARGET_FPS,
        }
    }
}

/// Loudness normalization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoudnessTarget {
    pub integrated: f64,
    pub true_peak: f64,
    pub range: f64,
}

impl Default for LoudnessTarget {
    fn default() -> Self {
        Self {
            integrated: LOUDNESS_INTEGRATED,
            true_peak: LOUDNESS_TRUE_PEAK,
            range: LOUDNESS_RANGE,
        }
    }
}

/// Styling forced onto burned-in subtitles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleStyle {
    pub font_size: u32,
    pub primary_colour: String,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_size: SUBTITLE_FONT_SIZE,
            primary_colour: SUBTITLE_PRIMARY_COLOUR.to_string(),
        }
    }
}

/// A subtitle file to burn into the video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleOverlay {
    pub path: PathBuf,
    pub style: SubtitleStyle,
}

impl SubtitleOverlay {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            style: SubtitleStyle::default(),
        }
    }
}

/// Everything the encoder needs besides the time range and file paths.
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscodeSpec {
    pub geometry: TargetGeometry,
    pub encoding: EncodingConfig,
    pub loudness: LoudnessTarget,
    pub subtitles: Option<SubtitleOverlay>,
}

impl Default for TranscodeSpec {
    fn default() -> Self {
        Self {
            geometry: TargetGeometry::default(),
            encoding: EncodingConfig::default(),
            loudness: LoudnessTarget::default(),
            subtitles: None,
        }
    }
}

impl TranscodeSpec {
    pub fn new(encoding: EncodingConfig, subtitles: Option<SubtitleOverlay>) -> Self {
        Self {
            encoding,
            subtitles,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let spec = TranscodeSpec::default();
        assert_eq!(spec.geometry.width, 1080);
        assert_eq!(spec.geometry.height, 1920);
        assert_eq!(spec.geometry.fps, 30);
        assert_eq!(spec.loudness.integrated, -16.0);
        assert_eq!(spec.loudness.true_peak, -1.5);
        assert_eq!(spec.loudness.range, 11.0);
        assert!(spec.subtitles.is_none());
    }

    #[test]
    fn test_subtitle_overlay_style() {
        let overlay = SubtitleOverlay::new("captions.srt");
        assert_eq!(overlay.path, PathBuf::from("captions.srt"));
        assert_eq!(overlay.style.font_size, 36);
        assert_eq!(overlay.style.primary_colour, "&HFFFFFF&");
    }

    #[test]
    fn test_new_keeps_fixed_parameters() {
        let spec = TranscodeSpec::new(
            EncodingConfig::default().with_crf(20),
            Some(SubtitleOverlay::new("a.srt")),
        );
        assert_eq!(spec.encoding.crf, 20);
        assert_eq!(spec.geometry, TargetGeometry::default());
        assert!(spec.subtitles.is_some());
    }
}
