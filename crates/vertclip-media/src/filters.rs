//! FFmpeg filter expressions.
//!
//! Filters are described as typed stages and rendered to FFmpeg's filter
//! syntax on demand, so the produced strings stay byte-stable.

use std::fmt;
use std::path::Path;

use vertclip_models::{LoudnessTarget, SubtitleStyle, TargetGeometry, TranscodeSpec};

use crate::fs_utils::filter_path;

/// One stage of a linear filter chain.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterStage {
    /// Scale down to fit inside `width`x`height`, keeping aspect ratio.
    ScaleToFit { width: u32, height: u32 },
    /// Pad to exactly `width`x`height`, content centered.
    PadCentered { width: u32, height: u32 },
    /// Force the sample aspect ratio.
    SetSar(u32),
    /// Burn in a subtitle file. `path` must already be filter-escaped.
    Subtitles { path: String, style: SubtitleStyle },
    /// EBU R128 loudness normalization.
    Loudnorm(LoudnessTarget),
}

impl FilterStage {
    /// Subtitle stage for a file on disk.
    pub fn subtitles(path: impl AsRef<Path>, style: &SubtitleStyle) -> Self {
        Self::Subtitles {
            path: filter_path(path),
            style: style.clone(),
        }
    }
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScaleToFit { width, height } => write!(
                f,
                "scale={}:{}:force_original_aspect_ratio=decrease",
                width, height
            ),
            Self::PadCentered { width, height } => {
                write!(f, "pad={}:{}:(ow-iw)/2:(oh-ih)/2", width, height)
            }
            Self::SetSar(sar) => write!(f, "setsar={}", sar),
            Self::Subtitles { path, style } => write!(
                f,
                "subtitles='{}':force_style='Fontsize={},PrimaryColour={}'",
                path, style.font_size, style.primary_colour
            ),
            Self::Loudnorm(target) => write!(
                f,
                "loudnorm=I={}:TP={}:LRA={}",
                target.integrated, target.true_peak, target.range
            ),
        }
    }
}

/// Ordered list of filter stages, rendered comma-separated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain {
    stages: Vec<FilterStage>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn then(mut self, stage: FilterStage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", stage)?;
        }
        Ok(())
    }
}

/// Fit-and-pad to the target frame, with square pixels.
pub fn fit_to_frame(geometry: &TargetGeometry) -> FilterChain {
    FilterChain::new()
        .then(FilterStage::ScaleToFit {
            width: geometry.width,
            height: geometry.height,
        })
        .then(FilterStage::PadCentered {
            width: geometry.width,
            height: geometry.height,
        })
        .then(FilterStage::SetSar(1))
}

/// Build the video filter chain for a transcode.
pub fn build_video_filter(spec: &TranscodeSpec) -> FilterChain {
    let chain = fit_to_frame(&spec.geometry);
    match &spec.subtitles {
        Some(overlay) => chain.then(FilterStage::subtitles(&overlay.path, &overlay.style)),
        None => chain,
    }
}

/// Build the audio filter chain for a transcode.
pub fn build_audio_filter(spec: &TranscodeSpec) -> FilterChain {
    FilterChain::new().then(FilterStage::Loudnorm(spec.loudness))
}
