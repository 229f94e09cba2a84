//! FFprobe keyframe extraction.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use vertclip_models::KeyframeSet;

use crate::command::check_ffprobe;
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::normalize_path;

/// Source of keyframe timestamps for a video file.
#[async_trait]
pub trait KeyframeProbe: Send + Sync {
    /// Keyframe timestamps of the first video stream, sorted ascending.
    async fn probe_keyframes(&self, input: &Path) -> MediaResult<KeyframeSet>;
}

/// FFprobe JSON output format for `-show_entries frame=...`.
#[derive(Debug, Deserialize)]
struct FfprobeFrames {
    #[serde(default)]
    frames: Vec<FfprobeFrame>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFrame {
    #[serde(default)]
    key_frame: Option<i64>,
    #[serde(default)]
    pts_time: Option<String>,
    /// Removed in FFmpeg 5; still emitted by older builds.
    #[serde(default)]
    pkt_pts_time: Option<String>,
}

impl FfprobeFrame {
    fn timestamp(&self) -> Option<&str> {
        self.pts_time.as_deref().or(self.pkt_pts_time.as_deref())
    }
}

/// Parse FFprobe frame JSON into a keyframe set.
///
/// Frames that are not keyframes or carry no timestamp are skipped. A
/// timestamp that is present but not a finite, non-negative number makes the
/// whole probe fail.
pub fn parse_keyframes(json: &[u8]) -> MediaResult<KeyframeSet> {
    let probe: FfprobeFrames = serde_json::from_slice(json)?;

    let mut times = Vec::new();
    for frame in probe.frames.iter().filter(|f| f.key_frame == Some(1)) {
        let Some(raw) = frame.timestamp() else {
            continue;
        };
        let time: f64 = raw
            .trim()
            .parse()
            .map_err(|_| MediaError::ffprobe_failed(format!("invalid frame timestamp {:?}", raw), None))?;
        if !time.is_finite() || time < 0.0 {
            return Err(MediaError::ffprobe_failed(
                format!("invalid frame timestamp {:?}", raw),
                None,
            ));
        }
        times.push(time);
    }

    Ok(KeyframeSet::from_unsorted(times))
}

/// Keyframe probe backed by the `ffprobe` executable.
#[derive(Debug, Clone)]
pub struct FfprobeKeyframeProbe {
    program: PathBuf,
}

impl FfprobeKeyframeProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use the `ffprobe` found in PATH.
    pub fn from_path() -> MediaResult<Self> {
        check_ffprobe(None).map(Self::new)
    }

    fn args(input: &Path) -> Vec<String> {
        vec![
            "-v".to_string(),
            "quiet".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            "-show_entries".to_string(),
            "frame=pts_time,pkt_pts_time,key_frame".to_string(),
            "-of".to_string(),
            "json".to_string(),
            normalize_path(input),
        ]
    }
}

#[async_trait]
impl KeyframeProbe for FfprobeKeyframeProbe {
    async fn probe_keyframes(&self, input: &Path) -> MediaResult<KeyframeSet> {
        if !input.exists() {
            return Err(MediaError::FileNotFound(input.to_path_buf()));
        }

        let args = Self::args(input);
        debug!("Running FFprobe: {} {}", self.program.display(), args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(MediaError::ffprobe_failed(
                format!("FFprobe exited with status {:?}", output.status.code()),
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        let keyframes = parse_keyframes(&output.stdout)?;
        debug!("FFprobe reported {} keyframes", keyframes.len());
        Ok(keyframes)
    }
}
