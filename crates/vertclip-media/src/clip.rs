//! Vertical clip pipeline.
//!
//! Two steps, run strictly in sequence:
//!
//! 1. [`align_request`] probes the input for keyframes and snaps the requested
//!    range onto them.
//! 2. [`create_vertical_clip`] builds the FFmpeg command for the aligned range
//!    (scale/pad to the portrait frame, optional subtitle burn-in, loudness
//!    normalization) and runs it.
//!
//! A failed encode leaves whatever FFmpeg wrote at the output path in place.

use std::path::Path;
use tracing::{info, warn};

use vertclip_models::{AlignedRange, RequestedRange, TranscodeSpec};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::filters::{build_audio_filter, build_video_filter};
use crate::fs_utils::normalize_path;
use crate::keyframe::locate;
use crate::probe::KeyframeProbe;

/// Probe `input` and align `requested` to its keyframes.
pub async fn align_request<P>(
    probe: &P,
    input: &Path,
    requested: &RequestedRange,
) -> MediaResult<AlignedRange>
where
    P: KeyframeProbe + ?Sized,
{
    let keyframes = probe.probe_keyframes(input).await?;

    if keyframes.is_empty() {
        warn!(
            input = %input.display(),
            "No keyframes found, using exact times"
        );
    }
    if requested.is_degenerate() {
        warn!(
            start = requested.start,
            end = requested.end,
            "Requested end is not after start, clip will be padded to the minimum length"
        );
    }

    let aligned = locate(&keyframes, requested);
    let (before, after) = aligned.widened_by(requested);
    info!(
        keyframes = keyframes.len(),
        start = aligned.start,
        end = aligned.end,
        duration = aligned.duration,
        "Aligned range (+{:.3}s before, +{:.3}s after)",
        before,
        after
    );

    Ok(aligned)
}

/// Build the FFmpeg command for a vertical clip without running it.
pub fn plan_clip(
    input: &Path,
    spec: &TranscodeSpec,
    aligned: &AlignedRange,
    output: &Path,
) -> FfmpegCommand {
    let encoding = &spec.encoding;

    FfmpegCommand::new(normalize_path(input), normalize_path(output))
        .seek(aligned.start)
        .duration(aligned.duration)
        .video_filter(build_video_filter(spec).to_string())
        .audio_filter(build_audio_filter(spec).to_string())
        .video_codec(&encoding.codec)
        .crf(encoding.crf)
        .preset(&encoding.preset)
        .frame_rate(spec.geometry.fps)
        .audio_codec(&encoding.audio_codec)
        .audio_bitrate(&encoding.audio_bitrate)
}

/// Encode the aligned range of `input` into a vertical clip at `output`.
///
/// Every line FFmpeg prints is handed to `sink` as it arrives.
pub async fn create_vertical_clip<F>(
    runner: &FfmpegRunner,
    input: &Path,
    spec: &TranscodeSpec,
    aligned: &AlignedRange,
    output: &Path,
    sink: F,
) -> MediaResult<()>
where
    F: FnMut(&str),
{
    info!(
        "Creating vertical clip: {} -> {} ({}x{}, subtitles: {})",
        input.display(),
        output.display(),
        spec.geometry.width,
        spec.geometry.height,
        spec.subtitles.is_some()
    );

    let cmd = plan_clip(input, spec, aligned, output);
    runner.run_with_output(&cmd, sink).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use vertclip_models::{EncodingConfig, KeyframeSet, SubtitleOverlay};

    use crate::error::MediaError;

    struct FixedProbe(Vec<f64>);

    #[async_trait]
    impl KeyframeProbe for FixedProbe {
        async fn probe_keyframes(&self, _input: &Path) -> MediaResult<KeyframeSet> {
            Ok(KeyframeSet::from_unsorted(self.0.clone()))
        }
    }

    struct FailingProbe;

    #[async_trait]
    impl KeyframeProbe for FailingProbe {
        async fn probe_keyframes(&self, _input: &Path) -> MediaResult<KeyframeSet> {
            Err(MediaError::ffprobe_failed("boom", None))
        }
    }

    #[tokio::test]
    async fn test_align_request_uses_probe() {
        let probe = FixedProbe(vec![6.0, 0.0, 4.0, 2.0]);
        let requested = RequestedRange::new(2.5, 5.0).unwrap();
        let aligned = align_request(&probe, Path::new("in.mp4"), &requested)
            .await
            .unwrap();
        assert_eq!((aligned.start, aligned.end, aligned.duration), (2.0, 6.0, 4.0));
    }

    #[tokio::test]
    async fn test_align_request_without_keyframes() {
        let probe = FixedProbe(Vec::new());
        let requested = RequestedRange::new(3.0, 7.2).unwrap();
        let aligned = align_request(&probe, Path::new("in.mp4"), &requested)
            .await
            .unwrap();
        assert_eq!((aligned.start, aligned.end), (3.0, 7.2));
    }

    #[tokio::test]
    async fn test_align_request_propagates_probe_failure() {
        let requested = RequestedRange::new(0.0, 1.0).unwrap();
        let result = align_request(&FailingProbe, Path::new("in.mp4"), &requested).await;
        assert!(matches!(result, Err(MediaError::FfprobeFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_plan_clip_argument_order() {
        let aligned = AlignedRange {
            start: 2.0,
            end: 6.0,
            duration: 4.0,
        };
        let cmd = plan_clip(
            Path::new("/videos/in.mp4"),
            &TranscodeSpec::default(),
            &aligned,
            Path::new("/videos/out.mp4"),
        );

        assert_eq!(
            cmd.build_args(),
            vec![
                "-y",
                "-ss",
                "2.000",
                "-i",
                "/videos/in.mp4",
                "-t",
                "4.000",
                "-vf",
                "scale=1080:1920:force_original_aspect_ratio=decrease,pad=1080:1920:(ow-iw)/2:(oh-ih)/2,setsar=1",
                "-af",
                "loudnorm=I=-16:TP=-1.5:LRA=11",
                "-c:v",
                "libx264",
                "-crf",
                "18",
                "-preset",
                "veryfast",
                "-r",
                "30",
                "-c:a",
                "aac",
                "-b:a",
                "192k",
                "/videos/out.mp4",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_plan_clip_with_subtitles_and_overrides() {
        let aligned = AlignedRange {
            start: 0.0,
            end: 10.0,
            duration: 10.0,
        };
        let spec = TranscodeSpec::new(
            EncodingConfig::default().with_crf(23).with_preset("slow"),
            Some(SubtitleOverlay::new("/subs/a.srt")),
        );
        let args = plan_clip(Path::new("/in.mp4"), &spec, &aligned, Path::new("/out.mp4")).build_args();

        let vf = &args[args.iter().position(|a| a == "-vf").unwrap() + 1];
        assert!(vf.ends_with(
            ",subtitles='/subs/a.srt':force_style='Fontsize=36,PrimaryColour=&HFFFFFF&'"
        ));
        let crf = &args[args.iter().position(|a| a == "-crf").unwrap() + 1];
        assert_eq!(crf, "23");
        let preset = &args[args.iter().position(|a| a == "-preset").unwrap() + 1];
        assert_eq!(preset, "slow");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_create_vertical_clip_reports_encoder_status() {
        let aligned = AlignedRange {
            start: 0.0,
            end: 1.0,
            duration: 1.0,
        };
        let spec = TranscodeSpec::default();
        let (input, output) = (Path::new("/in.mp4"), Path::new("/out.mp4"));

        let ok = FfmpegRunner::new("true");
        create_vertical_clip(&ok, input, &spec, &aligned, output, |_| {})
            .await
            .unwrap();

        let failing = FfmpegRunner::new("false").with_command_echo();
        let mut lines = Vec::new();
        let err = create_vertical_clip(&failing, input, &spec, &aligned, output, |l| {
            lines.push(l.to_string())
        })
        .await
        .unwrap_err();
        assert_eq!(err.encoder_exit_code(), Some(1));
        assert!(lines[0].starts_with("[CMD] false -y -ss 0.000 -i /in.mp4"));
    }

    #[test]
    fn test_plan_clip_relative_paths_become_absolute() {
        let aligned = AlignedRange {
            start: 1.0,
            end: 2.0,
            duration: 1.0,
        };
        let cmd = plan_clip(
            Path::new("in.mp4"),
            &TranscodeSpec::default(),
            &aligned,
            Path::new("output_demo.mp4"),
        );
        assert!(Path::new(cmd.input()).is_absolute());
        assert!(cmd.output().ends_with("/output_demo.mp4"));
    }
}
