//! One invocation: validate, align, encode.

use std::path::{Path, PathBuf};
use tracing::info;

use vertclip_media::fs_utils::require_file;
use vertclip_media::{
    align_request, check_ffmpeg, check_ffprobe, create_vertical_clip, FfmpegRunner,
    FfprobeKeyframeProbe, KeyframeProbe, MediaError,
};
use vertclip_models::{
    parse_timestamp, AlignedRange, EncodingConfig, RequestedRange, SubtitleOverlay, TranscodeSpec,
};

use crate::args::Args;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Validated inputs of a single clip job.
#[derive(Debug, Clone)]
pub struct ClipRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub requested: RequestedRange,
    pub spec: TranscodeSpec,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct ClipOutcome {
    pub output: PathBuf,
    pub requested: RequestedRange,
    pub aligned: AlignedRange,
}

/// Parse times and check that the input (and subtitle) files exist.
///
/// Runs before any child process is spawned.
pub async fn prepare(args: &Args) -> CliResult<ClipRequest> {
    let start = parse_timestamp(&args.start)
        .map_err(|source| CliError::InvalidTime { field: "start", source })?;
    let end = parse_timestamp(&args.end)
        .map_err(|source| CliError::InvalidTime { field: "end", source })?;
    let requested = RequestedRange::new(start, end)?;

    let input = existing(&args.input, CliError::InputNotFound).await?;
    let subtitles = match &args.srt {
        Some(srt) => Some(SubtitleOverlay::new(
            existing(srt, CliError::SubtitleNotFound).await?,
        )),
        None => None,
    };

    let encoding = EncodingConfig::default()
        .with_crf(args.crf)
        .with_preset(args.preset.clone());

    Ok(ClipRequest {
        input,
        output: args.output.clone(),
        requested,
        spec: TranscodeSpec::new(encoding, subtitles),
    })
}

async fn existing(path: &Path, not_found: fn(PathBuf) -> CliError) -> CliResult<PathBuf> {
    match require_file(path).await {
        Err(MediaError::FileNotFound(p)) => Err(not_found(p)),
        other => other.map_err(CliError::from),
    }
}

/// Align the request to keyframes and encode it.
///
/// Operator-facing messages and every line of encoder output go to `console`.
pub async fn execute<P, F>(
    request: &ClipRequest,
    probe: &P,
    runner: &FfmpegRunner,
    mut console: F,
) -> CliResult<ClipOutcome>
where
    P: KeyframeProbe + ?Sized,
    F: FnMut(&str),
{
    console("Scanning keyframes...");
    let aligned = align_request(probe, &request.input, &request.requested).await?;

    console(&format!(
        "Requested: {:.3}s -> {:.3}s",
        request.requested.start, request.requested.end
    ));
    console(&format!(
        "Keyframe-aligned: {:.3}s -> {:.3}s (Duration: {:.3}s)",
        aligned.start, aligned.end, aligned.duration
    ));

    create_vertical_clip(
        runner,
        &request.input,
        &request.spec,
        &aligned,
        &request.output,
        &mut console,
    )
    .await?;

    Ok(ClipOutcome {
        output: request.output.clone(),
        requested: request.requested,
        aligned,
    })
}

/// Full invocation against the real `ffprobe`/`ffmpeg` binaries.
pub async fn run<F>(args: &Args, config: &CliConfig, console: F) -> CliResult<ClipOutcome>
where
    F: FnMut(&str),
{
    let request = prepare(args).await?;

    let probe = FfprobeKeyframeProbe::new(check_ffprobe(config.ffprobe_path.as_deref())?);
    let runner = FfmpegRunner::new(check_ffmpeg(config.ffmpeg_path.as_deref())?).with_command_echo();
    info!(
        ffprobe = ?config.ffprobe_path,
        ffmpeg = %runner.program().display(),
        "Using FFmpeg binaries"
    );

    execute(&request, &probe, &runner, console).await
}
