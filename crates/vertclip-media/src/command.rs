//! FFmpeg command builder and runner.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file, already normalized for FFmpeg
    input: String,
    /// Output file, already normalized for FFmpeg
    output: String,
    /// Input arguments (before -i)
    input_args: Vec<String>,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level, FFmpeg's default when unset
    log_level: Option<String>,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: None,
        }
    }

    /// Add input arguments (before -i).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Set seek position (before input, so FFmpeg seeks the demuxer).
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    /// Limit output duration.
    pub fn duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{:.3}", seconds))
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set audio filter.
    pub fn audio_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-af").output_arg(filter)
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set CRF (quality).
    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// Set preset.
    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    /// Set output frame rate.
    pub fn frame_rate(self, fps: u32) -> Self {
        self.output_arg("-r").output_arg(fps.to_string())
    }

    /// Set audio bitrate.
    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        if let Some(level) = &self.log_level {
            args.push("-v".to_string());
            args.push(level.clone());
        }

        args.extend(self.input_args.iter().cloned());

        args.push("-i".to_string());
        args.push(self.input.clone());

        args.extend(self.output_args.iter().cloned());

        args.push(self.output.clone());

        args
    }
}

/// Runs FFmpeg, streaming its console output as it is produced.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    program: PathBuf,
    /// Pass the command line to the sink before spawning
    echo_command: bool,
}

impl FfmpegRunner {
    /// Create a runner for a specific FFmpeg executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            echo_command: false,
        }
    }

    /// Emit `[CMD] <command line>` to the output sink before each run.
    pub fn with_command_echo(mut self) -> Self {
        self.echo_command = true;
        self
    }

    /// Create a runner for the FFmpeg found in PATH.
    pub fn from_path() -> MediaResult<Self> {
        check_ffmpeg(None).map(Self::new)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Render the full command line, as echoed to the operator.
    pub fn display_command(&self, cmd: &FfmpegCommand) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(cmd.build_args());
        parts.join(" ")
    }

    /// Run an FFmpeg command, discarding its output.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        self.run_with_output(cmd, |_| {}).await
    }

    /// Run an FFmpeg command, passing each line of stdout/stderr to `sink`.
    ///
    /// Both pipes are drained in the calling task; carriage returns count as
    /// line breaks so FFmpeg's in-place progress line is forwarded on every
    /// update. Blocks until the process exits.
    pub async fn run_with_output<F>(&self, cmd: &FfmpegCommand, mut sink: F) -> MediaResult<()>
    where
        F: FnMut(&str),
    {
        let args = cmd.build_args();
        let command_line = self.display_command(cmd);
        debug!("Running FFmpeg: {}", command_line);
        if self.echo_command {
            sink(&format!("[CMD] {}", command_line));
        }

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stdout not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stderr not captured"))?;

        let mut out = LineReader::new(stdout);
        let mut err = LineReader::new(stderr);
        let (mut out_done, mut err_done) = (false, false);

        while !(out_done && err_done) {
            tokio::select! {
                line = out.next_line(), if !out_done => match line? {
                    Some(line) => sink(&line),
                    None => out_done = true,
                },
                line = err.next_line(), if !err_done => match line? {
                    Some(line) => sink(&line),
                    None => err_done = true,
                },
            }
        }

        let status = child.wait().await?;

        if status.success() {
            info!("FFmpeg finished: {}", cmd.output());
            Ok(())
        } else {
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                command_line,
                status.code(),
            ))
        }
    }
}

/// Splits a byte stream on `\n` and `\r`, skipping empty lines.
struct LineReader<R> {
    reader: BufReader<R>,
    pending: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            pending: Vec::new(),
        }
    }

    /// Next non-empty line, or `None` at end of stream.
    ///
    /// Cancel safe: partial data is kept in `pending` between calls.
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            let buf = self.reader.fill_buf().await?;

            if buf.is_empty() {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(self.take_pending()));
            }

            match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    self.pending.extend_from_slice(&buf[..pos]);
                    self.reader.consume(pos + 1);
                    if !self.pending.is_empty() {
                        return Ok(Some(self.take_pending()));
                    }
                }
                None => {
                    let len = buf.len();
                    self.pending.extend_from_slice(buf);
                    self.reader.consume(len);
                }
            }
        }
    }

    fn take_pending(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        line
    }
}

fn locate_binary(override_path: Option<&Path>, name: &str) -> Option<PathBuf> {
    let candidate = override_path.map(Path::as_os_str).unwrap_or(OsStr::new(name));
    which::which(candidate).ok()
}

/// Check if FFmpeg is available, preferring an explicit path when given.
pub fn check_ffmpeg(override_path: Option<&Path>) -> MediaResult<PathBuf> {
    locate_binary(override_path, "ffmpeg").ok_or(MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available, preferring an explicit path when given.
pub fn check_ffprobe(override_path: Option<&Path>) -> MediaResult<PathBuf> {
    locate_binary(override_path, "ffprobe").ok_or(MediaError::FfprobeNotFound)
}
