use clap::Parser;
use std::path::PathBuf;

use vertclip_models::encoding::{DEFAULT_CRF, DEFAULT_PRESET};

/// Output file used when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "output_demo.mp4";

#[derive(Debug, Clone, Parser)]
#[command(name = "vertclip")]
#[command(
    author,
    version,
    about = "Cut a keyframe-aligned vertical (1080x1920) clip with normalized audio and optional burned-in subtitles"
)]
pub struct Args {
    /// Input video file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Start time (seconds, MM:SS or HH:MM:SS)
    #[arg(long, allow_hyphen_values = true)]
    pub start: String,

    /// End time (seconds, MM:SS or HH:MM:SS)
    #[arg(long, allow_hyphen_values = true)]
    pub end: String,

    /// Optional subtitles SRT file to burn in
    #[arg(long)]
    pub srt: Option<PathBuf>,

    /// Output video filename
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// x264 constant rate factor (0-51, lower is better)
    #[arg(long, default_value_t = DEFAULT_CRF, value_parser = clap::value_parser!(u8).range(0..=51))]
    pub crf: u8,

    /// x264 speed preset
    #[arg(long, default_value = DEFAULT_PRESET)]
    pub preset: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
