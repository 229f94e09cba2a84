//! Environment configuration.

use std::path::PathBuf;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Explicit FFmpeg executable, otherwise looked up in PATH
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicit FFprobe executable, otherwise looked up in PATH
    pub ffprobe_path: Option<PathBuf>,
    /// Log output format
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str| {
            lookup(key)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
        };

        Self {
            ffmpeg_path: path("VERTCLIP_FFMPEG"),
            ffprobe_path: path("VERTCLIP_FFPROBE"),
            log_format: match lookup("LOG_FORMAT").map(|v| v.to_lowercase()) {
                Some(v) if v == "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }
}
