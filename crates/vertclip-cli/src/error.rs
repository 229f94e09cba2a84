//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

use vertclip_models::{RangeError, TimestampError};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("SRT file not found: {}", .0.display())]
    SubtitleNotFound(PathBuf),

    #[error("Invalid {field} time: {source}")]
    InvalidTime {
        field: &'static str,
        #[source]
        source: TimestampError,
    },

    #[error("Invalid range: {0}")]
    InvalidRange(#[from] RangeError),

    #[error("Media error: {0}")]
    Media(#[from] vertclip_media::MediaError),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// An encoder failure passes the encoder's own exit code through; all
    /// other failures exit with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Media(e) => e.encoder_exit_code().filter(|&c| c != 0).unwrap_or(1),
            _ => 1,
        }
    }

    /// Whether the error came from the encoder run itself.
    pub fn is_encode_failure(&self) -> bool {
        matches!(self, Self::Media(vertclip_media::MediaError::FfmpegFailed { .. }))
    }
}
