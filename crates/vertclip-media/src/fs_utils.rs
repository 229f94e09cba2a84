//! Filesystem helpers for paths handed to FFmpeg.
//!
//! FFmpeg accepts forward slashes on every platform, so all paths are made
//! absolute and rewritten with `/` separators. Paths embedded inside a filter
//! expression additionally need the drive-letter colon escaped, otherwise the
//! filter parser reads `D:` as an option separator.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{MediaError, MediaResult};

/// Make `path` absolute and use forward slashes.
///
/// Relative paths are resolved against the current directory. Falls back to
/// the path as given if the current directory cannot be determined.
pub fn normalize_path(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    absolute.to_string_lossy().replace('\\', "/")
}

/// Escape the colon of a leading drive letter (`D:/x` -> `D\:/x`).
///
/// Anything that does not start with a single ASCII letter followed by a
/// colon is returned unchanged.
pub fn escape_drive_colon(path: &str) -> String {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        format!("{}\\:{}", &path[..1], &path[2..])
    } else {
        path.to_string()
    }
}

/// Normalize a path for use inside a filter expression.
pub fn filter_path(path: impl AsRef<Path>) -> String {
    escape_drive_colon(&normalize_path(path))
}

/// Ensure `path` names an existing regular file.
pub async fn require_file(path: impl AsRef<Path>) -> MediaResult<PathBuf> {
    let path = path.as_ref();
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(path.to_path_buf()),
        Ok(_) => Err(MediaError::FileNotFound(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(MediaError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(MediaError::from(e)),
    }
}
