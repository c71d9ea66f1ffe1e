//! File name validation and content type detection for served files.
//!
//! Target ids and asset names arrive from request paths and are joined onto
//! the data root, so every name must be a single plain path segment.

use crate::error::{Error, Result};

/// Maximum byte length of a target id or asset file name.
pub const MAX_NAME_LEN: usize = 255;

/// Content type used when neither the extension nor the magic bytes match.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Validate that `name` is a single, plain path segment.
///
/// Rules:
/// - Length between 1 and [`MAX_NAME_LEN`] bytes
/// - No path separators (`/`, `\`), NUL or other control characters
/// - Not `.` or `..`
///
/// `what` names the value in the error message ("target id", "asset name").
pub fn validate_path_segment(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInput(format!("{} cannot be empty", what)));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::InvalidInput(format!(
            "{} must be {} bytes or less",
            what, MAX_NAME_LEN
        )));
    }
    if name == "." || name == ".." {
        return Err(Error::InvalidInput(format!("{} is not a file name", what)));
    }
    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control())
    {
        return Err(Error::InvalidInput(format!(
            "{} contains a path separator or control character",
            what
        )));
    }
    Ok(())
}

/// Resolve the content type of an asset.
///
/// 1. Known media extension (case-insensitive)
/// 2. Magic bytes via `infer`
/// 3. [`DEFAULT_CONTENT_TYPE`]
pub fn content_type_for(filename: &str, data: &[u8]) -> String {
    if let Some(mime) = extension_of(filename).and_then(|ext| mime_from_extension(&ext)) {
        return mime.to_string();
    }

    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    DEFAULT_CONTENT_TYPE.to_string()
}

fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext {
        // Images
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        // Audio
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "ogg" => Some("audio/ogg"),
        "m4a" => Some("audio/mp4"),
        // Text
        "md" | "markdown" => Some("text/markdown; charset=utf-8"),
        "txt" => Some("text/plain; charset=utf-8"),
        _ => None,
    }
}
