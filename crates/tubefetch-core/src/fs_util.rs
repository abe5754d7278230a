//! Filesystem helpers: filename sanitization and output directory resolution.

use std::path::{Path, PathBuf};

use crate::error::{Result, StreamError};

/// Longest filename most filesystems accept, in bytes.
const NAME_MAX: usize = 255;

/// Characters removed from filenames (unsafe on NTFS or in shells), besides
/// control characters.
const UNSAFE_CHARS: &[char] = &[
    '"', '#', '$', '%', '\'', '*', ',', '.', '/', ':', ';', '<', '>', '?', '\\', '^', '|', '~',
];

/// Sanitizes a title or user-supplied stem for use as a filename.
///
/// - Removes control characters and `"#$%'*,./:;<>?\^|~`
/// - Trims surrounding whitespace
/// - Limits length to 255 bytes on a char boundary
///
/// Dots are removed too, so the result never carries its own extension.
pub fn safe_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !UNSAFE_CHARS.contains(c))
        .collect();
    truncate(cleaned.trim(), NAME_MAX).trim_end().to_string()
}

/// Builds `{prefix}{stem}.{extension}` from sanitized parts, shortening the
/// stem so the whole name stays within 255 bytes.
pub fn compose_filename(prefix: &str, stem: &str, extension: &str) -> String {
    let prefix = safe_filename(prefix);
    let stem = safe_filename(stem);
    let fixed = prefix.len() + 1 + extension.len();
    let stem = truncate(&stem, NAME_MAX.saturating_sub(fixed)).trim_end();
    format!("{prefix}{stem}.{extension}")
}

/// Longest prefix of `s` that fits in `max` bytes on a char boundary.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}

/// Resolves the directory downloads are written to, creating it if needed.
///
/// `None` means the current working directory; relative paths are resolved
/// against it.
pub fn target_directory(output_path: Option<&Path>) -> Result<PathBuf> {
    let cwd = || std::env::current_dir().map_err(|e| StreamError::io(Path::new("."), e));
    let dir = match output_path {
        None => return cwd(),
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => cwd()?.join(p),
    };
    std::fs::create_dir_all(&dir).map_err(|e| StreamError::io(&dir, e))?;
    Ok(dir)
}
