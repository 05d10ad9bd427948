//! File name helpers.

use std::path::{Path, PathBuf};

/// Characters that file systems or osu! refuse in a file name.
const ILLEGAL_CHARS: [char; 9] = ['"', '<', '>', '|', '?', ':', '*', '\\', '/'];

/// Makes `name` usable as a file name on every platform.
///
/// Reserved characters and control characters `U+0001..=U+001F` are removed, a trailing
/// `.` or space is replaced with `_`, and an empty result becomes `0`.
///
/// # Examples
///
/// ```
/// use fnf2osu::util::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("Who? - Me: <3."), "Who - Me 3_");
/// assert_eq!(sanitize_file_name("***"), "0");
/// ```
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !('\u{1}'..='\u{1f}').contains(c))
        .collect();
    if sanitized.ends_with(['.', ' ']) {
        sanitized.pop();
        sanitized.push('_');
    }
    if sanitized.is_empty() {
        sanitized.push('0');
    }
    sanitized
}

/// Finds a path in `dir` named after `stem` that does not exist yet.
///
/// The first candidate is `"{stem}.{extension}"`, then `"{stem} (1).{extension}"`,
/// `"{stem} (2).{extension}"` and so on. An empty `extension` gives directory-like
/// names without a dot.
#[must_use]
pub fn unused_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let candidate = |number: Option<u32>| {
        let mut name = match number {
            Some(number) => format!("{stem} ({number})"),
            None => stem.to_string(),
        };
        if !extension.is_empty() {
            name.push('.');
            name.push_str(extension);
        }
        dir.join(name)
    };
    std::iter::once(None)
        .chain((1_u32..).map(Some))
        .map(candidate)
        .find(|path| !path.exists())
        .unwrap_or_else(|| candidate(None))
}
