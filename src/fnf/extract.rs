//! Recovery of the JSON object embedded in a chart file.
//!
//! Chart editors and hand edits regularly leave junk around the actual object, such as
//! a trailing line of garbage after the closing brace or a stray header before it. The
//! scanner here balances braces outside string literals and returns only the first
//! top-level object, so that the rest of the text never reaches the JSON parser.

use thiserror::Error;

/// Failure to locate a complete JSON object.
///
/// Byte offsets refer to the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The text contains no `{`.
    #[error("no opening brace found")]
    NoObject,
    /// The text ends before the object opened at `start` is closed.
    #[error("object opened at byte {start} is never closed (missing `}}`)")]
    Unterminated {
        /// Offset of the opening brace.
        start: usize,
        /// Length of the scanned text.
        end: usize,
    },
}

/// Returns the first top-level `{...}` object of `source`, braces included.
///
/// Braces inside string literals are ignored. A backslash inside a string escapes the
/// following character, so `"\""` does not end the string.
///
/// # Errors
///
/// Returns [`ExtractError::NoObject`] if there is no `{` at all, and
/// [`ExtractError::Unterminated`] if the text ends before the object is balanced.
///
/// # Examples
///
/// ```
/// use fnf2osu::fnf::extract::extract_root_object;
///
/// let text = "garbage\n{\"song\": {\"a\": \"}\"}}\ntrailing }";
/// assert_eq!(extract_root_object(text), Ok("{\"song\": {\"a\": \"}\"}}"));
/// ```
pub fn extract_root_object(source: &str) -> Result<&str, ExtractError> {
    let start = source.find('{').ok_or(ExtractError::NoObject)?;

    let mut level = 1usize;
    let mut in_string = false;
    let mut escaped = false;
    // `{` is one byte, so the scan resumes right after it.
    for (index, byte) in source.bytes().enumerate().skip(start + 1) {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => level += 1,
            b'}' => {
                level -= 1;
                if level == 0 {
                    return source
                        .get(start..=index)
                        .ok_or(ExtractError::Unterminated {
                            start,
                            end: source.len(),
                        });
                }
            }
            _ => {}
        }
    }

    Err(ExtractError::Unterminated {
        start,
        end: source.len(),
    })
}
