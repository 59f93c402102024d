//! Raw datagram bytes to text.

use std::borrow::Cow;

/// Maximum characters shown in a log preview before it is cut.
pub const PREVIEW_CHARS: usize = 300;

/// Marker appended to a cut preview.
const PREVIEW_ELLIPSIS: &str = "...";

/// Decode a datagram payload into text.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD and trailing NUL padding
/// is removed. Never fails; an empty or all-NUL payload yields an empty string.
pub fn decode_payload(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim_end_matches('\0');
    if trimmed.len() == text.len() {
        text.into_owned()
    } else {
        trimmed.to_string()
    }
}

/// Shorten decoded text for display in the log.
///
/// Text of [`PREVIEW_CHARS`] characters or more keeps its first
/// [`PREVIEW_CHARS`] characters and gets `...` appended. Only used for
/// logging; relayed payloads are never shortened.
pub fn preview(text: &str) -> Cow<'_, str> {
    let mut chars = text.char_indices();
    if chars.nth(PREVIEW_CHARS - 1).is_none() {
        return Cow::Borrowed(text);
    }
    let cut = chars.next().map_or(text.len(), |(i, _)| i);
    Cow::Owned(format!("{}{}", &text[..cut], PREVIEW_ELLIPSIS))
}
