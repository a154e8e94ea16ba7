//! Metadata-value sanitization.
//!
//! Object-store user metadata travels as HTTP headers, which constrains the
//! value space: printable ASCII only, no control characters, bounded length.

/// Maximum length in bytes of a sanitized metadata value.
pub const MAX_METADATA_VALUE_LEN: usize = 255;

/// Sanitize a metadata value for transport as an object-store header.
///
/// Strips non-ASCII and control characters, collapses runs of whitespace to a
/// single space, trims the ends, and truncates to
/// [`MAX_METADATA_VALUE_LEN`] bytes. The result is always ASCII, so bytes and
/// characters coincide.
pub fn sanitize_metadata_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len().min(MAX_METADATA_VALUE_LEN));
    let mut pending_space = false;

    for ch in value.chars() {
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if !ch.is_ascii() || ch.is_ascii_control() {
            continue;
        }
        if pending_space {
            if out.len() + 2 > MAX_METADATA_VALUE_LEN {
                break;
            }
            out.push(' ');
            pending_space = false;
        }
        if out.len() >= MAX_METADATA_VALUE_LEN {
            break;
        }
        out.push(ch);
    }

    out
}
