//! Suffix-tag scanning.
//!
//! Telecommands may carry `@name=value` metadata after the closing paren:
//!
//! ```text
//! CTS1+reboot()@tssent=1700000000000@tsexec=1700000060000!
//! ```
//!
//! All extractors share one rule set: the value is the maximal run of the
//! tag's allowed charset, it must be non-empty, and the character after the
//! run must be one of `{'#', '@', '!', end-of-string}` — anything else means
//! the value bled into something it shouldn't have.

use crate::error::TagError;
use crate::integrity::DIGEST_LEN;

/// Sent-timestamp tag (ms since epoch at ground transmission time).
pub const TAG_TSSENT: &str = "@tssent=";

/// Execute-timestamp tag (ms since epoch; 0 or absent means "now").
pub const TAG_TSEXEC: &str = "@tsexec=";

/// Command digest tag (64 hex chars of SHA-256).
pub const TAG_SHA256: &str = "@sha256=";

/// Response filename tag (path-like string).
pub const TAG_RESP_FNAME: &str = "@resp_fname=";

/// Characters that may legally follow a tag value.
const VALUE_TERMINATORS: [u8; 3] = [b'#', b'@', b'!'];

/// Byte offset of `tag` within `region`, if present.
pub fn find_tag(region: &str, tag: &str) -> Option<usize> {
    region.find(tag)
}

/// Extract the maximal run of `is_value_byte` characters after `tag`,
/// enforcing the shared non-empty and terminator rules.
fn tag_value<'a>(
    region: &'a str,
    tag: &str,
    is_value_byte: fn(u8) -> bool,
) -> Result<&'a str, TagError> {
    let start = find_tag(region, tag).ok_or(TagError::NotFound)? + tag.len();
    let bytes = region.as_bytes();

    let mut end = start;
    while end < bytes.len() && is_value_byte(bytes[end]) {
        end += 1;
    }
    if end == start {
        return Err(TagError::EmptyValue);
    }
    if end < bytes.len() && !VALUE_TERMINATORS.contains(&bytes[end]) {
        return Err(TagError::BadTerminator { offset: end });
    }

    // The run is pure ASCII, so the slice lands on char boundaries.
    Ok(&region[start..end])
}

/// Extract a decimal `u64` tag value.
pub fn uint64_tag(region: &str, tag: &str) -> Result<u64, TagError> {
    let value = tag_value(region, tag, |b| b.is_ascii_digit())?;

    let mut acc: u64 = 0;
    for b in value.bytes() {
        acc = acc
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .ok_or(TagError::Overflow)?;
    }
    Ok(acc)
}

/// Extract a 32-byte digest tag value from 64 hex characters.
pub fn hex32_tag(region: &str, tag: &str) -> Result<[u8; DIGEST_LEN], TagError> {
    // The run uses the name charset, so stray non-hex characters surface as
    // a decode failure rather than a terminator failure.
    let value = tag_value(region, tag, |b| b.is_ascii_alphanumeric() || b == b'_')?;

    if value.len() != DIGEST_LEN * 2 {
        return Err(TagError::WrongDigestLength { len: value.len() });
    }

    let mut digest = [0u8; DIGEST_LEN];
    hex::decode_to_slice(value, &mut digest).map_err(|_| TagError::InvalidHex)?;
    Ok(digest)
}

/// Extract a path-like string tag value of length in `[1, max_len)`.
///
/// Allowed charset: alphanumerics, `_`, `.`, `-`, `/`.
pub fn string_tag<'a>(region: &'a str, tag: &str, max_len: usize) -> Result<&'a str, TagError> {
    let value = tag_value(region, tag, is_path_byte)?;

    if value.len() >= max_len {
        return Err(TagError::TooLong {
            len: value.len(),
            max: max_len,
        });
    }
    Ok(value)
}

fn is_path_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-' | b'/')
}
