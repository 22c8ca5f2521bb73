//! The telecommand parser: one pass from candidate line to structured
//! record, terminal on first failure.

use tcuplink_channel::TelecommandSource;
use tracing::debug;

use crate::error::{ParseError, TagError};
use crate::integrity::verify_digest;
use crate::table::{is_name_byte, CommandTable};
use crate::tags::{find_tag, hex32_tag, string_tag, uint64_tag, TAG_RESP_FNAME, TAG_SHA256, TAG_TSEXEC, TAG_TSSENT};
use crate::types::{ArgsString, ParsedTelecommand, ResponseFilename, MAX_ARGS_LEN, MAX_RESPONSE_FILENAME_LEN};
use crate::DEVICE_ID_PREFIX;

/// Parser behavior toggles, set once at startup from mission configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserConfig {
    /// When set, every command must carry a matching `@sha256=` digest.
    pub require_signed: bool,
}

/// Parse one candidate line into a [`ParsedTelecommand`].
///
/// `line` includes the `!` terminator (and possibly trailing whitespace).
/// On failure the line is dropped — the error's [`code`](ParseError::code)
/// is the only thing that survives into the log.
pub fn parse_telecommand(
    line: &str,
    source: TelecommandSource,
    table: &CommandTable,
    config: &ParserConfig,
) -> Result<ParsedTelecommand, ParseError> {
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    debug!(len = line.len(), %source, "parsing telecommand");

    let bytes = line.as_bytes();
    let prefix_len = DEVICE_ID_PREFIX.len();

    // Prefix must be present with at least one byte after it.
    if bytes.len() <= prefix_len || !line.starts_with(DEVICE_ID_PREFIX) {
        return Err(ParseError::MissingPrefix);
    }

    // Exactly one '!' may appear after the prefix. Two terminators means
    // two commands spliced into one line; none means a truncated line.
    let mut terminators = 0usize;
    for &b in &bytes[prefix_len..] {
        if b == b'!' {
            terminators += 1;
            if terminators > 1 {
                return Err(ParseError::DuplicateTerminator);
            }
        }
    }
    if terminators == 0 {
        return Err(ParseError::MissingTerminator);
    }

    // Command name: maximal name-charset run after the prefix.
    let name_start = prefix_len;
    let mut name_end = name_start;
    while name_end < bytes.len() && is_name_byte(bytes[name_end]) {
        name_end += 1;
    }
    let name = &line[name_start..name_end];
    let (command_index, definition) =
        table
            .lookup_entry(name)
            .ok_or(ParseError::UnknownCommand {
                offset: name_start,
                len: name_end - name_start,
            })?;

    // Args live strictly between '(' (immediately after the name) and the
    // first ')' in the line.
    if name_end >= bytes.len() {
        return Err(ParseError::MissingArgsRegion);
    }
    if bytes[name_end] != b'(' {
        return Err(ParseError::MissingOpenParen { offset: name_end });
    }
    let open_idx = name_end;
    let close_idx = line.find(')').ok_or(ParseError::MissingCloseParen)?;
    if close_idx <= open_idx {
        return Err(ParseError::MissingCloseParen);
    }

    let args_region = &line[open_idx + 1..close_idx];
    let args = ArgsString::from_str(args_region).map_err(|_| ParseError::ArgsTooLong {
        len: args_region.len(),
        max: MAX_ARGS_LEN,
    })?;

    // Suffix tags are searched in the region beginning at the ')'.
    let tag_region = &line[close_idx..];

    let timestamp_sent = match uint64_tag(tag_region, TAG_TSSENT) {
        Ok(value) => value,
        Err(TagError::NotFound) => 0,
        Err(source) => {
            return Err(ParseError::Tag {
                tag: TAG_TSSENT,
                source,
            })
        }
    };

    let timestamp_to_execute = match uint64_tag(tag_region, TAG_TSEXEC) {
        Ok(value) => value,
        Err(TagError::NotFound) => 0,
        Err(source) => {
            return Err(ParseError::Tag {
                tag: TAG_TSEXEC,
                source,
            })
        }
    };

    let response_filename = match string_tag(tag_region, TAG_RESP_FNAME, MAX_RESPONSE_FILENAME_LEN)
    {
        Ok(value) => ResponseFilename::from_str(value).map_err(|err| ParseError::Tag {
            tag: TAG_RESP_FNAME,
            source: TagError::TooLong {
                len: err.len,
                max: err.max,
            },
        })?,
        Err(TagError::NotFound) => ResponseFilename::new(),
        Err(source) => {
            return Err(ParseError::Tag {
                tag: TAG_RESP_FNAME,
                source,
            })
        }
    };

    // Digest covers the prefix through the closing ')', inclusive.
    let digest = match hex32_tag(tag_region, TAG_SHA256) {
        Ok(value) => Some(value),
        Err(TagError::NotFound) => None,
        Err(source) => {
            return Err(ParseError::Tag {
                tag: TAG_SHA256,
                source,
            })
        }
    };
    verify_digest(&bytes[..=close_idx], digest.as_ref(), config.require_signed)?;

    // Structural arity check only: the handler owns argument typing.
    let expected = definition.number_of_args;
    let commas = args.as_str().bytes().filter(|&b| b == b',').count();
    let arity_ok = (expected == 0 && args.is_empty())
        || (expected > 0 && !args.is_empty() && commas == usize::from(expected) - 1);
    if !arity_ok {
        let provided = if args.is_empty() { 0 } else { commas + 1 };
        return Err(ParseError::WrongArgCount {
            expected,
            provided: provided as u8,
        });
    }

    Ok(ParsedTelecommand {
        command_index,
        args,
        timestamp_sent,
        timestamp_to_execute,
        response_filename,
        source,
    })
}

/// Returns true when `line` starts with the device-id prefix and carries at
/// least one byte beyond it.
pub fn starts_with_device_id(line: &str) -> bool {
    line.len() > DEVICE_ID_PREFIX.len() && line.starts_with(DEVICE_ID_PREFIX)
}

/// Searches `region` for the digest tag without validating its value.
pub fn has_digest_tag(region: &str) -> bool {
    find_tag(region, TAG_SHA256).is_some()
}
