//! Telecommand parsing for the uplink pipeline.
//!
//! This is the core value-add layer of tcuplink. A candidate line assembled
//! by the framer is validated and decomposed in one pass:
//!
//! - device-id prefix check (`CTS1+`)
//! - single-terminator check (rejects spliced lines)
//! - command-name lookup against the immutable command table
//! - bounded extraction of the raw argument string
//! - suffix-tag extraction (`@tssent=`, `@tsexec=`, `@resp_fname=`)
//! - optional SHA-256 digest verification over the command bytes
//! - structural arity check (comma count)
//!
//! Parsing is terminal on first failure; every failure path yields a
//! distinct error with a stable numeric code for log-based diagnosis, and
//! never panics on attacker-controlled input.

pub mod args;
pub mod error;
pub mod integrity;
pub mod parser;
pub mod table;
pub mod tags;
pub mod types;

pub use args::{str_arg, uint64_arg, ArgError};
pub use error::{IntegrityError, ParseError, TableError, TagError};
pub use integrity::{verify_digest, SignatureStatus, DIGEST_LEN};
pub use parser::{parse_telecommand, starts_with_device_id, ParserConfig};
pub use table::{
    is_name_byte, CommandTable, HandlerError, ReadinessLevel, TelecommandDefinition,
    TelecommandHandler,
};
pub use tags::{
    find_tag, hex32_tag, string_tag, uint64_tag, TAG_RESP_FNAME, TAG_SHA256, TAG_TSEXEC,
    TAG_TSSENT,
};
pub use types::{
    ArgsString, BoundedStr, CapacityExceeded, ParsedTelecommand, ResponseBuffer, ResponseFilename,
    MAX_ARGS_LEN, MAX_RESPONSE_FILENAME_LEN, MAX_RESPONSE_LEN,
};

/// Fixed ASCII literal identifying this device; required at the start of
/// every telecommand.
pub const DEVICE_ID_PREFIX: &str = "CTS1+";
