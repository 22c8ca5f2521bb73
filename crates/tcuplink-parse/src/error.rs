use crate::tags::{TAG_RESP_FNAME, TAG_SHA256, TAG_TSEXEC, TAG_TSSENT};

/// Failures of the suffix-tag extractors.
///
/// `NotFound` is distinct from every malformed-value failure so callers can
/// treat an absent tag as optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    /// The tag does not appear in the searched region.
    #[error("tag not present")]
    NotFound,

    /// The tag is present but has no value characters after `=`.
    #[error("tag has no value")]
    EmptyValue,

    /// The character after the value run is not in `{'#', '@', '!', end}`.
    #[error("invalid character after value (offset {offset})")]
    BadTerminator { offset: usize },

    /// A decimal value does not fit in a 64-bit unsigned integer.
    #[error("decimal value overflows u64")]
    Overflow,

    /// A digest value is not valid hex.
    #[error("value is not valid hex")]
    InvalidHex,

    /// A digest value does not decode to exactly 32 bytes.
    #[error("digest must be 64 hex chars, got {len}")]
    WrongDigestLength { len: usize },

    /// A string value exceeds the caller's bound.
    #[error("value too long ({len} chars, max {max})")]
    TooLong { len: usize, max: usize },
}

/// Authentication failures from digest verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    /// Signed commands are required and no digest tag was present.
    #[error("signed commands required but no digest tag present")]
    MissingSignature,

    /// The provided digest does not match the command bytes.
    #[error("digest does not match command bytes")]
    SignatureMismatch,
}

/// Command-table construction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A definition has an empty name.
    #[error("command definition {index} has an empty name")]
    EmptyName { index: usize },

    /// A definition's name contains a character outside `[A-Za-z0-9_]`.
    #[error("command name {name:?} contains an invalid character")]
    InvalidName { name: &'static str },

    /// Two definitions share a name.
    #[error("duplicate command name {name:?}")]
    DuplicateName { name: &'static str },
}

/// Errors that can occur while parsing a telecommand line.
///
/// Each variant maps to a stable small code (see [`ParseError::code`])
/// carried through log lines for ground-side diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Zero-length input.
    #[error("empty telecommand string")]
    Empty,

    /// The line is not valid UTF-8 text.
    #[error("telecommand is not valid text")]
    InvalidEncoding,

    /// The line does not start with the device-id prefix.
    #[error("missing device-id prefix")]
    MissingPrefix,

    /// More than one terminator — two commands spliced into one line.
    #[error("more than one terminator in line")]
    DuplicateTerminator,

    /// No terminator at the end of the line.
    #[error("no terminator at end of line")]
    MissingTerminator,

    /// The command name is not in the table.
    #[error("unknown command name (offset {offset}, len {len})")]
    UnknownCommand { offset: usize, len: usize },

    /// The line ends immediately after the command name.
    #[error("args parentheses required after command name")]
    MissingArgsRegion,

    /// The character after the command name is not `(`.
    #[error("expected '(' after command name (offset {offset})")]
    MissingOpenParen { offset: usize },

    /// No closing `)` after the opening one.
    #[error("no closing ')' found")]
    MissingCloseParen,

    /// A suffix tag is present but malformed.
    #[error("suffix tag {tag} invalid: {source}")]
    Tag {
        tag: &'static str,
        source: TagError,
    },

    /// Digest verification failed.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// The argument string exceeds its fixed bound.
    #[error("args too long ({len} bytes, max {max})")]
    ArgsTooLong { len: usize, max: usize },

    /// Comma count does not match the registered argument count.
    #[error("wrong argument count (expected {expected}, got {provided})")]
    WrongArgCount { expected: u8, provided: u8 },
}

impl ParseError {
    /// Stable numeric code for this failure, logged for ground diagnosis.
    pub fn code(&self) -> u8 {
        match self {
            ParseError::Empty => 10,
            ParseError::InvalidEncoding => 11,
            ParseError::MissingPrefix => 20,
            ParseError::DuplicateTerminator => 25,
            ParseError::MissingTerminator => 26,
            ParseError::UnknownCommand { .. } => 30,
            ParseError::MissingArgsRegion => 40,
            ParseError::MissingOpenParen { .. } => 50,
            ParseError::MissingCloseParen => 60,
            ParseError::Tag { tag, .. } => match *tag {
                TAG_TSSENT => 70,
                TAG_TSEXEC => 80,
                TAG_RESP_FNAME => 85,
                TAG_SHA256 => 100,
                _ => 95,
            },
            ParseError::Integrity(IntegrityError::MissingSignature) => 90,
            ParseError::Integrity(IntegrityError::SignatureMismatch) => 110,
            ParseError::ArgsTooLong { .. } => 120,
            ParseError::WrongArgCount { .. } => 130,
        }
    }
}
