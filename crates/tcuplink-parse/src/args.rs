//! Argument extraction helpers for command handlers.
//!
//! The parser guarantees only structure (comma count); handlers use these
//! to pull typed values out of the raw argument string.

/// Failures when extracting a typed argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
    /// The argument string is empty.
    #[error("argument string is empty")]
    Empty,

    /// Fewer arguments than the requested index.
    #[error("argument {index} not present")]
    NotEnough { index: usize },

    /// The argument at `index` is not a decimal integer.
    #[error("argument {index} is not an unsigned integer")]
    NotAnInteger { index: usize },

    /// The argument at `index` overflows the target type.
    #[error("argument {index} overflows u64")]
    Overflow { index: usize },
}

/// The `index`-th (0-based) comma-separated argument, untyped.
pub fn str_arg(args: &str, index: usize) -> Result<&str, ArgError> {
    if args.is_empty() {
        return Err(ArgError::Empty);
    }
    args.split(',')
        .nth(index)
        .ok_or(ArgError::NotEnough { index })
}

/// The `index`-th argument parsed as a decimal `u64`.
///
/// The whole field must be digits; partial parses are rejected.
pub fn uint64_arg(args: &str, index: usize) -> Result<u64, ArgError> {
    let field = str_arg(args, index)?;
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ArgError::NotAnInteger { index });
    }

    let mut acc: u64 = 0;
    for b in field.bytes() {
        acc = acc
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .ok_or(ArgError::Overflow { index })?;
    }
    Ok(acc)
}
