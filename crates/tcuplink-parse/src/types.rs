use tcuplink_channel::TelecommandSource;

/// Maximum length of the raw argument string, parentheses stripped.
pub const MAX_ARGS_LEN: usize = 254;

/// Maximum length of a response filename suffix-tag value.
pub const MAX_RESPONSE_FILENAME_LEN: usize = 64;

/// Maximum length of a handler response.
pub const MAX_RESPONSE_LEN: usize = 512;

/// Fixed-capacity ASCII/UTF-8 string — no heap, no lifetimes.
///
/// Storage is zero-initialized and writes always land on char boundaries,
/// so `as_str` is total. Formatting through [`std::fmt::Write`] truncates
/// at the capacity instead of failing, which is what command handlers
/// writing into a bounded response buffer want.
#[derive(Clone)]
pub struct BoundedStr<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> BoundedStr<N> {
    /// Create an empty string.
    pub fn new() -> Self {
        Self {
            bytes: [0u8; N],
            len: 0,
        }
    }

    /// Copy `src` in; fails when it does not fit.
    pub fn from_str(src: &str) -> Result<Self, CapacityExceeded> {
        if src.len() > N {
            return Err(CapacityExceeded {
                len: src.len(),
                max: N,
            });
        }
        let mut out = Self::new();
        out.bytes[..src.len()].copy_from_slice(src.as_bytes());
        out.len = src.len();
        Ok(out)
    }

    /// Borrow the contents.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or("")
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true for an empty string.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Reset to empty without releasing storage.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Append as much of `src` as fits, truncating on a char boundary.
    pub fn push_str_truncating(&mut self, src: &str) {
        for ch in src.chars() {
            let mut buf = [0u8; 4];
            let encoded = ch.encode_utf8(&mut buf).as_bytes();
            if self.len + encoded.len() > N {
                break;
            }
            self.bytes[self.len..self.len + encoded.len()].copy_from_slice(encoded);
            self.len += encoded.len();
        }
    }
}

/// The input exceeded a fixed buffer bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value too long ({len} bytes, max {max})")]
pub struct CapacityExceeded {
    pub len: usize,
    pub max: usize,
}

impl<const N: usize> Default for BoundedStr<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PartialEq for BoundedStr<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<const N: usize> Eq for BoundedStr<N> {}

impl<const N: usize> PartialEq<&str> for BoundedStr<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<const N: usize> std::fmt::Debug for BoundedStr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl<const N: usize> std::fmt::Display for BoundedStr<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> std::fmt::Write for BoundedStr<N> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.push_str_truncating(s);
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl<const N: usize> serde::Serialize for BoundedStr<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The raw argument string of one telecommand, parentheses stripped.
pub type ArgsString = BoundedStr<MAX_ARGS_LEN>;

/// Name of the file a command response should be written to.
pub type ResponseFilename = BoundedStr<MAX_RESPONSE_FILENAME_LEN>;

/// Bounded buffer handlers write their response into.
pub type ResponseBuffer = BoundedStr<MAX_RESPONSE_LEN>;

/// Everything needed to execute one verified telecommand.
///
/// Produced once per successful parse; ownership transfers to the agenda
/// and the record is immutable from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParsedTelecommand {
    /// Index into the command table.
    pub command_index: usize,
    /// Raw argument bytes, unvalidated beyond the comma count.
    pub args: ArgsString,
    /// `@tssent=` value; 0 when the tag was absent.
    pub timestamp_sent: u64,
    /// `@tsexec=` value; 0 means execute immediately.
    pub timestamp_to_execute: u64,
    /// `@resp_fname=` value; empty when the tag was absent.
    pub response_filename: ResponseFilename,
    /// The channel the command arrived on.
    pub source: TelecommandSource,
}
