use crate::error::{FrameError, Result};

/// Maximum length of one candidate command line, in bytes.
pub const MAX_LINE_LEN: usize = 512;

/// One fully assembled, unparsed command line.
///
/// Fixed storage plus a length — no heap, no lifetimes. Produced by the
/// framer when a terminator is found; handed to the parser unchanged.
#[derive(Clone)]
pub struct CandidateLine {
    bytes: [u8; MAX_LINE_LEN],
    len: usize,
}

impl CandidateLine {
    /// Copy `src` into a bounded line.
    pub fn from_slice(src: &[u8]) -> Result<Self> {
        if src.len() > MAX_LINE_LEN {
            return Err(FrameError::LineTooLong {
                len: src.len(),
                max: MAX_LINE_LEN,
            });
        }
        let mut bytes = [0u8; MAX_LINE_LEN];
        bytes[..src.len()].copy_from_slice(src);
        Ok(Self {
            bytes,
            len: src.len(),
        })
    }

    /// The assembled bytes, terminator included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The line as UTF-8 text; fails on non-text payloads.
    pub fn as_str(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true for a zero-length line.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl std::fmt::Debug for CandidateLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CandidateLine({:?})",
            String::from_utf8_lossy(self.as_bytes())
        )
    }
}
