//! Byte-stream framing for telecommand channels.
//!
//! This layer turns the raw bytes queued in a channel's receive ring into
//! one complete candidate command line at a time. Every line ends at the
//! `!` terminator; what counts as the searchable region depends on the
//! channel:
//!
//! - The umbilical UART delivers a plain byte stream. A partial line is
//!   kept until the terminator arrives or the inter-byte timeout expires.
//! - The radio delivers whole decoded frames. The terminator is searched
//!   only after the fixed transport header, and an incomplete payload is
//!   discarded immediately — the frame already arrived atomically, so
//!   there is nothing to wait for.
//!
//! A discarded line is permanently lost; there are no retries.

pub mod error;
pub mod framer;
pub mod line;

pub use error::FrameError;
pub use framer::{DiscardReason, Framer, FramerConfig, FramerPoll, FramingMode};
pub use line::{CandidateLine, MAX_LINE_LEN};

/// Length of the transport header prepended to radio frame payloads.
pub const RADIO_HEADER_LEN: usize = 4;

/// Inter-byte timeout for stream channels, in milliseconds.
pub const STREAM_TIMEOUT_MS: u64 = 100;

/// The end-of-command terminator byte.
pub const TERMINATOR: u8 = b'!';
