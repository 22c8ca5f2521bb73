//! Telecommand uplink pipeline for a satellite onboard computer.
//!
//! tcuplink turns an untrusted byte stream arriving from a ground station
//! or onboard radio into verified, correctly scheduled commands: framing,
//! prefix and terminator validation, command-table lookup, suffix-tag
//! extraction, optional SHA-256 authentication, and time-ordered dispatch.
//!
//! # Crate Structure
//!
//! - [`channel`] — Per-channel SPSC receive buffers (ISR producer side)
//! - [`frame`] — Byte-stream framing into candidate command lines
//! - [`parse`] — Telecommand parsing, tags, lookup, digest verification
//! - [`agenda`] — Time-ordered scheduling and due-command execution
//! - [`pipeline`] — The per-channel poll loop tying the stages together
//! - [`commands`] — The built-in command table

/// Re-export channel types.
pub mod channel {
    pub use tcuplink_channel::*;
}

/// Re-export framing types.
pub mod frame {
    pub use tcuplink_frame::*;
}

/// Re-export parsing types.
pub mod parse {
    pub use tcuplink_parse::*;
}

/// Re-export agenda types.
pub mod agenda {
    pub use tcuplink_agenda::*;
}

pub mod commands;
pub mod pipeline;

pub use pipeline::{ChannelPipeline, PipelineConfig, PollOutcome, POLL_INTERVAL_MS};
