//! Command source identities.
//!
//! A telecommand carries the channel it arrived on through to execution, so
//! handlers and logs can distinguish umbilical-UART traffic from radio
//! traffic.

/// The physical channel a telecommand arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TelecommandSource {
    /// Umbilical/debug UART: a plain serial text channel.
    DebugUart,
    /// UHF radio: whole decoded frames behind a transport header.
    Radio1,
}

impl TelecommandSource {
    /// Returns a human-readable name for the source.
    pub fn as_str(self) -> &'static str {
        match self {
            TelecommandSource::DebugUart => "DEBUG_UART",
            TelecommandSource::Radio1 => "RADIO1",
        }
    }
}

impl std::fmt::Display for TelecommandSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
