//! The command table: the immutable registry of every command this device
//! understands.

use tcuplink_channel::TelecommandSource;

use crate::error::TableError;
use crate::types::ResponseBuffer;

/// A handler failed; the message is carried into the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(pub &'static str);

/// Signature of a command handler.
///
/// Handlers receive the raw argument string (parentheses stripped), the
/// channel the command arrived on, and a bounded response buffer. Argument
/// typing and validation are the handler's problem, not the parser's.
pub type TelecommandHandler = fn(
    args: &str,
    source: TelecommandSource,
    response: &mut ResponseBuffer,
) -> Result<(), HandlerError>;

/// How far along a command is toward flight use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessLevel {
    IdeaPhase,
    NotImplemented,
    InProgress,
    /// Only usable over the umbilical UART on the bench.
    GroundUsageOnly,
    /// Flight safe, but intended for testing campaigns only.
    FlightTesting,
    /// Intended for normal operation in flight.
    ForOperation,
}

impl ReadinessLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadinessLevel::IdeaPhase => "IDEA_PHASE",
            ReadinessLevel::NotImplemented => "NOT_IMPLEMENTED",
            ReadinessLevel::InProgress => "IN_PROGRESS",
            ReadinessLevel::GroundUsageOnly => "GROUND_USAGE_ONLY",
            ReadinessLevel::FlightTesting => "FLIGHT_TESTING",
            ReadinessLevel::ForOperation => "FOR_OPERATION",
        }
    }
}

/// One registered command: name, handler, and expected argument count.
#[derive(Debug, Clone, Copy)]
pub struct TelecommandDefinition {
    /// Command name as sent over the wire; `[A-Za-z0-9_]` only.
    pub name: &'static str,
    /// Handler invoked at execution time.
    pub handler: TelecommandHandler,
    /// Number of comma-separated arguments the command takes.
    pub number_of_args: u8,
    /// Maturity of the command.
    pub readiness: ReadinessLevel,
}

/// Returns true for characters legal in a command name.
pub fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Immutable registry of command definitions, built once at startup.
///
/// Lookup is an exact match on the full name — never a prefix match — via
/// linear scan; table order affects only scan cost.
#[derive(Debug, Clone, Copy)]
pub struct CommandTable {
    definitions: &'static [TelecommandDefinition],
}

impl CommandTable {
    /// A table with no commands registered.
    pub const fn empty() -> Self {
        Self { definitions: &[] }
    }

    /// Build a table, validating names are non-empty, legal, and unique.
    pub fn new(definitions: &'static [TelecommandDefinition]) -> Result<Self, TableError> {
        for (index, def) in definitions.iter().enumerate() {
            if def.name.is_empty() {
                return Err(TableError::EmptyName { index });
            }
            if !def.name.bytes().all(is_name_byte) {
                return Err(TableError::InvalidName { name: def.name });
            }
            for earlier in &definitions[..index] {
                if earlier.name == def.name {
                    return Err(TableError::DuplicateName { name: def.name });
                }
            }
        }
        Ok(Self { definitions })
    }

    /// Index of the command whose name exactly matches `name`.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.lookup_entry(name).map(|(index, _)| index)
    }

    /// Index and definition of the command matching `name`.
    pub fn lookup_entry(&self, name: &str) -> Option<(usize, &TelecommandDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .find(|(_, def)| def.name == name)
    }

    /// Definition at `index`.
    pub fn get(&self, index: usize) -> Option<&TelecommandDefinition> {
        self.definitions.get(index)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true for an empty table.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate over all definitions.
    pub fn iter(&self) -> impl Iterator<Item = &TelecommandDefinition> {
        self.definitions.iter()
    }
}
