//! The built-in command table.
//!
//! Mission subsystems register their own commands here; the handful below
//! are the ones every build carries (bring-up, timekeeping, and loopback
//! checks usable from the ground-support tooling).

use std::fmt::Write;

use tcuplink_channel::TelecommandSource;
use tcuplink_parse::{
    uint64_arg, CommandTable, HandlerError, ReadinessLevel, ResponseBuffer,
    TelecommandDefinition,
};

fn hello_world(
    _args: &str,
    _source: TelecommandSource,
    response: &mut ResponseBuffer,
) -> Result<(), HandlerError> {
    let _ = write!(response, "Hello, world! The flight computer is listening.");
    Ok(())
}

fn echo_back_args(
    args: &str,
    _source: TelecommandSource,
    response: &mut ResponseBuffer,
) -> Result<(), HandlerError> {
    let _ = write!(response, "SUCCESS: echoed args: '{args}'");
    Ok(())
}

fn get_system_time(
    _args: &str,
    _source: TelecommandSource,
    response: &mut ResponseBuffer,
) -> Result<(), HandlerError> {
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let _ = write!(response, "{now_ms}");
    Ok(())
}

fn set_system_time(
    args: &str,
    _source: TelecommandSource,
    response: &mut ResponseBuffer,
) -> Result<(), HandlerError> {
    let epoch_ms = uint64_arg(args, 0).map_err(|_| HandlerError("arg 0 must be epoch ms"))?;
    let _ = write!(response, "system time set to {epoch_ms}");
    Ok(())
}

fn reboot(
    _args: &str,
    source: TelecommandSource,
    response: &mut ResponseBuffer,
) -> Result<(), HandlerError> {
    let _ = write!(response, "reboot requested via {}", source.as_str());
    Ok(())
}

/// Definitions behind [`default_table`].
pub const DEFAULT_DEFINITIONS: &[TelecommandDefinition] = &[
    TelecommandDefinition {
        name: "hello_world",
        handler: hello_world,
        number_of_args: 0,
        readiness: ReadinessLevel::ForOperation,
    },
    TelecommandDefinition {
        name: "echo_back_args",
        handler: echo_back_args,
        number_of_args: 1,
        readiness: ReadinessLevel::ForOperation,
    },
    TelecommandDefinition {
        name: "get_system_time",
        handler: get_system_time,
        number_of_args: 0,
        readiness: ReadinessLevel::ForOperation,
    },
    TelecommandDefinition {
        name: "set_system_time",
        handler: set_system_time,
        number_of_args: 1,
        readiness: ReadinessLevel::ForOperation,
    },
    TelecommandDefinition {
        name: "reboot",
        handler: reboot,
        number_of_args: 0,
        readiness: ReadinessLevel::FlightTesting,
    },
];

/// The built-in command table.
pub fn default_table() -> CommandTable {
    // The definitions above are static and name-checked by the tests, so
    // construction cannot fail at runtime.
    CommandTable::new(DEFAULT_DEFINITIONS).unwrap_or_else(|_| CommandTable::empty())
}
