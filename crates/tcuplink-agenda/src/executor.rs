use tcuplink_parse::{CommandTable, ResponseBuffer};
use tracing::{debug, error, info, warn};

use crate::slot::SlotAgenda;

/// Execute every command whose execution time has arrived.
///
/// Pops due commands in execution-time order, invokes the registered
/// handler with the raw argument string, and logs the outcome. `response`
/// is cleared before each handler; after the call it holds the last
/// handler's output (callers forward it to the response-file writer when
/// the command named one). Returns the number of commands attempted.
pub fn execute_due(
    agenda: &mut SlotAgenda,
    table: &CommandTable,
    now_ms: u64,
    response: &mut ResponseBuffer,
) -> usize {
    let mut attempted = 0usize;

    while let Some(command) = agenda.pop_due(now_ms) {
        attempted += 1;
        response.clear();

        let Some(definition) = table.get(command.command_index) else {
            // A scheduled index always came from a lookup, so this means
            // the table changed out from under the agenda.
            error!(
                command_index = command.command_index,
                "scheduled command no longer in table; dropping"
            );
            continue;
        };

        match (definition.handler)(command.args.as_str(), command.source, response) {
            Ok(()) => {
                info!(
                    command = definition.name,
                    source = %command.source,
                    response_len = response.len(),
                    "telecommand executed"
                );
                if !command.response_filename.is_empty() {
                    debug!(
                        command = definition.name,
                        file = %command.response_filename,
                        "response destined for file"
                    );
                }
            }
            Err(err) => {
                warn!(
                    command = definition.name,
                    source = %command.source,
                    error = %err,
                    "telecommand handler failed"
                );
            }
        }
    }

    attempted
}
