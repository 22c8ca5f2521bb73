use tcuplink::commands::default_table;

use crate::cmd::CommandsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_command_list, OutputFormat};

pub fn run(_args: CommandsArgs, format: OutputFormat) -> CliResult<i32> {
    let table = default_table();
    print_command_list(&table, format);
    Ok(SUCCESS)
}
