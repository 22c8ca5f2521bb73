use tcuplink::commands::default_table;
use tcuplink_parse::{parse_telecommand, ParserConfig};

use crate::cmd::ParseArgs;
use crate::exit::{parse_error, CliResult, SUCCESS};
use crate::output::{print_parsed, OutputFormat};

pub fn run(args: ParseArgs, format: OutputFormat) -> CliResult<i32> {
    let table = default_table();
    let config = ParserConfig {
        require_signed: args.require_signed,
    };

    let parsed = parse_telecommand(&args.line, args.source.as_source(), &table, &config)
        .map_err(|err| parse_error("parse failed", err))?;

    print_parsed(&parsed, &table, format);
    Ok(SUCCESS)
}
