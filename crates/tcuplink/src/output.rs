use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use tcuplink_parse::{CommandTable, ParsedTelecommand};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ParsedOutput<'a> {
    command: &'a str,
    command_index: usize,
    args: &'a str,
    timestamp_sent: u64,
    timestamp_to_execute: u64,
    response_filename: &'a str,
    source: &'a str,
}

pub fn print_parsed(parsed: &ParsedTelecommand, table: &CommandTable, format: OutputFormat) {
    let command = table
        .get(parsed.command_index)
        .map(|def| def.name)
        .unwrap_or("<unknown>");

    match format {
        OutputFormat::Json => {
            let out = ParsedOutput {
                command,
                command_index: parsed.command_index,
                args: parsed.args.as_str(),
                timestamp_sent: parsed.timestamp_sent,
                timestamp_to_execute: parsed.timestamp_to_execute,
                response_filename: parsed.response_filename.as_str(),
                source: parsed.source.as_str(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut out = Table::new();
            out.load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "ARGS", "TSSENT", "TSEXEC", "RESP_FILE", "SOURCE"])
                .add_row(vec![
                    command.to_string(),
                    parsed.args.as_str().to_string(),
                    parsed.timestamp_sent.to_string(),
                    parsed.timestamp_to_execute.to_string(),
                    parsed.response_filename.as_str().to_string(),
                    parsed.source.as_str().to_string(),
                ]);
            println!("{out}");
        }
        OutputFormat::Pretty => {
            println!(
                "command={command} index={} args={:?} tssent={} tsexec={} resp_file={:?} source={}",
                parsed.command_index,
                parsed.args.as_str(),
                parsed.timestamp_sent,
                parsed.timestamp_to_execute,
                parsed.response_filename.as_str(),
                parsed.source.as_str(),
            );
        }
    }
}

#[derive(Serialize)]
struct CommandOutput<'a> {
    name: &'a str,
    number_of_args: u8,
    readiness: &'a str,
}

pub fn print_command_list(table: &CommandTable, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<CommandOutput<'_>> = table
                .iter()
                .map(|def| CommandOutput {
                    name: def.name,
                    number_of_args: def.number_of_args,
                    readiness: def.readiness.as_str(),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut out = Table::new();
            out.load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NAME", "ARGS", "READINESS"]);
            for def in table.iter() {
                out.add_row(vec![
                    def.name.to_string(),
                    def.number_of_args.to_string(),
                    def.readiness.as_str().to_string(),
                ]);
            }
            println!("{out}");
        }
        OutputFormat::Pretty => {
            for def in table.iter() {
                println!(
                    "{}({} args) [{}]",
                    def.name,
                    def.number_of_args,
                    def.readiness.as_str()
                );
            }
        }
    }
}
