use clap::{Args, Subcommand, ValueEnum};
use tcuplink_channel::TelecommandSource;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod commands;
pub mod feed;
pub mod parse;
pub mod sign;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse one telecommand line and print the structured result.
    Parse(ParseArgs),
    /// Append a digest tag and terminator to a command line.
    Sign(SignArgs),
    /// List the registered command table.
    Commands(CommandsArgs),
    /// Feed stdin lines through the full reception pipeline.
    Feed(FeedArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Parse(args) => parse::run(args, format),
        Command::Sign(args) => sign::run(args),
        Command::Commands(args) => commands::run(args, format),
        Command::Feed(args) => feed::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Channel to attribute input to.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SourceArg {
    Uart,
    Radio,
}

impl SourceArg {
    pub fn as_source(self) -> TelecommandSource {
        match self {
            SourceArg::Uart => TelecommandSource::DebugUart,
            SourceArg::Radio => TelecommandSource::Radio1,
        }
    }
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// The full telecommand line, terminator included.
    pub line: String,
    /// Require a valid @sha256= digest tag.
    #[arg(long)]
    pub require_signed: bool,
    /// Channel to attribute the command to.
    #[arg(long, value_enum, default_value = "uart")]
    pub source: SourceArg,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Command line through the closing paren (terminator optional).
    pub line: String,
}

#[derive(Args, Debug, Default)]
pub struct CommandsArgs {}

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Require a valid @sha256= digest tag on every command.
    #[arg(long)]
    pub require_signed: bool,
    /// Reject commands reusing a previously seen @tssent= value.
    #[arg(long)]
    pub unique_tssent: bool,
    /// Channel to attribute input to.
    #[arg(long, value_enum, default_value = "uart")]
    pub source: SourceArg,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
