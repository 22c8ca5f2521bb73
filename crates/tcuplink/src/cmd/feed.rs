use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tcuplink::commands::default_table;
use tcuplink::{ChannelPipeline, PipelineConfig};
use tcuplink_agenda::{execute_due, AgendaConfig, SlotAgenda};
use tcuplink_channel::TelecommandSource;
use tcuplink_frame::RADIO_HEADER_LEN;
use tcuplink_parse::{ParserConfig, ResponseBuffer};

use crate::cmd::FeedArgs;
use crate::exit::{CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::OutputFormat;

/// Drive stdin lines through the full reception pipeline: buffer, framer,
/// parser, agenda, handler. One line per telecommand.
pub fn run(args: FeedArgs, format: OutputFormat) -> CliResult<i32> {
    let table = default_table();
    let config = PipelineConfig {
        parser: ParserConfig {
            require_signed: args.require_signed,
        },
    };
    let source = args.source.as_source();
    let mut pipeline = match source {
        TelecommandSource::DebugUart => ChannelPipeline::debug_uart(),
        TelecommandSource::Radio1 => ChannelPipeline::radio1(),
    };
    let mut agenda = SlotAgenda::new(AgendaConfig {
        require_unique_tssent: args.unique_tssent,
        ..AgendaConfig::default()
    });
    let mut response = ResponseBuffer::new();

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let line = match line {
            Ok(line) => line,
            Err(err) => return Err(CliError::new(INTERNAL, format!("stdin read failed: {err}"))),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let now = now_ms();
        if source == TelecommandSource::Radio1 {
            // Stand in for the transport header the radio would deliver.
            pipeline.buffer().append_frame(&[0u8; RADIO_HEADER_LEN], now);
        }
        pipeline.buffer().append_frame(trimmed.as_bytes(), now);

        pipeline.drain(&table, &config, &mut agenda, now);

        let executed = execute_due(&mut agenda, &table, now_ms(), &mut response);
        if executed > 0 && !response.is_empty() {
            print_response(response.as_str(), format);
        }
    }

    if !agenda.is_empty() {
        eprintln!(
            "{} command(s) still waiting for their execution time",
            agenda.pending()
        );
    }
    Ok(SUCCESS)
}

fn print_response(response: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "response": response })
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("{response}"),
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
