//! The per-channel reception pipeline: buffer → framer → parser → agenda.
//!
//! One [`ChannelPipeline`] exists per command source. The receive interrupt
//! appends bytes to the pipeline's buffer; a periodic task calls
//! [`drain`](ChannelPipeline::drain) every [`POLL_INTERVAL_MS`] and forwards
//! every successfully parsed command across the agenda boundary. Parsing
//! happens synchronously in task context — the interrupt does nothing
//! beyond the append.

use tcuplink_agenda::Agenda;
use tcuplink_channel::{ChannelBuffer, TelecommandSource};
use tcuplink_frame::{Framer, FramerConfig, FramerPoll};
use tcuplink_parse::{parse_telecommand, CommandTable, ParseError, ParserConfig};
use tracing::warn;

/// How often the reception task polls each channel, in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 400;

/// Pipeline-level configuration, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineConfig {
    pub parser: ParserConfig,
}

/// Result of one poll step, mirrored into the task's control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing available; stop polling until the next tick.
    Idle,
    /// One command was parsed and handed to the agenda.
    Scheduled,
    /// A line was lost (framing discard, parse failure, or agenda reject).
    Discarded,
}

/// One channel's reception pipeline.
pub struct ChannelPipeline {
    source: TelecommandSource,
    buffer: ChannelBuffer,
    framer: Framer,
}

impl ChannelPipeline {
    /// Pipeline for the umbilical/debug UART (byte stream, 100 ms timeout).
    pub fn debug_uart() -> Self {
        Self::new(
            TelecommandSource::DebugUart,
            ChannelBuffer::with_default_capacity(),
            Framer::new(FramerConfig::stream()),
        )
    }

    /// Pipeline for the radio (whole decoded frames, 4-byte header).
    pub fn radio1() -> Self {
        Self::new(
            TelecommandSource::Radio1,
            ChannelBuffer::with_default_capacity(),
            Framer::new(FramerConfig::datagram()),
        )
    }

    pub fn new(source: TelecommandSource, buffer: ChannelBuffer, framer: Framer) -> Self {
        Self {
            source,
            buffer,
            framer,
        }
    }

    /// The channel this pipeline serves.
    pub fn source(&self) -> TelecommandSource {
        self.source
    }

    /// The receive buffer; the interrupt holds this to append bytes.
    pub fn buffer(&self) -> &ChannelBuffer {
        &self.buffer
    }

    /// Check for one complete line and, if present, parse and schedule it.
    pub fn poll_once(
        &mut self,
        table: &CommandTable,
        config: &PipelineConfig,
        agenda: &mut impl Agenda,
        now_ms: u64,
    ) -> PollOutcome {
        let line = match self.framer.poll(&self.buffer, now_ms) {
            FramerPoll::Empty => return PollOutcome::Idle,
            FramerPoll::Discarded(_) => return PollOutcome::Discarded,
            FramerPoll::Complete(line) => line,
        };

        let text = match line.as_str() {
            Ok(text) => text,
            Err(_) => {
                let err = ParseError::InvalidEncoding;
                warn!(source = %self.source, code = err.code(), error = %err, "telecommand dropped");
                return PollOutcome::Discarded;
            }
        };

        let parsed = match parse_telecommand(text, self.source, table, &config.parser) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(source = %self.source, code = err.code(), error = %err, "error parsing telecommand");
                return PollOutcome::Discarded;
            }
        };

        match agenda.schedule(parsed) {
            Ok(()) => PollOutcome::Scheduled,
            Err(err) => {
                warn!(source = %self.source, error = %err, "error adding telecommand to agenda");
                PollOutcome::Discarded
            }
        }
    }

    /// Poll until the channel runs dry, forwarding every complete command.
    ///
    /// Stops on `Idle`, and also on `Discarded` — a burst of invalid lines
    /// gets processed one per tick rather than starving the task.
    pub fn drain(
        &mut self,
        table: &CommandTable,
        config: &PipelineConfig,
        agenda: &mut impl Agenda,
        now_ms: u64,
    ) -> usize {
        let mut scheduled = 0usize;
        loop {
            match self.poll_once(table, config, agenda, now_ms) {
                PollOutcome::Scheduled => scheduled += 1,
                PollOutcome::Idle | PollOutcome::Discarded => return scheduled,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcuplink_agenda::{AgendaConfig, SlotAgenda};
    use tcuplink_parse::ParsedTelecommand;

    use crate::commands::default_table;

    fn agenda() -> SlotAgenda {
        SlotAgenda::new(AgendaConfig {
            capacity: 8,
            replay_record_size: 8,
            require_unique_tssent: false,
        })
    }

    #[test]
    fn complete_line_is_scheduled() {
        let table = default_table();
        let mut pipeline = ChannelPipeline::debug_uart();
        let mut agenda = agenda();

        pipeline.buffer().append_frame(b"CTS1+hello_world()!", 0);

        let outcome = pipeline.poll_once(&table, &PipelineConfig::default(), &mut agenda, 0);
        assert_eq!(outcome, PollOutcome::Scheduled);
        assert_eq!(agenda.pending(), 1);
    }

    #[test]
    fn empty_channel_is_idle() {
        let table = default_table();
        let mut pipeline = ChannelPipeline::debug_uart();
        let mut agenda = agenda();

        let outcome = pipeline.poll_once(&table, &PipelineConfig::default(), &mut agenda, 0);
        assert_eq!(outcome, PollOutcome::Idle);
    }

    #[test]
    fn unparseable_line_is_discarded() {
        let table = default_table();
        let mut pipeline = ChannelPipeline::debug_uart();
        let mut agenda = agenda();

        pipeline.buffer().append_frame(b"CTS1+no_such_command()!", 0);

        let outcome = pipeline.poll_once(&table, &PipelineConfig::default(), &mut agenda, 0);
        assert_eq!(outcome, PollOutcome::Discarded);
        assert!(agenda.is_empty());
    }

    #[test]
    fn non_utf8_line_is_discarded_not_panicked() {
        let table = default_table();
        let mut pipeline = ChannelPipeline::debug_uart();
        let mut agenda = agenda();

        pipeline.buffer().append_frame(&[0xFF, 0xC0, 0x80, b'!'], 0);

        let outcome = pipeline.poll_once(&table, &PipelineConfig::default(), &mut agenda, 0);
        assert_eq!(outcome, PollOutcome::Discarded);
    }

    #[test]
    fn drain_processes_back_to_back_commands() {
        let table = default_table();
        let mut pipeline = ChannelPipeline::debug_uart();
        let mut agenda = agenda();

        pipeline
            .buffer()
            .append_frame(b"CTS1+hello_world()!CTS1+reboot()!", 0);

        let scheduled = pipeline.drain(&table, &PipelineConfig::default(), &mut agenda, 0);
        assert_eq!(scheduled, 2);
        assert_eq!(agenda.pending(), 2);
    }

    #[test]
    fn drain_stops_at_first_discard() {
        let table = default_table();
        let mut pipeline = ChannelPipeline::debug_uart();
        let mut agenda = agenda();

        pipeline
            .buffer()
            .append_frame(b"CTS1+bogus()!CTS1+hello_world()!", 0);

        let scheduled = pipeline.drain(&table, &PipelineConfig::default(), &mut agenda, 0);
        assert_eq!(scheduled, 0);
        // The valid command is still queued for the next tick.
        assert!(!pipeline.buffer().is_empty());
    }

    #[test]
    fn radio_pipeline_strips_header() {
        let table = default_table();
        let mut pipeline = ChannelPipeline::radio1();
        let mut agenda = agenda();

        let mut frame = vec![0x01, 0x02, 0x03, 0x04];
        frame.extend_from_slice(b"CTS1+hello_world()!");
        pipeline.buffer().append_frame(&frame, 0);

        let outcome = pipeline.poll_once(&table, &PipelineConfig::default(), &mut agenda, 0);
        assert_eq!(outcome, PollOutcome::Scheduled);

        let parsed: ParsedTelecommand = agenda.pop_due(0).expect("scheduled");
        assert_eq!(parsed.source, TelecommandSource::Radio1);
    }

    #[test]
    fn signing_required_flows_through_config() {
        let table = default_table();
        let mut pipeline = ChannelPipeline::debug_uart();
        let mut agenda = agenda();
        let config = PipelineConfig {
            parser: ParserConfig {
                require_signed: true,
            },
        };

        pipeline.buffer().append_frame(b"CTS1+hello_world()!", 0);
        let outcome = pipeline.poll_once(&table, &config, &mut agenda, 0);
        assert_eq!(outcome, PollOutcome::Discarded);
    }
}
