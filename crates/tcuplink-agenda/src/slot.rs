use tcuplink_parse::ParsedTelecommand;
use tracing::{debug, warn};

use crate::error::{AgendaError, Result};

/// Default number of agenda slots.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default size of the replay-protection record.
pub const DEFAULT_REPLAY_RECORD_SIZE: usize = 500;

/// The scheduling boundary out of the parsing core.
///
/// Whatever sits behind this trait owns the command from here on.
pub trait Agenda {
    /// Accept one parsed telecommand for (possibly deferred) execution.
    fn schedule(&mut self, command: ParsedTelecommand) -> Result<()>;
}

/// Agenda sizing and replay-protection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgendaConfig {
    /// Number of command slots, fixed at construction.
    pub capacity: usize,
    /// Number of recent sent-timestamps remembered for replay detection.
    pub replay_record_size: usize,
    /// When set, a command whose non-zero `@tssent=` value was already
    /// accepted is rejected.
    pub require_unique_tssent: bool,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            replay_record_size: DEFAULT_REPLAY_RECORD_SIZE,
            require_unique_tssent: false,
        }
    }
}

/// Fixed-slot in-memory agenda.
///
/// All storage is allocated at construction; scheduling and draining never
/// reallocate. Commands become due when their execution timestamp is at or
/// before the caller's clock; a timestamp of 0 is due immediately.
pub struct SlotAgenda {
    slots: Box<[Option<ParsedTelecommand>]>,
    tssent_record: Box<[u64]>,
    tssent_head: usize,
    tssent_filled: usize,
    total_queued: u64,
    latest_tssent: u64,
    config: AgendaConfig,
}

impl SlotAgenda {
    pub fn new(config: AgendaConfig) -> Self {
        Self {
            slots: (0..config.capacity).map(|_| None).collect(),
            tssent_record: vec![0u64; config.replay_record_size].into_boxed_slice(),
            tssent_head: 0,
            tssent_filled: 0,
            total_queued: 0,
            latest_tssent: 0,
            config,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(AgendaConfig::default())
    }

    /// Remove and return the due command with the earliest execution time.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<ParsedTelecommand> {
        let mut best: Option<(usize, u64)> = None;
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(command) = slot {
                if command.timestamp_to_execute <= now_ms {
                    match best {
                        Some((_, ts)) if ts <= command.timestamp_to_execute => {}
                        _ => best = Some((index, command.timestamp_to_execute)),
                    }
                }
            }
        }
        best.and_then(|(index, _)| self.slots[index].take())
    }

    /// Number of commands currently waiting.
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns true when no commands are waiting.
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Slot capacity.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Commands accepted since construction.
    pub fn total_queued(&self) -> u64 {
        self.total_queued
    }

    /// Highest `@tssent=` value accepted so far.
    pub fn latest_tssent(&self) -> u64 {
        self.latest_tssent
    }

    fn tssent_seen(&self, tssent: u64) -> bool {
        self.tssent_record[..self.tssent_filled].contains(&tssent)
    }

    fn record_tssent(&mut self, tssent: u64) {
        if self.tssent_record.is_empty() {
            return;
        }
        self.tssent_record[self.tssent_head] = tssent;
        self.tssent_head = (self.tssent_head + 1) % self.tssent_record.len();
        self.tssent_filled = self.tssent_filled.max(self.tssent_head);
        if self.tssent_head == 0 {
            self.tssent_filled = self.tssent_record.len();
        }
    }
}

impl Agenda for SlotAgenda {
    fn schedule(&mut self, command: ParsedTelecommand) -> Result<()> {
        if self.config.require_unique_tssent
            && command.timestamp_sent > 0
            && self.tssent_seen(command.timestamp_sent)
        {
            warn!(
                tssent = command.timestamp_sent,
                "telecommand skipped due to repeated tssent"
            );
            return Err(AgendaError::DuplicateTimestampSent {
                tssent: command.timestamp_sent,
            });
        }

        let Some(index) = self.slots.iter().position(|slot| slot.is_none()) else {
            warn!(capacity = self.capacity(), "agenda full; command dropped");
            return Err(AgendaError::Full {
                capacity: self.capacity(),
            });
        };

        // Remembering the sent-timestamp is what blocks replays later.
        let tssent = command.timestamp_sent;
        if tssent > 0 {
            self.latest_tssent = self.latest_tssent.max(tssent);
            self.record_tssent(tssent);
        }

        debug!(
            command_index = command.command_index,
            tsexec = command.timestamp_to_execute,
            source = %command.source,
            "telecommand scheduled"
        );
        self.slots[index] = Some(command);
        self.total_queued += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcuplink_channel::TelecommandSource;
    use tcuplink_parse::{ArgsString, ResponseFilename};

    fn command(tssent: u64, tsexec: u64) -> ParsedTelecommand {
        ParsedTelecommand {
            command_index: 0,
            args: ArgsString::new(),
            timestamp_sent: tssent,
            timestamp_to_execute: tsexec,
            response_filename: ResponseFilename::new(),
            source: TelecommandSource::DebugUart,
        }
    }

    fn small_agenda(require_unique_tssent: bool) -> SlotAgenda {
        SlotAgenda::new(AgendaConfig {
            capacity: 4,
            replay_record_size: 4,
            require_unique_tssent,
        })
    }

    #[test]
    fn immediate_command_is_due_at_once() {
        let mut agenda = small_agenda(false);
        agenda.schedule(command(0, 0)).expect("slot free");

        assert_eq!(agenda.pending(), 1);
        let popped = agenda.pop_due(0).expect("due now");
        assert_eq!(popped.timestamp_to_execute, 0);
        assert!(agenda.is_empty());
    }

    #[test]
    fn future_command_waits_for_its_timestamp() {
        let mut agenda = small_agenda(false);
        agenda.schedule(command(0, 5_000)).expect("slot free");

        assert!(agenda.pop_due(4_999).is_none());
        assert!(agenda.pop_due(5_000).is_some());
    }

    #[test]
    fn due_commands_pop_in_execution_time_order() {
        let mut agenda = small_agenda(false);
        agenda.schedule(command(0, 300)).expect("slot free");
        agenda.schedule(command(0, 100)).expect("slot free");
        agenda.schedule(command(0, 200)).expect("slot free");

        assert_eq!(agenda.pop_due(1_000).map(|c| c.timestamp_to_execute), Some(100));
        assert_eq!(agenda.pop_due(1_000).map(|c| c.timestamp_to_execute), Some(200));
        assert_eq!(agenda.pop_due(1_000).map(|c| c.timestamp_to_execute), Some(300));
        assert!(agenda.pop_due(1_000).is_none());
    }

    #[test]
    fn full_agenda_rejects() {
        let mut agenda = small_agenda(false);
        for _ in 0..4 {
            agenda.schedule(command(0, 0)).expect("slot free");
        }
        assert_eq!(
            agenda.schedule(command(0, 0)),
            Err(AgendaError::Full { capacity: 4 })
        );
    }

    #[test]
    fn popping_frees_a_slot() {
        let mut agenda = small_agenda(false);
        for _ in 0..4 {
            agenda.schedule(command(0, 0)).expect("slot free");
        }
        agenda.pop_due(0).expect("due");
        agenda.schedule(command(0, 0)).expect("freed slot");
    }

    #[test]
    fn repeated_tssent_rejected_when_required() {
        let mut agenda = small_agenda(true);
        agenda.schedule(command(777, 0)).expect("first accept");
        assert_eq!(
            agenda.schedule(command(777, 0)),
            Err(AgendaError::DuplicateTimestampSent { tssent: 777 })
        );
        assert_eq!(agenda.pending(), 1);
    }

    #[test]
    fn repeated_tssent_allowed_when_not_required() {
        let mut agenda = small_agenda(false);
        agenda.schedule(command(777, 0)).expect("first");
        agenda.schedule(command(777, 0)).expect("repeat allowed");
        assert_eq!(agenda.pending(), 2);
    }

    #[test]
    fn zero_tssent_is_never_a_replay() {
        let mut agenda = small_agenda(true);
        agenda.schedule(command(0, 0)).expect("first");
        agenda.schedule(command(0, 0)).expect("zero is not deduped");
    }

    #[test]
    fn replay_record_wraps_and_forgets_oldest() {
        let mut agenda = SlotAgenda::new(AgendaConfig {
            capacity: 16,
            replay_record_size: 2,
            require_unique_tssent: true,
        });
        agenda.schedule(command(1, 0)).expect("accept");
        agenda.schedule(command(2, 0)).expect("accept");
        agenda.schedule(command(3, 0)).expect("accept, evicts 1");

        // 1 fell out of the record; 3 is still remembered.
        agenda.schedule(command(1, 0)).expect("forgotten, accepted again");
        assert_eq!(
            agenda.schedule(command(3, 0)),
            Err(AgendaError::DuplicateTimestampSent { tssent: 3 })
        );
    }

    #[test]
    fn counters_track_accepted_commands() {
        let mut agenda = small_agenda(false);
        agenda.schedule(command(10, 0)).expect("accept");
        agenda.schedule(command(30, 0)).expect("accept");
        agenda.schedule(command(20, 0)).expect("accept");

        assert_eq!(agenda.total_queued(), 3);
        assert_eq!(agenda.latest_tssent(), 30);
    }
}
