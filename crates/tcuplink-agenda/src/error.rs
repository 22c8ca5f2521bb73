/// Errors that can occur when scheduling a telecommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AgendaError {
    /// Every agenda slot is occupied.
    #[error("agenda full ({capacity} slots)")]
    Full { capacity: usize },

    /// A command with this sent-timestamp was already accepted.
    #[error("duplicate sent-timestamp {tssent} (possible replay)")]
    DuplicateTimestampSent { tssent: u64 },
}

pub type Result<T> = std::result::Result<T, AgendaError>;
