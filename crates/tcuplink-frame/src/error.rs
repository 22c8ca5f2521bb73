/// Errors that can occur while assembling candidate lines.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The input does not fit in a bounded candidate line.
    #[error("line too long ({len} bytes, max {max})")]
    LineTooLong { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
