//! Per-channel raw receive buffers for telecommand ingestion.
//!
//! Every command source (umbilical UART, radio) owns one [`ChannelBuffer`]:
//! a pre-allocated single-producer/single-consumer byte ring. The receive
//! interrupt is the producer (`append`/`append_frame`) and the only writer
//! of the head cursor; the periodic reception task is the consumer
//! (`read_unread`/`consume`/`clear`). Nothing here blocks, and nothing
//! allocates after construction.

pub mod buffer;
pub mod source;

pub use buffer::{ChannelBuffer, DEFAULT_CAPACITY};
pub use source::TelecommandSource;
