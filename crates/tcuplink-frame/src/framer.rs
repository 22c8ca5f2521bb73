use tcuplink_channel::ChannelBuffer;
use tracing::warn;

use crate::line::{CandidateLine, MAX_LINE_LEN};
use crate::{RADIO_HEADER_LEN, STREAM_TIMEOUT_MS, TERMINATOR};

/// How a channel's bytes are delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingMode {
    /// Continuous byte stream: wait for the terminator, give up after the
    /// inter-byte timeout.
    Stream { timeout_ms: u64 },
    /// Discrete decoded frames: skip the transport header, then the
    /// terminator must already be present.
    Datagram { header_len: usize },
}

/// Configuration for one channel's framer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramerConfig {
    pub mode: FramingMode,
}

impl FramerConfig {
    /// Stream framing with the default 100 ms inter-byte timeout.
    pub fn stream() -> Self {
        Self {
            mode: FramingMode::Stream {
                timeout_ms: STREAM_TIMEOUT_MS,
            },
        }
    }

    /// Stream framing with an explicit timeout.
    pub fn stream_with_timeout(timeout_ms: u64) -> Self {
        Self {
            mode: FramingMode::Stream { timeout_ms },
        }
    }

    /// Datagram framing with the standard 4-byte transport header.
    pub fn datagram() -> Self {
        Self {
            mode: FramingMode::Datagram {
                header_len: RADIO_HEADER_LEN,
            },
        }
    }
}

/// Why a poll discarded queued bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DiscardReason {
    /// Stream went quiet before the terminator arrived.
    #[error("no terminator within {waited_ms} ms of last byte")]
    Timeout { waited_ms: u64 },
    /// A complete frame arrived without a terminator in its payload.
    #[error("frame payload has no terminator")]
    MissingTerminator,
    /// A frame shorter than its transport header.
    #[error("frame shorter than {header_len}-byte transport header")]
    FrameTooShort { header_len: usize },
    /// The assembled line exceeded the candidate line bound.
    #[error("line too long ({len} bytes, max {max})")]
    LineTooLong { len: usize, max: usize },
}

/// Result of polling a channel for a complete line.
#[derive(Debug)]
pub enum FramerPoll {
    /// Nothing to do yet: buffer empty, or still waiting on more bytes.
    Empty,
    /// One complete candidate line, terminator included.
    Complete(CandidateLine),
    /// Queued bytes were discarded; the line is permanently lost.
    Discarded(DiscardReason),
}

/// Assembles complete candidate lines from a channel's receive ring.
///
/// One framer per channel. The framer never blocks: each call inspects the
/// ring once and returns. All scratch storage is inline and fixed-size.
pub struct Framer {
    config: FramerConfig,
    scratch: [u8; MAX_LINE_LEN],
}

impl Framer {
    pub fn new(config: FramerConfig) -> Self {
        Self {
            config,
            scratch: [0u8; MAX_LINE_LEN],
        }
    }

    /// Current framer configuration.
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    /// Check the ring for one complete line.
    ///
    /// `now_ms` is the caller's tick, used only for the stream timeout.
    pub fn poll(&mut self, buffer: &ChannelBuffer, now_ms: u64) -> FramerPoll {
        let unread = buffer.read_unread(&mut self.scratch);
        if unread == 0 {
            return FramerPoll::Empty;
        }

        match self.config.mode {
            FramingMode::Stream { timeout_ms } => {
                self.poll_stream(buffer, unread, now_ms, timeout_ms)
            }
            FramingMode::Datagram { header_len } => self.poll_datagram(buffer, unread, header_len),
        }
    }

    fn poll_stream(
        &self,
        buffer: &ChannelBuffer,
        unread: usize,
        now_ms: u64,
        timeout_ms: u64,
    ) -> FramerPoll {
        let region = &self.scratch[..unread];

        match find_terminator(region) {
            Some(idx) => {
                // Bounds hold: idx < unread <= MAX_LINE_LEN.
                let line = match CandidateLine::from_slice(&region[..=idx]) {
                    Ok(line) => line,
                    Err(err) => {
                        warn!(error = %err, "candidate line exceeded bound; discarding");
                        buffer.clear();
                        return FramerPoll::Discarded(DiscardReason::LineTooLong {
                            len: idx + 1,
                            max: MAX_LINE_LEN,
                        });
                    }
                };
                // Later bytes stay queued for the next poll.
                buffer.consume(idx + 1);
                FramerPoll::Complete(line)
            }
            None => {
                let waited_ms = buffer.elapsed_since_last_write(now_ms);
                if waited_ms > timeout_ms {
                    warn!(
                        waited_ms,
                        partial = %String::from_utf8_lossy(region),
                        "incomplete telecommand timed out; discarding"
                    );
                    // Only the bytes seen this poll; a byte racing in after
                    // the snapshot starts the next line.
                    buffer.consume(unread);
                    FramerPoll::Discarded(DiscardReason::Timeout { waited_ms })
                } else {
                    FramerPoll::Empty
                }
            }
        }
    }

    fn poll_datagram(&self, buffer: &ChannelBuffer, unread: usize, header_len: usize) -> FramerPoll {
        // A frame is consumed whole: either a line comes out of its payload
        // or the frame is lost. Trailing bytes after the terminator belong
        // to nothing and are dropped with the rest.
        buffer.consume(unread);

        if unread <= header_len {
            warn!(unread, header_len, "radio frame too short; discarding");
            return FramerPoll::Discarded(DiscardReason::FrameTooShort { header_len });
        }

        let payload = &self.scratch[header_len..unread];
        match find_terminator(payload) {
            Some(idx) => match CandidateLine::from_slice(&payload[..=idx]) {
                Ok(line) => FramerPoll::Complete(line),
                Err(err) => {
                    warn!(error = %err, "radio payload exceeded line bound; discarding");
                    FramerPoll::Discarded(DiscardReason::LineTooLong {
                        len: idx + 1,
                        max: MAX_LINE_LEN,
                    })
                }
            },
            None => {
                warn!(
                    payload_len = payload.len(),
                    "radio frame payload has no terminator; discarding"
                );
                FramerPoll::Discarded(DiscardReason::MissingTerminator)
            }
        }
    }
}

fn find_terminator(region: &[u8]) -> Option<usize> {
    region.iter().position(|&b| b == TERMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream_framer() -> Framer {
        Framer::new(FramerConfig::stream())
    }

    fn radio_framer() -> Framer {
        Framer::new(FramerConfig::datagram())
    }

    #[test]
    fn empty_buffer_polls_empty() {
        let buf = ChannelBuffer::with_default_capacity();
        let mut framer = stream_framer();
        assert!(matches!(framer.poll(&buf, 0), FramerPoll::Empty));
    }

    #[test]
    fn complete_line_is_returned_with_terminator() {
        let buf = ChannelBuffer::with_default_capacity();
        buf.append_frame(b"CTS1+hello_world()!", 10);

        let mut framer = stream_framer();
        match framer.poll(&buf, 20) {
            FramerPoll::Complete(line) => {
                assert_eq!(line.as_bytes(), b"CTS1+hello_world()!");
            }
            other => panic!("expected Complete, got {other:?}"),
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn partial_line_waits_until_timeout() {
        let buf = ChannelBuffer::with_default_capacity();
        buf.append_frame(b"CTS1+hello", 1_000);

        let mut framer = stream_framer();
        // Inside the timeout window: keep waiting.
        assert!(matches!(framer.poll(&buf, 1_050), FramerPoll::Empty));

        // Past the window: discard.
        match framer.poll(&buf, 1_101) {
            FramerPoll::Discarded(DiscardReason::Timeout { waited_ms }) => {
                assert_eq!(waited_ms, 101);
            }
            other => panic!("expected Discarded, got {other:?}"),
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn poll_after_discard_is_idempotent() {
        let buf = ChannelBuffer::with_default_capacity();
        buf.append_frame(b"garbage", 0);

        let mut framer = stream_framer();
        assert!(matches!(
            framer.poll(&buf, 500),
            FramerPoll::Discarded(DiscardReason::Timeout { .. })
        ));

        // No new bytes: every later poll is Empty, never a second discard.
        for tick in [600, 700, 10_000] {
            assert!(matches!(framer.poll(&buf, tick), FramerPoll::Empty));
        }
    }

    #[test]
    fn remainder_stays_queued_after_extraction() {
        let buf = ChannelBuffer::with_default_capacity();
        buf.append_frame(b"CTS1+a()!CTS1+b()!", 5);

        let mut framer = stream_framer();
        match framer.poll(&buf, 6) {
            FramerPoll::Complete(line) => assert_eq!(line.as_bytes(), b"CTS1+a()!"),
            other => panic!("expected first line, got {other:?}"),
        }
        match framer.poll(&buf, 7) {
            FramerPoll::Complete(line) => assert_eq!(line.as_bytes(), b"CTS1+b()!"),
            other => panic!("expected second line, got {other:?}"),
        }
        assert!(matches!(framer.poll(&buf, 8), FramerPoll::Empty));
    }

    #[test]
    fn clock_going_backwards_does_not_discard() {
        let buf = ChannelBuffer::with_default_capacity();
        buf.append_frame(b"CTS1+partial", 2_000);

        let mut framer = stream_framer();
        // Task tick lags the ISR stamp; elapsed clamps to zero.
        assert!(matches!(framer.poll(&buf, 1_900), FramerPoll::Empty));
    }

    #[test]
    fn radio_frame_header_is_stripped() {
        let buf = ChannelBuffer::with_default_capacity();
        let mut frame = vec![0x10, 0x20, 0x30, 0x40];
        frame.extend_from_slice(b"CTS1+reboot()!");
        buf.append_frame(&frame, 0);

        let mut framer = radio_framer();
        match framer.poll(&buf, 0) {
            FramerPoll::Complete(line) => assert_eq!(line.as_bytes(), b"CTS1+reboot()!"),
            other => panic!("expected Complete, got {other:?}"),
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn radio_frame_without_terminator_discards_immediately() {
        let buf = ChannelBuffer::with_default_capacity();
        buf.append_frame(&[0, 0, 0, 0, b'C', b'T', b'S', b'1', b'+'], 0);

        let mut framer = radio_framer();
        // No timeout wait: the frame arrived atomically.
        assert!(matches!(
            framer.poll(&buf, 0),
            FramerPoll::Discarded(DiscardReason::MissingTerminator)
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn radio_frame_shorter_than_header_discards() {
        let buf = ChannelBuffer::with_default_capacity();
        buf.append_frame(&[0xAA, 0xBB], 0);

        let mut framer = radio_framer();
        assert!(matches!(
            framer.poll(&buf, 0),
            FramerPoll::Discarded(DiscardReason::FrameTooShort { header_len: 4 })
        ));
    }

    #[test]
    fn radio_trailing_bytes_after_terminator_are_dropped() {
        let buf = ChannelBuffer::with_default_capacity();
        let mut frame = vec![1, 2, 3, 4];
        frame.extend_from_slice(b"CTS1+ping()!junk");
        buf.append_frame(&frame, 0);

        let mut framer = radio_framer();
        match framer.poll(&buf, 0) {
            FramerPoll::Complete(line) => assert_eq!(line.as_bytes(), b"CTS1+ping()!"),
            other => panic!("expected Complete, got {other:?}"),
        }
        assert!(buf.is_empty());
        assert!(matches!(framer.poll(&buf, 1), FramerPoll::Empty));
    }
}
