//! Lock-free SPSC byte ring backing one receive channel.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Default buffer capacity in bytes (holds several worst-case command lines).
pub const DEFAULT_CAPACITY: usize = 512;

/// Single-producer/single-consumer byte ring for one receive channel.
///
/// The receive interrupt appends bytes (or whole decoded frames) and stamps
/// the arrival time; the reception task reads, consumes, and discards. The
/// producer is the only writer of `head`; the consumer only ever shrinks the
/// unread region, except that a full ring drops its oldest byte from the
/// producer side. A torn read observed by the consumer resolves itself on
/// the next poll tick.
pub struct ChannelBuffer {
    /// Pre-allocated storage (one slot more than the usable capacity).
    storage: Box<[u8]>,
    /// Head position (producer write pointer).
    head: AtomicUsize,
    /// Tail position (consumer read pointer).
    tail: AtomicUsize,
    /// Tick (ms) of the most recent append.
    last_write_ms: AtomicU64,
    /// Total bytes ever appended.
    total_received: AtomicU64,
    /// Bytes lost to oldest-byte overwrite on overflow.
    dropped: AtomicU64,
}

impl ChannelBuffer {
    /// Create a buffer that can hold `capacity` unread bytes.
    pub fn new(capacity: usize) -> Self {
        let slots = capacity + 1;
        Self {
            storage: vec![0u8; slots].into_boxed_slice(),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            last_write_ms: AtomicU64::new(0),
            total_received: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Create a buffer with [`DEFAULT_CAPACITY`].
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    fn wrap(&self, index: usize) -> usize {
        index % self.storage.len()
    }

    /// Append a single byte (interrupt context). Drops the oldest unread
    /// byte instead of faulting when the ring is full.
    pub fn append(&self, byte: u8, now_ms: u64) {
        let head = self.head.load(Ordering::Relaxed);
        let next_head = self.wrap(head + 1);

        // SAFETY: we are the only writer of `head`, and the consumer never
        // reads past it. Storage is pre-allocated and never reallocated.
        unsafe {
            let ptr = self.storage.as_ptr() as *mut u8;
            std::ptr::write(ptr.add(head), byte);
        }

        self.head.store(next_head, Ordering::Release);
        self.total_received.fetch_add(1, Ordering::Relaxed);

        // Full: advance the tail over the oldest byte.
        let tail = self.tail.load(Ordering::Relaxed);
        if next_head == tail {
            self.tail.store(self.wrap(tail + 1), Ordering::Release);
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }

        self.last_write_ms.store(now_ms, Ordering::Release);
    }

    /// Append a whole decoded frame (radio receive path). The arrival
    /// timestamp is stored once, after the last byte is in place.
    pub fn append_frame(&self, frame: &[u8], now_ms: u64) {
        for &byte in frame {
            self.append(byte, now_ms);
        }
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        if head >= tail {
            head - tail
        } else {
            self.storage.len() - tail + head
        }
    }

    /// Returns true when no unread bytes are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Usable capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len() - 1
    }

    /// Copy unread bytes into `dst` without consuming them.
    ///
    /// Returns the number of bytes copied (`min(unread, dst.len())`).
    pub fn read_unread(&self, dst: &mut [u8]) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);

        let unread = if head >= tail {
            head - tail
        } else {
            self.storage.len() - tail + head
        };
        let count = unread.min(dst.len());

        for (i, slot) in dst.iter_mut().enumerate().take(count) {
            *slot = self.storage[self.wrap(tail + i)];
        }
        count
    }

    /// Consume `count` unread bytes from the front (task context).
    pub fn consume(&self, count: usize) {
        let taken = count.min(self.len());
        let tail = self.tail.load(Ordering::Relaxed);
        self.tail.store(self.wrap(tail + taken), Ordering::Release);
    }

    /// Discard all unread bytes.
    pub fn clear(&self) {
        self.tail
            .store(self.head.load(Ordering::Relaxed), Ordering::Release);
    }

    /// Tick (ms) of the most recent append; 0 before the first byte.
    pub fn last_write_ms(&self) -> u64 {
        self.last_write_ms.load(Ordering::Acquire)
    }

    /// Milliseconds since the most recent append.
    ///
    /// Returns 0 when `now_ms` is earlier than the recorded write time,
    /// which can happen when the ISR stamps a byte between the task reading
    /// its own tick and calling here.
    pub fn elapsed_since_last_write(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_write_ms())
    }

    /// Total bytes ever appended.
    pub fn total_received(&self) -> u64 {
        self.total_received.load(Ordering::Relaxed)
    }

    /// Bytes lost to overflow since construction.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

// SAFETY: ChannelBuffer is designed for one producer (the receive interrupt)
// and one consumer (the reception task) on separate execution contexts; all
// shared cursors are atomics.
unsafe impl Send for ChannelBuffer {}
unsafe impl Sync for ChannelBuffer {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_read_back() {
        let buf = ChannelBuffer::new(16);
        for (i, &b) in b"CTS1+".iter().enumerate() {
            buf.append(b, 100 + i as u64);
        }

        assert_eq!(buf.len(), 5);
        assert_eq!(buf.last_write_ms(), 104);

        let mut out = [0u8; 16];
        let n = buf.read_unread(&mut out);
        assert_eq!(&out[..n], b"CTS1+");

        // Reading does not consume.
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn consume_advances_front() {
        let buf = ChannelBuffer::new(16);
        buf.append_frame(b"abc!def", 1);
        buf.consume(4);

        let mut out = [0u8; 16];
        let n = buf.read_unread(&mut out);
        assert_eq!(&out[..n], b"def");
    }

    #[test]
    fn overflow_drops_oldest_byte() {
        let buf = ChannelBuffer::new(4);
        buf.append_frame(b"abcdef", 1);

        assert_eq!(buf.len(), 4);
        assert_eq!(buf.dropped(), 2);

        let mut out = [0u8; 8];
        let n = buf.read_unread(&mut out);
        assert_eq!(&out[..n], b"cdef");
    }

    #[test]
    fn wraparound_preserves_order() {
        let buf = ChannelBuffer::new(8);
        buf.append_frame(b"12345", 1);
        buf.consume(5);
        buf.append_frame(b"67890ab", 2);

        let mut out = [0u8; 8];
        let n = buf.read_unread(&mut out);
        assert_eq!(&out[..n], b"67890ab");
    }

    #[test]
    fn clear_empties_buffer() {
        let buf = ChannelBuffer::new(16);
        buf.append_frame(b"partial", 1);
        buf.clear();

        assert!(buf.is_empty());
        assert_eq!(buf.total_received(), 7);
    }

    #[test]
    fn elapsed_guards_against_clock_going_backwards() {
        let buf = ChannelBuffer::new(16);
        buf.append(b'x', 500);

        assert_eq!(buf.elapsed_since_last_write(650), 150);
        // ISR stamped a later tick than the task observed.
        assert_eq!(buf.elapsed_since_last_write(499), 0);
    }

    #[test]
    fn read_into_short_destination_truncates() {
        let buf = ChannelBuffer::new(16);
        buf.append_frame(b"abcdefgh", 1);

        let mut out = [0u8; 3];
        let n = buf.read_unread(&mut out);
        assert_eq!(n, 3);
        assert_eq!(&out, b"abc");
    }

    #[test]
    fn concurrent_producer_and_consumer() {
        use std::sync::Arc;

        let buf = Arc::new(ChannelBuffer::new(1024));
        let producer = {
            let buf = Arc::clone(&buf);
            std::thread::spawn(move || {
                for i in 0..512u64 {
                    buf.append(b'a' + (i % 26) as u8, i);
                }
            })
        };

        let mut seen = 0usize;
        let mut out = [0u8; 64];
        while seen < 512 {
            let n = buf.read_unread(&mut out);
            buf.consume(n);
            seen += n;
            std::hint::spin_loop();
        }
        producer.join().expect("producer thread");

        assert!(buf.is_empty());
        assert_eq!(buf.total_received(), 512);
    }
}
