//! Fixed-capacity staging buffer with explicit defragmentation.
//!
//! The engine reads from the transport in whatever sizes the transport
//! delivers, but consumes bytes in protocol units (a header line, a chunk
//! size token). This buffer bridges the two: transport reads land in the
//! free region at the tail, the parser consumes from the head, and
//! `defragment` compacts the live bytes back to the start when the tail
//! runs out of room.

use crate::error::Error;

/// An owned byte region with head/tail offsets.
///
/// Bytes between `head` and `tail` are live (appended but not yet
/// consumed); bytes from `tail` to `N` are free. Consuming advances the
/// head without moving data, so repeated small consumes are cheap.
pub struct ByteBuffer<const N: usize> {
    data: [u8; N],
    head: usize,
    tail: usize,
}

impl<const N: usize> core::fmt::Debug for ByteBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("capacity", &N)
            .field("len", &self.len())
            .finish()
    }
}

impl<const N: usize> Default for ByteBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteBuffer<N> {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            head: 0,
            tail: 0,
        }
    }

    /// Number of live (unconsumed) bytes.
    pub fn len(&self) -> usize {
        self.tail - self.head
    }

    /// Whether the buffer holds no live bytes.
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Free capacity, counting space recoverable by defragmentation.
    pub fn space_left(&self) -> usize {
        N - self.len()
    }

    /// The live bytes, oldest first.
    pub fn peek(&self) -> &[u8] {
        &self.data[self.head..self.tail]
    }

    /// Compact live bytes to the start of the region.
    pub fn defragment(&mut self) {
        if self.head == 0 {
            return;
        }
        self.data.copy_within(self.head..self.tail, 0);
        self.tail -= self.head;
        self.head = 0;
    }

    /// Discard all live bytes.
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// Append bytes at the tail, defragmenting first if the tail region is
    /// too small. Fails with [`Error::BufferFull`] when the bytes do not fit
    /// even into a compacted buffer.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if bytes.len() > self.space_left() {
            return Err(Error::BufferFull);
        }
        if bytes.len() > N - self.tail {
            self.defragment();
        }
        self.data[self.tail..self.tail + bytes.len()].copy_from_slice(bytes);
        self.tail += bytes.len();
        Ok(())
    }

    /// Drop `n` bytes from the head. Fails when `n` exceeds the live length.
    pub fn consume(&mut self, n: usize) -> Result<(), Error> {
        if n > self.len() {
            return Err(Error::BufferFull);
        }
        self.head += n;
        if self.head == self.tail {
            // Nothing live; reclaim the whole region for the next fill.
            self.head = 0;
            self.tail = 0;
        }
        Ok(())
    }

    /// The free region at the tail, for filling directly from a transport
    /// read. Defragments first so the region is as large as possible.
    pub fn free_space_mut(&mut self) -> &mut [u8] {
        self.defragment();
        &mut self.data[self.tail..]
    }

    /// Mark `n` bytes of the free region as live after a fill.
    pub fn commit(&mut self, n: usize) {
        debug_assert!(self.tail + n <= N);
        self.tail += n;
    }
}
