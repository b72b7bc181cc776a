//! Bounded FIFO of pending command text.
//!
//! A ring buffer with one slot always left free, so `head == tail` means
//! empty and `(head + 1) % N == tail` means full. Capacity is `N - 1`.

use heapless::String;

use crate::error::{truncated, CommandError};

/// Longest command text kept in a queue slot, in bytes.
pub const COMMAND_TEXT_LEN: usize = 31;

/// Raw command text as stored in the queue.
pub type CommandText = String<COMMAND_TEXT_LEN>;

/// Default number of ring slots.
pub const DEFAULT_SLOTS: usize = 10;

/// Fixed-size command ring buffer.
///
/// `head` is the next slot to write, `tail` the oldest pending command.
#[derive(Debug, Clone)]
pub struct CommandQueue<const N: usize = DEFAULT_SLOTS> {
    slots: [CommandText; N],
    head: usize,
    tail: usize,
}

impl<const N: usize> CommandQueue<N> {
    /// Create an empty queue. `N` must be at least 2.
    pub fn new() -> Self {
        debug_assert!(N >= 2, "a ring of {} slots holds nothing", N);
        Self {
            slots: core::array::from_fn(|_| String::new()),
            head: 0,
            tail: 0,
        }
    }

    /// Append command text, truncated to [`COMMAND_TEXT_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// [`CommandError::QueueFull`] when all `N - 1` usable slots are taken;
    /// the queue is left unchanged.
    pub fn enqueue(&mut self, text: &str) -> core::result::Result<(), CommandError> {
        if self.is_full() {
            return Err(CommandError::QueueFull);
        }
        self.slots[self.head] = truncated(text);
        self.head = (self.head + 1) % N;
        Ok(())
    }

    /// Oldest pending command, without removing it.
    pub fn peek(&self) -> Option<&CommandText> {
        if self.is_empty() {
            None
        } else {
            Some(&self.slots[self.tail])
        }
    }

    /// Retire the oldest pending command. No-op when empty.
    pub fn advance(&mut self) {
        if !self.is_empty() {
            self.slots[self.tail].clear();
            self.tail = (self.tail + 1) % N;
        }
    }

    /// No pending commands.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// No free slot left.
    #[inline]
    pub fn is_full(&self) -> bool {
        (self.head + 1) % N == self.tail
    }

    /// Number of pending commands.
    #[inline]
    pub fn len(&self) -> usize {
        (self.head + N - self.tail) % N
    }

    /// Usable slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Next slot to write.
    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Slot of the oldest pending command.
    #[inline]
    pub fn tail(&self) -> usize {
        self.tail
    }
}

impl<const N: usize> Default for CommandQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
