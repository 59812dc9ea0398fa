//! Per-node transaction numbering.

/// Monotonic 32-bit transaction counter.
///
/// Each call to [`TransactionNumber::next`] hands out the current value and
/// advances by one, wrapping to zero after `u32::MAX`. One counter is shared
/// by every message type a node sends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionNumber {
    next: u32,
}

impl TransactionNumber {
    /// Create a counter whose first value is zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Create a counter whose first value is `start`.
    #[must_use]
    pub const fn starting_at(start: u32) -> Self {
        Self { next: start }
    }

    /// Return the value the next call to [`TransactionNumber::next`] will yield.
    #[must_use]
    pub const fn peek(&self) -> u32 {
        self.next
    }

    /// Consume and return the next transaction number.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u32 {
        let value = self.next;
        self.next = self.next.wrapping_add(1);
        value
    }
}
