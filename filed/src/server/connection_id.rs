//! Connection identifiers
// (c) 2024 Ross Younger

use std::sync::atomic::{AtomicU64, Ordering};

/// Labels one accepted connection in diagnostics.
///
/// Identifiers are unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("#{_0}")]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Accessor
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Hands out [`ConnectionId`]s in strictly increasing order.
///
/// One allocator is created when the server starts. It is never reset.
/// Allocation is a single atomic increment, so concurrent callers never see the same identifier.
#[derive(Debug)]
pub struct ConnectionIdAllocator {
    next: AtomicU64,
}

impl Default for ConnectionIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionIdAllocator {
    /// Constructor. The first identifier allocated is 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Returns the next identifier
    #[must_use]
    pub fn allocate(&self) -> ConnectionId {
        ConnectionId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
