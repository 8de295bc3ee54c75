//! Load tickets for ordering catalog fetches.
//!
//! Every load takes a ticket before it starts fetching. Tickets are
//! monotonically increasing across the store, so a result can be compared
//! against whatever was installed (or invalidated) since it was requested.

use std::sync::atomic::{AtomicU64, Ordering};

/// Position of a load request in the store's issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadTicket(u64);

impl LoadTicket {
    /// Ticket older than any issued one.
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn sequence(&self) -> u64 {
        self.0
    }

    /// Check if this ticket was issued after another.
    pub fn is_newer_than(&self, other: &LoadTicket) -> bool {
        self.0 > other.0
    }
}

/// Monotonic ticket source.
#[derive(Debug, Default)]
pub struct TicketDispenser {
    last: AtomicU64,
}

impl TicketDispenser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket.
    pub fn issue(&self) -> LoadTicket {
        LoadTicket(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Most recently issued ticket, or zero if none was issued.
    pub fn last_issued(&self) -> LoadTicket {
        LoadTicket(self.last.load(Ordering::SeqCst))
    }
}
