//! Request sequencing for last-request-wins updates.
//!
//! Cancellation is advisory: superseded operations still run to completion,
//! but their results carry a stale [`RequestId`] and are ignored.

use std::cell::Cell;

/// Identifier of an issued operation, increasing per sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues monotonically increasing [`RequestId`]s for one operation kind.
///
/// # Examples
/// ```
/// use waypost_core::RequestSequencer;
///
/// let routes = RequestSequencer::default();
/// let first = routes.issue();
/// let second = routes.issue();
/// assert!(second > first);
/// assert!(!routes.is_latest(first));
/// assert!(routes.is_latest(second));
/// ```
#[derive(Debug, Default)]
pub struct RequestSequencer {
    last: Cell<u64>,
}

impl RequestSequencer {
    /// Issue the next identifier, superseding every earlier one.
    pub fn issue(&self) -> RequestId {
        let next = self.last.get().saturating_add(1);
        self.last.set(next);
        RequestId(next)
    }

    /// Whether `id` is the most recently issued identifier.
    #[must_use]
    pub fn is_latest(&self, id: RequestId) -> bool {
        self.last.get() == id.0
    }
}
