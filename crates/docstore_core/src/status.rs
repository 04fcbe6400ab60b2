//! Request status bookkeeping.
//!
//! Each kind of remote operation has its own [`OperationStatus`] so that a
//! create finishing cannot hide a sync that is still outstanding, and a
//! late success cannot erase another flow's failure.

use std::fmt;

/// The kinds of remote operation whose progress is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Asking the authority to create a document.
    Create,
    /// Pushing dirty documents to the authority.
    Sync,
    /// Signing in.
    Auth,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Sync => "sync",
            Self::Auth => "auth",
        })
    }
}

/// Handle for one issued operation.
///
/// Returned when an operation starts and handed back when it settles.
/// The generation orders operations by issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "an operation ticket must be settled"]
pub struct OperationTicket {
    kind: OperationKind,
    generation: u64,
}

/// Progress of one kind of operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationStatus {
    in_flight: u32,
    /// Generation of the latest operation whose outcome was recorded.
    settled: u64,
    error: Option<String>,
}

impl OperationStatus {
    /// Returns true while at least one operation of this kind is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Number of outstanding operations of this kind.
    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    /// Error message of the latest recorded outcome, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn begin(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    /// Returns false when the outcome belongs to an operation older than one
    /// already recorded.
    fn settle(&mut self, generation: u64, error: Option<String>) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if generation < self.settled {
            return false;
        }
        self.settled = generation;
        self.error = error;
        true
    }
}

/// Status of every tracked operation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestStatus {
    create: OperationStatus,
    sync: OperationStatus,
    auth: OperationStatus,
    next_generation: u64,
    /// Generation that produced the error in each slot, for `error()`.
    create_error_at: u64,
    sync_error_at: u64,
    auth_error_at: u64,
}

impl RequestStatus {
    /// Creates an idle status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an operation of `kind` as started and clears that kind's error.
    pub fn begin(&mut self, kind: OperationKind) -> OperationTicket {
        self.next_generation += 1;
        self.slot_mut(kind).begin();
        OperationTicket {
            kind,
            generation: self.next_generation,
        }
    }

    /// Records how the operation behind `ticket` ended.
    ///
    /// Returns false when the outcome was superseded by a newer operation of
    /// the same kind that already settled; the status keeps the newer
    /// outcome in that case.
    pub fn settle(&mut self, ticket: OperationTicket, error: Option<String>) -> bool {
        let failed = error.is_some();
        let recorded = self.slot_mut(ticket.kind).settle(ticket.generation, error);
        if recorded && failed {
            *self.error_at_mut(ticket.kind) = ticket.generation;
        }
        recorded
    }

    /// Status of one operation kind.
    pub fn get(&self, kind: OperationKind) -> &OperationStatus {
        match kind {
            OperationKind::Create => &self.create,
            OperationKind::Sync => &self.sync,
            OperationKind::Auth => &self.auth,
        }
    }

    /// True while any operation is outstanding.
    pub fn is_loading(&self) -> bool {
        self.create.is_loading() || self.sync.is_loading() || self.auth.is_loading()
    }

    /// The error from the most recently issued operation that failed.
    pub fn error(&self) -> Option<&str> {
        [
            (self.create.error(), self.create_error_at),
            (self.sync.error(), self.sync_error_at),
            (self.auth.error(), self.auth_error_at),
        ]
        .into_iter()
        .filter_map(|(error, at)| error.map(|message| (message, at)))
        .max_by_key(|(_, at)| *at)
        .map(|(message, _)| message)
    }

    fn slot_mut(&mut self, kind: OperationKind) -> &mut OperationStatus {
        match kind {
            OperationKind::Create => &mut self.create,
            OperationKind::Sync => &mut self.sync,
            OperationKind::Auth => &mut self.auth,
        }
    }

    fn error_at_mut(&mut self, kind: OperationKind) -> &mut u64 {
        match kind {
            OperationKind::Create => &mut self.create_error_at,
            OperationKind::Sync => &mut self.sync_error_at,
            OperationKind::Auth => &mut self.auth_error_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_by_default() {
        let status = RequestStatus::new();
        assert!(!status.is_loading());
        assert_eq!(status.error(), None);
    }

    #[test]
    fn begin_and_settle() {
        let mut status = RequestStatus::new();
        let ticket = status.begin(OperationKind::Sync);
        assert!(status.is_loading());
        assert!(status.get(OperationKind::Sync).is_loading());
        assert!(!status.get(OperationKind::Create).is_loading());

        assert!(status.settle(ticket, Some("unavailable".into())));
        assert!(!status.is_loading());
        assert_eq!(status.error(), Some("unavailable"));
        assert_eq!(status.get(OperationKind::Sync).error(), Some("unavailable"));
    }

    #[test]
    fn starting_again_clears_that_kind_only() {
        let mut status = RequestStatus::new();
        let create = status.begin(OperationKind::Create);
        status.settle(create, Some("create failed".into()));
        let sync = status.begin(OperationKind::Sync);
        status.settle(sync, Some("sync failed".into()));

        let _retry = status.begin(OperationKind::Sync);
        assert_eq!(status.get(OperationKind::Sync).error(), None);
        assert_eq!(status.error(), Some("create failed"));
    }

    #[test]
    fn overlapping_flows_keep_loading_until_all_settle() {
        let mut status = RequestStatus::new();
        let create = status.begin(OperationKind::Create);
        let sync = status.begin(OperationKind::Sync);

        status.settle(sync, Some("offline".into()));
        assert!(status.is_loading(), "create still outstanding");

        status.settle(create, None);
        assert!(!status.is_loading());
        assert_eq!(status.error(), Some("offline"), "create success must not mask sync failure");
    }

    #[test]
    fn superseded_outcome_is_dropped() {
        let mut status = RequestStatus::new();
        let first = status.begin(OperationKind::Sync);
        let second = status.begin(OperationKind::Sync);
        assert_eq!(status.get(OperationKind::Sync).in_flight(), 2);

        assert!(status.settle(second, None));
        assert!(status.is_loading());

        assert!(!status.settle(first, Some("late failure".into())));
        assert!(!status.is_loading());
        assert_eq!(status.error(), None);
    }

    #[test]
    fn latest_issued_error_wins() {
        let mut status = RequestStatus::new();
        let sync = status.begin(OperationKind::Sync);
        let create = status.begin(OperationKind::Create);

        status.settle(create, Some("create failed".into()));
        status.settle(sync, Some("sync failed".into()));
        assert_eq!(status.error(), Some("create failed"));
    }

    #[test]
    fn kind_display() {
        assert_eq!(OperationKind::Sync.to_string(), "sync");
        assert_eq!(OperationKind::Create.to_string(), "create");
    }
}
