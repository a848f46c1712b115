//! Shared vote ledger
//!
//! One entry per report, holding the locally mirrored [`VoteState`]
//! plus the per-item in-flight flag that serializes toggles. The UI
//! reads this ledger; the use cases are its only writers.

use std::collections::HashMap;

use tokio::sync::Mutex;

use dohi_core::report::ReportId;
use dohi_core::vote::VoteState;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    pub state: VoteState,
    pub in_flight: bool,
}

/// In-memory vote state per report.
#[derive(Debug, Default)]
pub struct VoteLedger {
    entries: Mutex<HashMap<ReportId, Entry>>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a report, if it has been seeded.
    pub async fn state_of(&self, report_id: ReportId) -> Option<VoteState> {
        self.entries.lock().await.get(&report_id).map(|e| e.state)
    }

    /// Install (or replace) a report's state. Clears any stale
    /// in-flight flag; seeding happens outside a toggle.
    pub async fn seed(&self, report_id: ReportId, state: VoteState) {
        self.entries.lock().await.insert(
            report_id,
            Entry {
                state,
                in_flight: false,
            },
        );
    }

    pub(crate) async fn with_entries<R>(
        &self,
        f: impl FnOnce(&mut HashMap<ReportId, Entry>) -> R,
    ) -> R {
        f(&mut *self.entries.lock().await)
    }
}
