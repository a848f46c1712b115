//! Use case for seeding (and resyncing) a report's vote state

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use dohi_core::error::ApiError;
use dohi_core::ports::{KvStore, VotesApi};
use dohi_core::report::{Report, ReportId};
use dohi_core::vote::{storage_key, VoteState};

use crate::ledger::VoteLedger;

/// Use case for loading a report's authoritative counters and the
/// locally persisted choice into the ledger.
///
/// Also the resync path after [`ApiError::Conflict`]: refetching the
/// aggregate replaces whatever stale state the ledger held.
pub struct LoadVoteState {
    api: Arc<dyn VotesApi>,
    store: Arc<dyn KvStore>,
    ledger: Arc<VoteLedger>,
}

impl LoadVoteState {
    pub fn new(api: Arc<dyn VotesApi>, store: Arc<dyn KvStore>, ledger: Arc<VoteLedger>) -> Self {
        Self { api, store, ledger }
    }

    /// Fetch the report and seed the ledger. Returns the report so the
    /// caller can render the rest of it.
    pub async fn execute(&self, report_id: ReportId) -> Result<Report, ApiError> {
        let span = info_span!("usecase.load_vote_state", report_id);

        async {
            let report = self.api.fetch_report(report_id).await?;

            // A missing or unreadable store only loses reload survival
            // of the choice; the counters stay authoritative.
            let token = match self.store.get(&storage_key(report_id)).await {
                Ok(token) => token,
                Err(err) => {
                    warn!(error = %err, "vote token read failed, assuming no vote");
                    None
                }
            };

            let state = VoteState::seeded(token.as_deref(), report.counts());
            self.ledger.seed(report_id, state).await;

            info!(choice = ?state.choice, "vote state seeded");
            Ok(report)
        }
        .instrument(span)
        .await
    }
}
