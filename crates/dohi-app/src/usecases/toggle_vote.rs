//! Use case for casting or retracting a vote with optimistic UI state

use std::sync::Arc;

use tracing::{debug, info_span, warn, Instrument};

use dohi_core::error::ApiError;
use dohi_core::ports::{KvStore, VotesApi};
use dohi_core::report::ReportId;
use dohi_core::vote::{storage_key, StoreOp, VoteCall, VoteDirection, VoteState};

use crate::ledger::VoteLedger;

/// Result of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The transition was applied and committed; the new state.
    Applied(VoteState),

    /// Nothing happened: the press was a direct switch (un-vote
    /// first), another toggle is in flight for this report, or the
    /// report was never seeded. No network call was made.
    Ignored,
}

/// Use case for toggling a vote on a report.
///
/// ## Behavior
/// - Plans the transition with the pure vote state machine
/// - Applies the optimistic state to the ledger synchronously, before
///   the network suspension point
/// - Issues exactly one network call per applied transition
/// - On success persists the `vote:{id}` token; on failure restores
///   the exact pre-transition entry and returns the error untouched
///   so the caller can branch on its kind
pub struct ToggleVote {
    api: Arc<dyn VotesApi>,
    store: Arc<dyn KvStore>,
    ledger: Arc<VoteLedger>,
}

impl ToggleVote {
    pub fn new(api: Arc<dyn VotesApi>, store: Arc<dyn KvStore>, ledger: Arc<VoteLedger>) -> Self {
        Self { api, store, ledger }
    }

    /// Execute the use case.
    ///
    /// The per-report in-flight flag doubles as the busy guard: a
    /// second press while a request is pending is ignored rather than
    /// racing the first one's rollback.
    pub async fn execute(
        &self,
        report_id: ReportId,
        wanted: VoteDirection,
    ) -> Result<ToggleOutcome, ApiError> {
        let span = info_span!("usecase.toggle_vote", report_id, ?wanted);

        async {
            // Reserve the entry and apply the optimistic state in one
            // critical section, so the UI sees the new counts before
            // the request leaves.
            let reserved = self
                .ledger
                .with_entries(|entries| {
                    let entry = entries.get_mut(&report_id)?;
                    if entry.in_flight {
                        debug!("toggle ignored: request already in flight");
                        return None;
                    }
                    let plan = match entry.state.plan(wanted) {
                        Some(plan) => plan,
                        None => {
                            debug!("toggle ignored: direct switch, un-vote first");
                            return None;
                        }
                    };
                    let previous = entry.state;
                    entry.state = plan.next;
                    entry.in_flight = true;
                    Some((previous, plan))
                })
                .await;

            let Some((previous, plan)) = reserved else {
                return Ok(ToggleOutcome::Ignored);
            };

            let result = match plan.call {
                VoteCall::Cast { useful } => self.api.cast_vote(report_id, useful).await,
                VoteCall::Retract => self.api.retract_vote(report_id).await,
            };

            match result {
                Ok(()) => {
                    self.persist(report_id, plan.store).await;
                    self.ledger
                        .with_entries(|entries| {
                            if let Some(entry) = entries.get_mut(&report_id) {
                                entry.in_flight = false;
                            }
                        })
                        .await;
                    Ok(ToggleOutcome::Applied(plan.next))
                }
                Err(err) => {
                    // Full rollback: choice and both counters return to
                    // their exact pre-transition values.
                    self.ledger
                        .with_entries(|entries| {
                            if let Some(entry) = entries.get_mut(&report_id) {
                                entry.state = previous;
                                entry.in_flight = false;
                            }
                        })
                        .await;
                    warn!(error = %err, "vote call failed, state rolled back");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Best-effort persistence; a failed local write only costs the
    /// choice its reload survival, never the committed server state.
    async fn persist(&self, report_id: ReportId, op: StoreOp) {
        let key = storage_key(report_id);
        let result = match op {
            StoreOp::Put(token) => self.store.set(&key, token).await,
            StoreOp::Remove => self.store.remove(&key).await,
        };
        if let Err(err) = result {
            warn!(error = %err, %key, "vote token write failed");
        }
    }
}
