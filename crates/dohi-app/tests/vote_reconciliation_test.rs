//! Reconciliation tests for the vote toggle use case: optimistic
//! application, commit, rollback, persistence and the busy guard.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{Mutex, Notify};

use dohi_app::{LoadVoteState, ToggleOutcome, ToggleVote, VoteLedger};
use dohi_core::error::ApiError;
use dohi_core::ports::{KvStore, VotesApi};
use dohi_core::report::{Report, ReportId};
use dohi_core::vote::{VoteChoice, VoteCounts, VoteState};

const REPORT: ReportId = 42;

struct MockVotesApi {
    cast_calls: AtomicUsize,
    retract_calls: AtomicUsize,
    cast_args: Mutex<Vec<bool>>,
    fail_with: Mutex<Option<ApiError>>,
    report: Mutex<Report>,
    /// When set, `cast_vote` blocks until notified.
    gate: Option<Arc<Notify>>,
}

impl MockVotesApi {
    fn new() -> Self {
        Self::with_report(report_json(10, 3))
    }

    fn with_report(report: Report) -> Self {
        Self {
            cast_calls: AtomicUsize::new(0),
            retract_calls: AtomicUsize::new(0),
            cast_args: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
            report: Mutex::new(report),
            gate: None,
        }
    }

    async fn fail_next_with(&self, err: ApiError) {
        *self.fail_with.lock().await = Some(err);
    }

    async fn take_failure(&self) -> Option<ApiError> {
        self.fail_with.lock().await.take()
    }

    fn casts(&self) -> usize {
        self.cast_calls.load(Ordering::SeqCst)
    }

    fn retracts(&self) -> usize {
        self.retract_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VotesApi for MockVotesApi {
    async fn fetch_report(&self, _id: ReportId) -> Result<Report, ApiError> {
        Ok(self.report.lock().await.clone())
    }

    async fn cast_vote(&self, _id: ReportId, useful: bool) -> Result<(), ApiError> {
        self.cast_calls.fetch_add(1, Ordering::SeqCst);
        self.cast_args.lock().await.push(useful);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.take_failure().await {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn retract_vote(&self, _id: ReportId) -> Result<(), ApiError> {
        self.retract_calls.fetch_add(1, Ordering::SeqCst);
        match self.take_failure().await {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

fn report_json(useful: u64, not_useful: u64) -> Report {
    serde_json::from_value(json!({
        "id": REPORT,
        "usefulCount": useful,
        "notUsefulCount": not_useful,
    }))
    .expect("report fixture")
}

struct Harness {
    api: Arc<MockVotesApi>,
    store: Arc<MemoryKvStore>,
    ledger: Arc<VoteLedger>,
    toggle: ToggleVote,
}

impl Harness {
    fn new(api: MockVotesApi) -> Self {
        let api = Arc::new(api);
        let store = Arc::new(MemoryKvStore::default());
        let ledger = Arc::new(VoteLedger::new());
        let toggle = ToggleVote::new(api.clone(), store.clone(), ledger.clone());
        Self {
            api,
            store,
            ledger,
            toggle,
        }
    }

    async fn seed(&self, choice: VoteChoice, useful: u64, not_useful: u64) {
        self.ledger
            .seed(REPORT, VoteState::new(choice, VoteCounts::new(useful, not_useful)))
            .await;
    }

    async fn state(&self) -> VoteState {
        self.ledger.state_of(REPORT).await.expect("seeded state")
    }

    async fn stored_token(&self) -> Option<String> {
        self.store.get("vote:42").await.unwrap()
    }
}

use dohi_core::vote::VoteDirection::{NotUseful, Useful};

#[tokio::test]
async fn scenario_a_casting_useful_commits_and_persists() {
    let h = Harness::new(MockVotesApi::new());
    h.seed(VoteChoice::None, 10, 3).await;

    let outcome = h.toggle.execute(REPORT, Useful).await.unwrap();

    assert_eq!(
        outcome,
        ToggleOutcome::Applied(VoteState::new(VoteChoice::Useful, VoteCounts::new(11, 3)))
    );
    assert_eq!(h.state().await.choice, VoteChoice::Useful);
    assert_eq!(h.stored_token().await.as_deref(), Some("u"));
    assert_eq!(h.api.casts(), 1);
    assert_eq!(*h.api.cast_args.lock().await, vec![true]);
}

#[tokio::test]
async fn scenario_b_reclick_retracts_and_removes_token() {
    let h = Harness::new(MockVotesApi::new());
    h.seed(VoteChoice::None, 10, 3).await;

    h.toggle.execute(REPORT, Useful).await.unwrap();
    let outcome = h.toggle.execute(REPORT, Useful).await.unwrap();

    assert_eq!(
        outcome,
        ToggleOutcome::Applied(VoteState::new(VoteChoice::None, VoteCounts::new(10, 3)))
    );
    assert_eq!(h.state().await, VoteState::new(VoteChoice::None, VoteCounts::new(10, 3)));
    assert_eq!(h.stored_token().await, None);
    assert_eq!(h.api.casts(), 1);
    assert_eq!(h.api.retracts(), 1);
}

#[tokio::test]
async fn scenario_c_network_failure_rolls_back_everything() {
    let h = Harness::new(MockVotesApi::new());
    h.seed(VoteChoice::None, 10, 3).await;
    h.api
        .fail_next_with(ApiError::Network("connection reset".into()))
        .await;

    let err = h.toggle.execute(REPORT, NotUseful).await.unwrap_err();

    assert!(err.is_network());
    // Exact pre-transition values, never a partially applied state.
    assert_eq!(h.state().await, VoteState::new(VoteChoice::None, VoteCounts::new(10, 3)));
    assert_eq!(h.stored_token().await, None);
    assert_eq!(h.api.casts(), 1);
}

#[tokio::test]
async fn rollback_restores_exact_counter_value() {
    let h = Harness::new(MockVotesApi::new());
    h.seed(VoteChoice::None, 5, 0).await;
    h.api.fail_next_with(ApiError::Timeout).await;

    let _ = h.toggle.execute(REPORT, Useful).await.unwrap_err();

    // 5 stays 5: not 4, not 6.
    assert_eq!(h.state().await.counts.useful, 5);
}

#[tokio::test]
async fn failed_retract_restores_previous_choice() {
    let h = Harness::new(MockVotesApi::new());
    h.seed(VoteChoice::Useful, 11, 3).await;
    h.api
        .fail_next_with(ApiError::Network("down".into()))
        .await;

    let err = h.toggle.execute(REPORT, Useful).await.unwrap_err();

    assert!(err.is_network());
    assert_eq!(
        h.state().await,
        VoteState::new(VoteChoice::Useful, VoteCounts::new(11, 3))
    );
    assert_eq!(h.api.retracts(), 1);
}

#[tokio::test]
async fn direct_switch_is_ignored_without_network_call() {
    let h = Harness::new(MockVotesApi::new());
    h.seed(VoteChoice::Useful, 11, 3).await;

    let outcome = h.toggle.execute(REPORT, NotUseful).await.unwrap();

    assert_eq!(outcome, ToggleOutcome::Ignored);
    assert_eq!(
        h.state().await,
        VoteState::new(VoteChoice::Useful, VoteCounts::new(11, 3))
    );
    assert_eq!(h.api.casts(), 0);
    assert_eq!(h.api.retracts(), 0);
}

#[tokio::test]
async fn unseeded_report_is_ignored() {
    let h = Harness::new(MockVotesApi::new());

    let outcome = h.toggle.execute(REPORT, Useful).await.unwrap();

    assert_eq!(outcome, ToggleOutcome::Ignored);
    assert_eq!(h.api.casts(), 0);
}

#[tokio::test]
async fn retract_never_drives_counter_negative() {
    // Inconsistent seed from external causes: vote recorded, counter 0.
    let h = Harness::new(MockVotesApi::new());
    h.seed(VoteChoice::Useful, 0, 2).await;

    let outcome = h.toggle.execute(REPORT, Useful).await.unwrap();

    assert_eq!(
        outcome,
        ToggleOutcome::Applied(VoteState::new(VoteChoice::None, VoteCounts::new(0, 2)))
    );
}

#[tokio::test]
async fn second_press_while_in_flight_is_ignored() {
    let gate = Arc::new(Notify::new());
    let mut api = MockVotesApi::new();
    api.gate = Some(gate.clone());

    let h = Harness::new(api);
    h.seed(VoteChoice::None, 10, 3).await;

    let toggle = Arc::new(ToggleVote::new(
        h.api.clone(),
        h.store.clone(),
        h.ledger.clone(),
    ));
    let first = tokio::spawn({
        let toggle = toggle.clone();
        async move { toggle.execute(REPORT, Useful).await }
    });

    // Let the first press reach the blocked network call.
    while h.api.casts() == 0 {
        tokio::task::yield_now().await;
    }

    let second = toggle.execute(REPORT, Useful).await.unwrap();
    assert_eq!(second, ToggleOutcome::Ignored);

    gate.notify_one();
    let first = first.await.unwrap().unwrap();
    assert_eq!(
        first,
        ToggleOutcome::Applied(VoteState::new(VoteChoice::Useful, VoteCounts::new(11, 3)))
    );
    assert_eq!(h.api.casts(), 1);
}

#[tokio::test]
async fn auth_failure_rolls_back_and_is_distinguishable() {
    let h = Harness::new(MockVotesApi::new());
    h.seed(VoteChoice::None, 10, 3).await;
    h.api
        .fail_next_with(ApiError::Auth("token expired".into()))
        .await;

    let err = h.toggle.execute(REPORT, Useful).await.unwrap_err();

    assert!(err.is_auth());
    assert_eq!(h.state().await.choice, VoteChoice::None);
}

#[tokio::test]
async fn load_seeds_from_aggregate_and_stored_token() {
    let h = Harness::new(MockVotesApi::new());
    h.store.set("vote:42", "u").await.unwrap();

    let load = LoadVoteState::new(h.api.clone(), h.store.clone(), h.ledger.clone());
    let report = load.execute(REPORT).await.unwrap();

    assert_eq!(report.id, REPORT);
    assert_eq!(
        h.state().await,
        VoteState::new(VoteChoice::Useful, VoteCounts::new(10, 3))
    );
}

#[tokio::test]
async fn conflict_rolls_back_then_resync_refetches_aggregate() {
    let h = Harness::new(MockVotesApi::new());
    h.seed(VoteChoice::None, 10, 3).await;
    h.api
        .fail_next_with(ApiError::Conflict("vote already recorded".into()))
        .await;

    let err = h.toggle.execute(REPORT, Useful).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(h.state().await, VoteState::new(VoteChoice::None, VoteCounts::new(10, 3)));

    // Caller-side resync: the server already counted our vote.
    *h.api.report.lock().await = report_json(11, 3);
    h.store.set("vote:42", "u").await.unwrap();

    let load = LoadVoteState::new(h.api.clone(), h.store.clone(), h.ledger.clone());
    load.execute(REPORT).await.unwrap();

    assert_eq!(
        h.state().await,
        VoteState::new(VoteChoice::Useful, VoteCounts::new(11, 3))
    );
}
