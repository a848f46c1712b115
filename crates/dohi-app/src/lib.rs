//! # dohi-app
//!
//! Use cases for the DOHI client. The vote reconciler lives here: it
//! applies optimistic transitions to a shared ledger, issues the
//! network call through the [`dohi_core::ports::VotesApi`] port, and
//! rolls the ledger back when the call fails.

pub mod ledger;
pub mod usecases;

pub use ledger::VoteLedger;
pub use usecases::{LoadVoteState, ToggleOutcome, ToggleVote};
