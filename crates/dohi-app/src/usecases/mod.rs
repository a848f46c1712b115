//! Use cases

pub mod load_vote_state;
pub mod toggle_vote;

pub use load_vote_state::LoadVoteState;
pub use toggle_vote::{ToggleOutcome, ToggleVote};
