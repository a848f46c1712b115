use serde::{Deserialize, Serialize};

use super::choice::{VoteChoice, VoteDirection};

/// Server-authoritative vote aggregates, mirrored locally for display.
///
/// Counters are unsigned and all decrements saturate, so a stale local
/// mirror can never be driven negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteCounts {
    pub useful: u64,
    pub not_useful: u64,
}

impl VoteCounts {
    pub fn new(useful: u64, not_useful: u64) -> Self {
        Self { useful, not_useful }
    }

    fn incremented(self, direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Useful => Self {
                useful: self.useful + 1,
                ..self
            },
            VoteDirection::NotUseful => Self {
                not_useful: self.not_useful + 1,
                ..self
            },
        }
    }

    fn decremented(self, direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Useful => Self {
                useful: self.useful.saturating_sub(1),
                ..self
            },
            VoteDirection::NotUseful => Self {
                not_useful: self.not_useful.saturating_sub(1),
                ..self
            },
        }
    }
}

/// One user's vote state on one report.
///
/// Transitions (see [`VoteState::plan`]):
///
/// ```text
/// None ──press Useful──→ Useful      (POST vote {useful:true})
/// None ──press NotUseful──→ NotUseful (POST vote {useful:false})
/// Useful ──press Useful──→ None       (DELETE vote, re-click retracts)
/// NotUseful ──press NotUseful──→ None (DELETE vote)
/// Useful ──press NotUseful──→ ignored (un-vote first)
/// NotUseful ──press Useful──→ ignored
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteState {
    pub choice: VoteChoice,
    pub counts: VoteCounts,
}

/// The network effect a planned transition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteCall {
    /// `POST /reports/{id}/vote` with `{"useful": …}`
    Cast { useful: bool },

    /// `DELETE /reports/{id}/vote`
    Retract,
}

/// The persistence effect to apply once the network call commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// Write the choice token under `vote:{id}`
    Put(&'static str),

    /// Remove the `vote:{id}` key
    Remove,
}

/// A planned transition: the optimistic next state plus its effects.
///
/// The caller applies `next` synchronously, issues `call`, and on
/// success applies `store`. On failure it keeps the pre-transition
/// state untouched; there is nothing to partially undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotePlan {
    pub next: VoteState,
    pub call: VoteCall,
    pub store: StoreOp,
}

impl VoteState {
    pub fn new(choice: VoteChoice, counts: VoteCounts) -> Self {
        Self { choice, counts }
    }

    /// Seed a state from a stored token and the report's aggregates.
    pub fn seeded(token: Option<&str>, counts: VoteCounts) -> Self {
        Self::new(VoteChoice::from_token(token), counts)
    }

    /// Plan the transition for a button press in `wanted` direction.
    ///
    /// Returns `None` when the press is a no-op: pressing the opposite
    /// direction while a vote is active is ignored (the user must
    /// un-vote first), and no network call may be issued for it.
    pub fn plan(&self, wanted: VoteDirection) -> Option<VotePlan> {
        match self.choice.direction() {
            // No active vote: cast in the wanted direction.
            None => Some(VotePlan {
                next: Self::new(wanted.choice(), self.counts.incremented(wanted)),
                call: VoteCall::Cast {
                    useful: wanted.is_useful(),
                },
                store: StoreOp::Put(wanted.token()),
            }),

            // Re-click on the active direction: retract.
            Some(mine) if mine == wanted => Some(VotePlan {
                next: Self::new(VoteChoice::None, self.counts.decremented(mine)),
                call: VoteCall::Retract,
                store: StoreOp::Remove,
            }),

            // Direct switch is not supported.
            Some(_) => None,
        }
    }
}
