//! Vote domain models and state machine.

pub mod choice;
pub mod state;

pub use choice::{VoteChoice, VoteDirection};
pub use state::{StoreOp, VoteCall, VoteCounts, VotePlan, VoteState};

use crate::report::ReportId;

/// Local storage key for a report's persisted vote token.
///
/// Absence of the key means no vote; the value is the choice token
/// (`"u"` / `"n"`).
pub fn storage_key(report_id: ReportId) -> String {
    format!("vote:{}", report_id)
}
