use async_trait::async_trait;

use crate::error::ApiError;
use crate::report::{Report, ReportId};

/// Votes port — the three report operations the reconciler consumes.
///
/// Errors stay typed ([`ApiError`]) rather than collapsing into
/// `anyhow`, because callers branch on the kind after a rollback
/// (re-authenticate on `Auth`, resync on `Conflict`).
#[async_trait]
pub trait VotesApi: Send + Sync {
    /// `GET /reports/{id}` — fetch the report with its authoritative
    /// aggregate counters.
    async fn fetch_report(&self, id: ReportId) -> Result<Report, ApiError>;

    /// `POST /reports/{id}/vote` with `{"useful": …}`.
    async fn cast_vote(&self, id: ReportId, useful: bool) -> Result<(), ApiError>;

    /// `DELETE /reports/{id}/vote` — retract the caller's vote record.
    async fn retract_vote(&self, id: ReportId) -> Result<(), ApiError>;
}
