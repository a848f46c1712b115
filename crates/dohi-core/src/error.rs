use thiserror::Error;

/// Failure taxonomy for calls against the DOHI API.
///
/// The reconciliation layer treats every variant identically (full
/// rollback of optimistic state); callers branch on the kind for
/// follow-up handling, e.g. re-authentication on [`ApiError::Auth`] or
/// an aggregate refetch on [`ApiError::Conflict`].
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request timed out before the server answered
    #[error("request timed out")]
    Timeout,

    /// No usable response reached the client
    #[error("network error: {0}")]
    Network(String),

    /// 401/403 — bearer token missing, expired or insufficient
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// 409 — the server's vote record disagrees with local state
    /// (e.g. casting a vote it already has)
    #[error("conflict: {0}")]
    Conflict(String),

    /// 404 — report or resource gone
    #[error("not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected shape
    #[error("decode error: {0}")]
    Decode(String),

    /// Any other non-success status
    #[error("unexpected status: {0}")]
    UnexpectedStatus(u16),
}

impl ApiError {
    /// The caller should send the user through the auth flow.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// The caller should refetch the authoritative aggregate to resync.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Transport-level failure with no server verdict.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_))
    }
}
