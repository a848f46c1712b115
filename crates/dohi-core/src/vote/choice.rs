use serde::{Deserialize, Serialize};

/// The caller's current vote on a report.
///
/// Exactly one variant is active per (user, report) pair; the server
/// enforces the same exclusivity with a unique vote record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    /// No vote cast
    None,

    /// Voted "useful"
    Useful,

    /// Voted "not useful"
    NotUseful,
}

/// The direction of a vote button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Useful,
    NotUseful,
}

impl VoteChoice {
    /// Storage token persisted under `vote:{id}`, or None for no vote.
    pub fn token(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Useful => Some("u"),
            Self::NotUseful => Some("n"),
        }
    }

    /// Rebuild a choice from a stored token. Unknown tokens read as no vote.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("u") => Self::Useful,
            Some("n") => Self::NotUseful,
            _ => Self::None,
        }
    }

    /// The direction this choice corresponds to, if any.
    pub fn direction(self) -> Option<VoteDirection> {
        match self {
            Self::None => None,
            Self::Useful => Some(VoteDirection::Useful),
            Self::NotUseful => Some(VoteDirection::NotUseful),
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

impl VoteDirection {
    /// Wire value for `POST /reports/{id}/vote` (`{"useful": …}`).
    pub fn is_useful(self) -> bool {
        self == Self::Useful
    }

    /// Storage token for a cast in this direction.
    pub fn token(self) -> &'static str {
        match self {
            Self::Useful => "u",
            Self::NotUseful => "n",
        }
    }

    /// The choice that casting in this direction produces.
    pub fn choice(self) -> VoteChoice {
        match self {
            Self::Useful => VoteChoice::Useful,
            Self::NotUseful => VoteChoice::NotUseful,
        }
    }
}

impl Default for VoteChoice {
    fn default() -> Self {
        Self::None
    }
}
