//! Notification models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user notification as listed by `GET /notifications`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,

    #[serde(default)]
    pub kind: Option<String>,

    /// Kind-specific payload (report id, comment excerpt, …)
    #[serde(default)]
    pub data: serde_json::Value,

    #[serde(default)]
    pub read: bool,

    #[serde(rename = "readAt", default)]
    pub read_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A page of notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationPage {
    #[serde(default)]
    pub items: Vec<Notification>,

    #[serde(default)]
    pub page: u64,

    #[serde(default)]
    pub total: u64,
}

/// Listing filter for `GET /notifications?only=…`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationFilter {
    All,
    Unread,
}

impl NotificationFilter {
    pub fn query_value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Unread => "unread",
        }
    }
}

/// Body for `POST /notifications/read` and `/notifications/unread`.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationIds {
    pub ids: Vec<u64>,
}
