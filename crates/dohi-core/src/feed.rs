//! Feed and discover models, plus the payload normalization the
//! backend's uneven responses require.
//!
//! `/feed` and `/discover` sometimes answer a bare array and sometimes
//! `{ "items": [...], "page": …, "total": … }`; rows carry their
//! thumbnail under `thumb.url`, `thumb_url` or `image_url` depending on
//! age. Normalization flattens all of that into one shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::report::ReportId;

/// An id as the backend serializes it: a number, or a string that may
/// carry the historical `r-` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Num(u64),
    Str(String),
}

impl RawId {
    fn as_report_id(&self) -> Option<ReportId> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Str(s) => s.strip_prefix("r-").unwrap_or(s).parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumb {
    #[serde(default)]
    pub url: Option<String>,
}

/// One row of the feed or discover grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedItem {
    // The backend has used three id spellings; keep all and resolve
    // through `report_id()`.
    #[serde(rename = "reportId", default, skip_serializing_if = "Option::is_none")]
    pub report_id_field: Option<RawId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RawId>,

    #[serde(rename = "report_id", default, skip_serializing_if = "Option::is_none")]
    pub legacy_report_id: Option<RawId>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub excerpt: Option<String>,

    #[serde(default)]
    pub thumb: Option<Thumb>,

    #[serde(default)]
    pub thumb_url: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub cover: Option<String>,

    #[serde(rename = "usefulCount", alias = "upvotes_count", alias = "upvotes", default)]
    pub useful_count: u64,

    #[serde(
        rename = "notUsefulCount",
        alias = "downvotes_count",
        alias = "downvotes",
        default
    )]
    pub not_useful_count: u64,

    #[serde(rename = "commentsCount", default)]
    pub comments_count: u64,
}

impl FeedItem {
    /// Resolve the report id across the three historical spellings.
    pub fn report_id(&self) -> Option<ReportId> {
        self.report_id_field
            .as_ref()
            .or(self.id.as_ref())
            .or(self.legacy_report_id.as_ref())
            .and_then(RawId::as_report_id)
    }

    /// Backfill `cover` and `image_url` from whichever thumbnail field
    /// the row actually carries.
    pub fn normalize(&mut self) {
        if self.cover.is_none() {
            self.cover = self
                .thumb
                .as_ref()
                .and_then(|t| t.url.clone())
                .or_else(|| self.thumb_url.clone())
                .or_else(|| self.image_url.clone());
        }
        if self.image_url.is_none() {
            self.image_url = self.cover.clone();
        }
    }
}

/// A page of feed items with pagination metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub items: Vec<FeedItem>,

    #[serde(default = "first_page")]
    pub page: u64,

    #[serde(default)]
    pub total: u64,
}

fn first_page() -> u64 {
    1
}

impl FeedPage {
    /// Normalize a feed-shaped payload: a bare array inflates to page 1
    /// with `total = items.len()`, an `{items, …}` object keeps its
    /// metadata. Every row gets its thumbnail fields backfilled.
    pub fn from_payload(payload: Value) -> Result<Self, serde_json::Error> {
        let mut page: FeedPage = match payload {
            Value::Array(rows) => {
                let items: Vec<FeedItem> = serde_json::from_value(Value::Array(rows))?;
                FeedPage {
                    total: items.len() as u64,
                    page: 1,
                    items,
                }
            }
            other => serde_json::from_value(other)?,
        };
        for item in &mut page.items {
            item.normalize();
        }
        Ok(page)
    }

    /// Discover answers the same row shape without pagination.
    pub fn items_from_payload(payload: Value) -> Result<Vec<FeedItem>, serde_json::Error> {
        Ok(Self::from_payload(payload)?.items)
    }
}
