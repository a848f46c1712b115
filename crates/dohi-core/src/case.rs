//! Case (dossier) domain model
//!
//! Every report belongs to a case describing the reported entity. The
//! submission wizard first searches existing cases with `precheck`,
//! then opens a new case when nothing matches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report::ReportId;

/// Backend-assigned case identifier.
pub type CaseId = u64;

/// What kind of entity a case is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Phone,
    Person,
    Company,
}

/// The entity block of a case creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CaseEntity {
    pub name: String,
    pub kind: EntityKind,
    pub phone: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl Default for RiskLevel {
    fn default() -> Self {
        Self::Medium
    }
}

/// Body for `POST /cases`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCase {
    pub entity: CaseEntity,
    pub category: String,
    pub summary: Option<String>,
    pub risk_level: RiskLevel,
}

/// `POST /cases` response. The id arrives wrapped in a `case` object
/// or bare, depending on the backend version.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedCase {
    #[serde(default)]
    id: Option<CaseId>,

    #[serde(default)]
    case: Option<CreatedCaseInner>,
}

#[derive(Debug, Clone, Deserialize)]
struct CreatedCaseInner {
    id: CaseId,
}

impl CreatedCase {
    /// The wrapped id wins over the bare one.
    pub fn case_id(&self) -> Option<CaseId> {
        self.case.as_ref().map(|c| c.id).or(self.id)
    }
}

/// One match from `GET /cases/precheck`.
#[derive(Debug, Clone, Deserialize)]
pub struct PrecheckMatch {
    #[serde(default)]
    pub id: Option<CaseId>,

    #[serde(rename = "reportId", default)]
    pub report_id: Option<ReportId>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(rename = "entityName", default)]
    pub entity_name: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// `GET /cases/precheck` envelope; a missing list reads as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrecheckPage {
    #[serde(default)]
    pub items: Vec<PrecheckMatch>,
}
