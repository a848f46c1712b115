//! Report domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::case::CaseId;
use crate::vote::VoteCounts;

/// Backend-assigned report identifier.
pub type ReportId = u64;

/// Moderation status of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    InReview,
    Validated,
    Rejected,
}

impl ReportStatus {
    /// User-facing label (the product ships in French).
    pub fn label(self) -> &'static str {
        match self {
            Self::InReview => "En examen",
            Self::Validated => "Validé",
            Self::Rejected => "Refusé",
        }
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        Self::InReview
    }
}

fn in_review() -> ReportStatus {
    ReportStatus::InReview
}

/// A scam report as served by `GET /reports/{id}`.
///
/// The backend has renamed its vote columns over time; serde aliases
/// cover the legacy spellings so older rows deserialize unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "type", default)]
    pub scam_type: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default = "in_review", deserialize_with = "lenient_status")]
    pub status: ReportStatus,

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

    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Unknown or absent statuses read as `in_review`, matching the front
/// end's fallback.
fn lenient_status<'de, D>(de: D) -> Result<ReportStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    Ok(match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("validated") => ReportStatus::Validated,
        Some("rejected") => ReportStatus::Rejected,
        _ => ReportStatus::InReview,
    })
}

impl Report {
    /// The aggregate counters as vote-domain counts.
    pub fn counts(&self) -> VoteCounts {
        VoteCounts::new(self.useful_count, self.not_useful_count)
    }
}

/// `GET /reports/{id}` wraps the report in an envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportEnvelope {
    pub report: Report,
}

/// A comment on a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,

    #[serde(default)]
    pub author: Option<String>,

    pub body: String,

    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for `POST /reports/{id}/comments`.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub body: String,
}

/// Body for `POST /reports`. Submissions always start public and
/// `in_review`, matching the submission wizard.
#[derive(Debug, Clone, Serialize)]
pub struct NewReport {
    pub case_id: CaseId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub scam_type: String,
    pub category: String,
    pub is_public: bool,
    pub status: ReportStatus,
}

impl NewReport {
    pub fn new(
        case_id: CaseId,
        title: impl Into<String>,
        description: impl Into<String>,
        scam_type: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            case_id,
            title: title.into().trim().to_owned(),
            description: description.into().trim().to_owned(),
            scam_type: scam_type.into(),
            category: category.into(),
            is_public: true,
            status: ReportStatus::InReview,
        }
    }
}

/// `POST /reports` response. The backend has answered with each of
/// these id spellings at some point.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedReport {
    #[serde(default)]
    id: Option<ReportId>,

    #[serde(rename = "report_id", default)]
    legacy_id: Option<ReportId>,

    #[serde(default)]
    report: Option<CreatedReportInner>,
}

#[derive(Debug, Clone, Deserialize)]
struct CreatedReportInner {
    id: ReportId,
}

impl CreatedReport {
    pub fn report_id(&self) -> Option<ReportId> {
        self.id
            .or(self.legacy_id)
            .or(self.report.as_ref().map(|r| r.id))
    }
}

/// One evidence attachment for `POST /reports/{id}/evidence`.
#[derive(Debug, Clone)]
pub struct EvidenceFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_count_aliases() {
        let report: Report = serde_json::from_str(
            r#"{"id": 42, "upvotes_count": 7, "downvotes": 2, "status": "validated"}"#,
        )
        .unwrap();

        assert_eq!(report.useful_count, 7);
        assert_eq!(report.not_useful_count, 2);
        assert_eq!(report.status, ReportStatus::Validated);
        assert_eq!(report.counts(), VoteCounts::new(7, 2));
    }

    #[test]
    fn test_unknown_status_falls_back_to_in_review() {
        let report: Report =
            serde_json::from_str(r#"{"id": 1, "status": "weird-new-state"}"#).unwrap();
        assert_eq!(report.status, ReportStatus::InReview);

        let report: Report = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(report.status, ReportStatus::InReview);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ReportStatus::InReview.label(), "En examen");
        assert_eq!(ReportStatus::Validated.label(), "Validé");
        assert_eq!(ReportStatus::Rejected.label(), "Refusé");
    }

    #[test]
    fn test_new_report_trims_and_defaults() {
        let report = NewReport::new(5, "  06 12 34 56 78 ", " Rappel insistant.\n", "Téléphone", "Autre");
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["case_id"], 5);
        assert_eq!(value["title"], "06 12 34 56 78");
        assert_eq!(value["description"], "Rappel insistant.");
        assert_eq!(value["type"], "Téléphone");
        assert_eq!(value["is_public"], true);
        assert_eq!(value["status"], "in_review");
    }

    #[test]
    fn test_created_report_id_spellings() {
        let created: CreatedReport =
            serde_json::from_str(r#"{"id": 7, "report": {"id": 9}}"#).unwrap();
        assert_eq!(created.report_id(), Some(7));

        let created: CreatedReport = serde_json::from_str(r#"{"report_id": 8}"#).unwrap();
        assert_eq!(created.report_id(), Some(8));

        let created: CreatedReport = serde_json::from_str(r#"{"report": {"id": 9}}"#).unwrap();
        assert_eq!(created.report_id(), Some(9));

        let created: CreatedReport = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert_eq!(created.report_id(), None);
    }

    #[test]
    fn test_envelope_unwraps() {
        let envelope: ReportEnvelope =
            serde_json::from_str(r#"{"report": {"id": 9, "usefulCount": 1}}"#).unwrap();
        assert_eq!(envelope.report.id, 9);
        assert_eq!(envelope.report.useful_count, 1);
    }
}
