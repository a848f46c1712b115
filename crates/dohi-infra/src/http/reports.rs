//! Report endpoints: the votes port implementation plus comments and
//! the caller's own reports.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use reqwest::multipart::{Form, Part};
use serde_json::json;

use dohi_core::case::{CaseId, CreatedCase, NewCase, PrecheckMatch, PrecheckPage};
use dohi_core::error::ApiError;
use dohi_core::ports::VotesApi;
use dohi_core::report::{
    Comment, CreatedReport, EvidenceFile, NewComment, NewReport, Report, ReportEnvelope, ReportId,
};

use super::transport::HttpTransport;

pub struct ReportsClient {
    transport: Arc<HttpTransport>,
}

impl ReportsClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// `GET /reports/{id}/comments`
    pub async fn comments(&self, id: ReportId) -> Result<Vec<Comment>, ApiError> {
        self.transport
            .get_json(&format!("/reports/{}/comments", id))
            .await
    }

    /// `POST /reports/{id}/comments`
    pub async fn add_comment(&self, id: ReportId, comment: &NewComment) -> Result<Comment, ApiError> {
        self.transport
            .post_json(&format!("/reports/{}/comments", id), comment)
            .await
    }

    /// `GET /me/reports` — the caller's own submissions.
    pub async fn my_reports(&self) -> Result<Vec<Report>, ApiError> {
        self.transport.get_json("/me/reports").await
    }

    /// `DELETE /reports/{id}`
    pub async fn delete_report(&self, id: ReportId) -> Result<(), ApiError> {
        self.transport.delete(&format!("/reports/{}", id)).await
    }

    /// `GET /cases/precheck?q=` — look up existing cases before
    /// opening a new one. A blank query skips the network entirely.
    pub async fn precheck(&self, query: &str) -> Result<Vec<PrecheckMatch>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let page: PrecheckPage = self
            .transport
            .get_json_query("/cases/precheck", &[("q", query)])
            .await?;
        Ok(page.items)
    }

    /// `POST /cases` — open a case for the reported entity.
    pub async fn create_case(&self, case: &NewCase) -> Result<CaseId, ApiError> {
        let created: CreatedCase = self.transport.post_json("/cases", case).await?;
        created
            .case_id()
            .ok_or_else(|| ApiError::Decode("case created without an id".into()))
    }

    /// `POST /reports` — create the report inside its case.
    pub async fn create_report(&self, report: &NewReport) -> Result<ReportId, ApiError> {
        info!("submitting report for case {}", report.case_id);
        let created: CreatedReport = self.transport.post_json("/reports", report).await?;
        created
            .report_id()
            .ok_or_else(|| ApiError::Decode("report created without an id".into()))
    }

    /// `POST /reports/{id}/evidence` — attach one file, multipart.
    ///
    /// The wizard uploads attachments one by one and keeps going when
    /// an upload fails, so each call stands on its own.
    pub async fn upload_evidence(&self, id: ReportId, file: &EvidenceFile) -> Result<(), ApiError> {
        info!("uploading evidence {} for report {}", file.file_name, id);
        self.transport
            .post_multipart(&format!("/reports/{}/evidence", id), || evidence_form(file))
            .await
    }
}

fn evidence_form(file: &EvidenceFile) -> Result<Form, ApiError> {
    let part = Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.mime)
        .map_err(|e| ApiError::Decode(format!("invalid mime {}: {}", file.mime, e)))?;
    Ok(Form::new().part("file", part))
}

#[async_trait]
impl VotesApi for ReportsClient {
    async fn fetch_report(&self, id: ReportId) -> Result<Report, ApiError> {
        let envelope: ReportEnvelope = self.transport.get_json(&format!("/reports/{}", id)).await?;
        Ok(envelope.report)
    }

    async fn cast_vote(&self, id: ReportId, useful: bool) -> Result<(), ApiError> {
        info!("casting vote on report {} (useful: {})", id, useful);
        self.transport
            .post_unit(&format!("/reports/{}/vote", id), Some(&json!({ "useful": useful })))
            .await
    }

    async fn retract_vote(&self, id: ReportId) -> Result<(), ApiError> {
        info!("retracting vote on report {}", id);
        self.transport
            .delete(&format!("/reports/{}/vote", id))
            .await
    }
}
