//! KYC (identity verification) models

use serde::{Deserialize, Serialize};

/// Verification state as reported by `GET /kyc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    Unverified,
    Pending,
    Approved,
    Rejected,
}

impl KycStatus {
    /// A pending submission can be withdrawn, a rejected one redone.
    pub fn can_submit(self) -> bool {
        matches!(self, Self::Unverified | Self::Rejected)
    }
}

impl Default for KycStatus {
    fn default() -> Self {
        Self::Unverified
    }
}

/// `GET /kyc` response; unknown statuses read as unverified.
#[derive(Debug, Clone, Deserialize)]
pub struct KycState {
    #[serde(default, deserialize_with = "lenient_kyc_status")]
    pub status: KycStatus,
}

fn lenient_kyc_status<'de, D>(de: D) -> Result<KycStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    Ok(match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("pending") => KycStatus::Pending,
        Some("approved") => KycStatus::Approved,
        Some("rejected") => KycStatus::Rejected,
        _ => KycStatus::Unverified,
    })
}

/// Body for `POST /kyc`.
#[derive(Debug, Clone, Serialize)]
pub struct KycSubmission {
    #[serde(rename = "documentType")]
    pub document_type: String,

    /// Upload ids returned by the evidence endpoint
    #[serde(rename = "documentIds")]
    pub document_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_reads_as_unverified() {
        let state: KycState = serde_json::from_str(r#"{"status": "???"}"#).unwrap();
        assert_eq!(state.status, KycStatus::Unverified);

        let state: KycState = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(state.status, KycStatus::Unverified);
    }

    #[test]
    fn test_submit_gate() {
        assert!(KycStatus::Unverified.can_submit());
        assert!(KycStatus::Rejected.can_submit());
        assert!(!KycStatus::Pending.can_submit());
        assert!(!KycStatus::Approved.can_submit());
    }
}
