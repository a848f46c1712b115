//! KYC endpoints

use std::sync::Arc;

use dohi_core::error::ApiError;
use dohi_core::kyc::{KycState, KycSubmission};

use super::transport::HttpTransport;

pub struct KycClient {
    transport: Arc<HttpTransport>,
}

impl KycClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// `GET /kyc`
    pub async fn status(&self) -> Result<KycState, ApiError> {
        self.transport.get_json("/kyc").await
    }

    /// `POST /kyc` — submit previously uploaded document ids.
    pub async fn submit(&self, submission: &KycSubmission) -> Result<KycState, ApiError> {
        self.transport.post_json("/kyc", submission).await
    }

    /// `DELETE /kyc` — withdraw a pending submission.
    pub async fn cancel(&self) -> Result<(), ApiError> {
        self.transport.delete("/kyc").await
    }
}
