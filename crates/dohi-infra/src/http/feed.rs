//! Feed and discover endpoints

use std::sync::Arc;

use dohi_core::error::ApiError;
use dohi_core::feed::{FeedItem, FeedPage};

use super::transport::HttpTransport;

pub struct FeedClient {
    transport: Arc<HttpTransport>,
}

impl FeedClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// `GET /feed?page=…`, normalized whatever shape the backend picks.
    pub async fn feed(&self, page: u64) -> Result<FeedPage, ApiError> {
        let payload = self
            .transport
            .get_value(&format!("/feed?page={}", page))
            .await?;
        FeedPage::from_payload(payload).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `GET /discover` — unpaginated grid rows.
    pub async fn discover(&self) -> Result<Vec<FeedItem>, ApiError> {
        let payload = self.transport.get_value("/discover").await?;
        FeedPage::items_from_payload(payload).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
