//! Notification endpoints

use std::sync::Arc;

use dohi_core::error::ApiError;
use dohi_core::notification::{NotificationFilter, NotificationIds, NotificationPage};

use super::transport::HttpTransport;

pub struct NotificationsClient {
    transport: Arc<HttpTransport>,
}

impl NotificationsClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// `GET /notifications?page=…&pageSize=…&only=…`
    pub async fn list(
        &self,
        page: u64,
        page_size: u64,
        filter: NotificationFilter,
    ) -> Result<NotificationPage, ApiError> {
        self.transport
            .get_json(&format!(
                "/notifications?page={}&pageSize={}&only={}",
                page,
                page_size,
                filter.query_value()
            ))
            .await
    }

    /// `POST /notifications/read`
    pub async fn mark_read(&self, ids: Vec<u64>) -> Result<(), ApiError> {
        self.mark("/notifications/read", ids).await
    }

    /// `POST /notifications/unread`
    pub async fn mark_unread(&self, ids: Vec<u64>) -> Result<(), ApiError> {
        self.mark("/notifications/unread", ids).await
    }

    /// `POST /notifications/read-all`
    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.transport.post_unit("/notifications/read-all", None).await
    }

    async fn mark(&self, path: &str, ids: Vec<u64>) -> Result<(), ApiError> {
        let body = serde_json::to_value(NotificationIds { ids })
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.transport.post_unit(path, Some(&body)).await
    }
}
