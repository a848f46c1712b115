//! Auth endpoints and bearer-token lifecycle

use std::sync::Arc;

use log::{info, warn};

use dohi_core::auth::{Credentials, PasswordChange, Registration, Session, UserProfile, TOKEN_KEY};
use dohi_core::error::ApiError;
use dohi_core::ports::KvStore;

use super::transport::HttpTransport;

pub struct AuthClient {
    transport: Arc<HttpTransport>,
    store: Arc<dyn KvStore>,
}

impl AuthClient {
    pub fn new(transport: Arc<HttpTransport>, store: Arc<dyn KvStore>) -> Self {
        Self { transport, store }
    }

    /// `POST /login`; the returned token is persisted so subsequent
    /// requests authenticate.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let session: Session = self.transport.post_json("/login", credentials).await?;
        self.remember_token(&session.token).await;
        info!("logged in");
        Ok(session)
    }

    /// `POST /register`; registration logs the user straight in.
    pub async fn register(&self, registration: &Registration) -> Result<Session, ApiError> {
        let session: Session = self.transport.post_json("/register", registration).await?;
        self.remember_token(&session.token).await;
        Ok(session)
    }

    /// `POST /auth/logout`. The local token is dropped even when the
    /// server call fails; an expired token is not worth keeping.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.transport.post_unit("/auth/logout", None).await;
        if let Err(err) = self.store.remove(TOKEN_KEY).await {
            warn!("token removal failed: {}", err);
        }
        match result {
            Err(err) if !err.is_auth() => Err(err),
            _ => Ok(()),
        }
    }

    /// `POST /auth/change-password`
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        let body = serde_json::to_value(change).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.transport
            .post_unit("/auth/change-password", Some(&body))
            .await
    }

    /// `GET /me`
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.transport.get_json("/me").await
    }

    /// `PUT /me`
    pub async fn update_profile(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        self.transport.put_json("/me", profile).await
    }

    async fn remember_token(&self, token: &str) {
        if let Err(err) = self.store.set(TOKEN_KEY, token).await {
            warn!("token persistence failed, session is memory-only: {}", err);
        }
    }
}
