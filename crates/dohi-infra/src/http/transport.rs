//! Shared reqwest transport for the DOHI API
//!
//! Every request goes through here: JSON headers, the bearer token
//! sourced from the key-value store, a single forced `/api/` path
//! prefix, and the workaround for the hosting provider's WAF, which
//! answers a 307 challenge that sets a cookie the retried request must
//! present.

use std::sync::Arc;

use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{multipart, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use dohi_core::auth::TOKEN_KEY;
use dohi_core::error::ApiError;
use dohi_core::ports::KvStore;
use dohi_core::ApiConfig;

pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn KvStore>,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig, store: Arc<dyn KvStore>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .cookie_store(true)
            // The WAF's 307 must not be followed blindly; the retry
            // below re-sends with the challenge cookie from the jar.
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ApiError::Network(format!("building HTTP client failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            store,
        })
    }

    /// Force exactly one `/api/` prefix, whatever the caller passed.
    fn api_path(path: &str) -> String {
        if path == "/api" || path.starts_with("/api/") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("/api{}", path)
        } else {
            format!("/api/{}", path)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, Self::api_path(path))
    }

    async fn bearer(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY).await {
            Ok(token) => token,
            Err(err) => {
                warn!("token read failed, sending unauthenticated: {}", err);
                None
            }
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        token: Option<&str>,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Response, ApiError> {
        let mut request = self.http.request(method.clone(), url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        debug!("{} {}", method, url);
        request.send().await.map_err(map_transport_error)
    }

    /// Issue a request, retrying once when the WAF answers its 307
    /// challenge (the cookie jar now holds the challenge cookie).
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, ApiError> {
        self.send_with_query(method, path, &[], body).await
    }

    pub async fn send_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let token = self.bearer().await;

        let mut response = self
            .send_once(&method, &url, token.as_deref(), query, body)
            .await?;
        if response.status() == StatusCode::TEMPORARY_REDIRECT {
            warn!("WAF challenge (307) on {}, retrying with cookie", url);
            response = self
                .send_once(&method, &url, token.as_deref(), query, body)
                .await?;
        }

        check_status(response).await
    }

    async fn send_multipart_once(
        &self,
        url: &str,
        token: Option<&str>,
        form: multipart::Form,
    ) -> Result<Response, ApiError> {
        let mut request = self.http.post(url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        debug!("POST {} (multipart)", url);
        request
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)
    }

    /// Multipart POST with the same 307 retry as `send`. The form is
    /// rebuilt per attempt because a consumed form cannot be resent.
    pub async fn post_multipart(
        &self,
        path: &str,
        form: impl Fn() -> Result<multipart::Form, ApiError>,
    ) -> Result<(), ApiError> {
        let url = self.url(path);
        let token = self.bearer().await;

        let mut response = self
            .send_multipart_once(&url, token.as_deref(), form()?)
            .await?;
        if response.status() == StatusCode::TEMPORARY_REDIRECT {
            warn!("WAF challenge (307) on {}, retrying with cookie", url);
            response = self
                .send_multipart_once(&url, token.as_deref(), form()?)
                .await?;
        }

        check_status(response).await.map(drop)
    }

    pub async fn get_value(&self, path: &str) -> Result<Value, ApiError> {
        decode(self.send(Method::GET, path, None).await?).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode(self.send(Method::GET, path, None).await?).await
    }

    /// GET with url-encoded query pairs (free-text search parameters).
    pub async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        decode(self.send_with_query(Method::GET, path, query, None).await?).await
    }

    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let body = to_value(body)?;
        decode(self.send(Method::POST, path, Some(&body)).await?).await
    }

    /// POST where the response body does not matter (vote casts, marks).
    pub async fn post_unit(&self, path: &str, body: Option<&Value>) -> Result<(), ApiError> {
        self.send(Method::POST, path, body).await.map(drop)
    }

    pub async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let body = to_value(body)?;
        decode(self.send(Method::PUT, path, Some(&body)).await?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None).await.map(drop)
    }
}

fn to_value(body: &impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(error.to_string())
    }
}

/// Pass 2xx through, classify everything else.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Laravel error bodies carry a `message`; fall back to the status
    // line when they don't.
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| status.to_string());

    Err(map_status_code(status, message))
}

fn map_status_code(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::CONFLICT => ApiError::Conflict(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ApiError::Timeout,
        _ if status.is_server_error() => {
            ApiError::Network(format!("server error {}: {}", status.as_u16(), message))
        }
        _ => ApiError::UnexpectedStatus(status.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryKvStore;
    use mockito::Server;

    async fn transport(server: &Server) -> (HttpTransport, Arc<MemoryKvStore>) {
        let store = Arc::new(MemoryKvStore::new());
        let config = ApiConfig::new(server.url());
        (
            HttpTransport::new(&config, store.clone()).unwrap(),
            store,
        )
    }

    #[test]
    fn test_api_prefix_is_forced_once() {
        assert_eq!(HttpTransport::api_path("/reports/1"), "/api/reports/1");
        assert_eq!(HttpTransport::api_path("reports/1"), "/api/reports/1");
        assert_eq!(HttpTransport::api_path("/api/reports/1"), "/api/reports/1");
        assert_eq!(HttpTransport::api_path("/feed?page=2"), "/api/feed?page=2");
    }

    #[tokio::test]
    async fn test_bearer_header_sent_when_token_stored() {
        let mut server = Server::new_async().await;
        let (transport, store) = transport(&server).await;
        store.set("token", "sesame").await.unwrap();

        let mock = server
            .mock("GET", "/api/me")
            .match_header("authorization", "Bearer sesame")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let value = transport.get_value("/me").await.unwrap();
        mock.assert_async().await;
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_missing_token_sends_unauthenticated() {
        let mut server = Server::new_async().await;
        let (transport, _store) = transport(&server).await;

        let mock = server
            .mock("GET", "/api/ping")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        transport.get_value("/ping").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_waf_307_is_retried_exactly_once() {
        let mut server = Server::new_async().await;
        let (transport, _store) = transport(&server).await;

        let challenge = server
            .mock("GET", "/api/feed")
            .match_header("cookie", mockito::Matcher::Missing)
            .with_status(307)
            .with_header("set-cookie", "o2s-chl=abc; Path=/")
            .with_header("location", "/api/feed")
            .create_async()
            .await;
        let accepted = server
            .mock("GET", "/api/feed")
            .match_header("cookie", mockito::Matcher::Regex("o2s-chl=abc".into()))
            .with_status(200)
            .with_body(r#"{"items": []}"#)
            .create_async()
            .await;

        let value = transport.get_value("/feed").await.unwrap();
        challenge.assert_async().await;
        accepted.assert_async().await;
        assert!(value["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persistent_307_surfaces_as_error() {
        let mut server = Server::new_async().await;
        let (transport, _store) = transport(&server).await;

        let mock = server
            .mock("GET", "/api/feed")
            .with_status(307)
            .expect(2)
            .create_async()
            .await;

        let err = transport.get_value("/feed").await.unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, ApiError::UnexpectedStatus(307)));
    }

    #[tokio::test]
    async fn test_status_classification() {
        for (status, check) in [
            (401, ApiError::is_auth as fn(&ApiError) -> bool),
            (403, ApiError::is_auth),
            (409, ApiError::is_conflict),
            (500, ApiError::is_network),
        ] {
            let mut server = Server::new_async().await;
            let (transport, _store) = transport(&server).await;
            let mock = server
                .mock("GET", "/api/me")
                .with_status(status)
                .with_body(r#"{"message": "nope"}"#)
                .create_async()
                .await;

            let err = transport.get_value("/me").await.unwrap_err();
            assert!(check(&err), "status {} mapped to {:?}", status, err);
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_error_message_taken_from_body() {
        let mut server = Server::new_async().await;
        let (transport, _store) = transport(&server).await;

        let _mock = server
            .mock("GET", "/api/reports/9")
            .with_status(404)
            .with_body(r#"{"message": "report gone"}"#)
            .create_async()
            .await;

        match transport.get_value("/reports/9").await.unwrap_err() {
            ApiError::NotFound(message) => assert_eq!(message, "report gone"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
