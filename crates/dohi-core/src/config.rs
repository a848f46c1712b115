//! Client configuration domain model

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable naming the API root (without `/api`).
pub const API_BASE_ENV: &str = "DOHI_API_BASE";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root without the `/api` prefix and without a trailing slash
    pub base_url: String,

    /// Whole-request timeout; elapsing surfaces as `ApiError::Timeout`
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base(&base_url.into()),
            ..Self::default()
        }
    }

    /// Build from the environment, falling back to the local backend.
    pub fn from_env() -> Self {
        let base = std::env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

fn trim_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(de)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slashes_are_trimmed() {
        let config = ApiConfig::new("https://dohi.example.com///");
        assert_eq!(config.base_url, "https://dohi.example.com");
    }

    #[test]
    fn test_default_points_at_local_backend() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(20));
    }
}
