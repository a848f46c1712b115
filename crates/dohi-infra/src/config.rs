//! Environment-backed configuration loading

use dohi_core::ApiConfig;

/// Load `.env` (if present) and build the client configuration from
/// `DOHI_API_BASE`.
pub fn api_config_from_env() -> ApiConfig {
    // Missing .env files are the normal production case.
    let _ = dotenvy::dotenv();
    ApiConfig::from_env()
}
