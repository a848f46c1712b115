//! # dohi-infra
//!
//! Infrastructure adapters for the DOHI client: the reqwest transport
//! with the WAF-cookie retry, the HTTP implementations of the core
//! ports, and the key-value stores behind [`dohi_core::ports::KvStore`].

pub mod config;
pub mod http;
pub mod store;

pub use http::auth::AuthClient;
pub use http::feed::FeedClient;
pub use http::kyc::KycClient;
pub use http::notifications::NotificationsClient;
pub use http::reports::ReportsClient;
pub use http::transport::HttpTransport;
pub use store::file::FileKvStore;
pub use store::memory::MemoryKvStore;
