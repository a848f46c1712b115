//! Port interfaces for the application layer
//!
//! Ports define the contract between use cases and infrastructure
//! implementations, keeping the reconciliation logic independent of
//! reqwest and the concrete key-value store.

pub mod kv_store;
pub mod votes_api;

pub use kv_store::KvStore;
pub use votes_api::VotesApi;
