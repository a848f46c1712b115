//! # dohi-core
//!
//! Core domain models and business logic for the DOHI scam-reporting client.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod auth;
pub mod case;
pub mod config;
pub mod error;
pub mod feed;
pub mod kyc;
pub mod notification;
pub mod ports;
pub mod report;
pub mod vote;

// Re-export commonly used types at the crate root
pub use config::ApiConfig;
pub use error::ApiError;
pub use report::{Report, ReportId, ReportStatus};
pub use vote::{StoreOp, VoteCall, VoteChoice, VoteCounts, VoteDirection, VotePlan, VoteState};
