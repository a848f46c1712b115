//! HTTP adapters over the DOHI REST API

pub mod auth;
pub mod feed;
pub mod kyc;
pub mod notifications;
pub mod reports;
pub mod transport;
