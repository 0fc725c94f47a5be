//! Core types and pure logic shared by the API client and the views

pub mod cache;
pub mod config;
pub mod currency;
pub mod dashboard;
pub mod envelope;
pub mod format;
pub mod log;
pub mod models;
pub mod seo;
pub mod share;
pub mod validate;

// Re-export main types for cleaner imports
pub use currency::{CurrencyTable, to_usd};
pub use dashboard::DashboardApi;
pub use envelope::{ApiEnvelope, ApiError};
pub use validate::validate_industry_id;
