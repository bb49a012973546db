//! Registration API - HTTP transport for the registration service.
//!
//! Exposes add, list and search over a CSV-backed registration store,
//! with a global rate limit and request logging.

pub mod api;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::ApiError;
