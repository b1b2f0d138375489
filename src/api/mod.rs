//! Typed client for the platform's REST backend.

mod client;
pub use client::ApiClient;

mod error;
pub use error::{ApiError, ApiResult, FALLBACK_MESSAGE};

mod auth;
mod certificates;
mod courses;
mod profile;
mod progress;
