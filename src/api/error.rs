use thiserror::Error;

use super::config::ConfigError;
use crate::core::PricebookError;

/// Errors from talking to the ERP backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Connection, timeout or body read failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered 401; the stored token has been cleared.
    #[error("not authenticated: session cleared")]
    Unauthorized,

    /// Any other non-success status. `message` is the backend's own message when it sent one.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pricebook(#[from] PricebookError),

    /// The header was saved but a later line failed. Nothing is rolled back.
    #[error(
        "document {reference} partially saved as {header_id}: {lines_created} of {lines_total} lines created ({source})"
    )]
    PartialSubmission {
        reference: String,
        header_id: i64,
        lines_created: usize,
        lines_total: usize,
        source: Box<ApiError>,
    },
}
