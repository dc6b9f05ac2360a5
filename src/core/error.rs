use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while pricing, numbering or building a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PricebookError {
    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// Reference number sequencing error.
    #[error("numbering error: {0}")]
    Numbering(String),

    /// The requested price list does not exist.
    #[error("unknown sales type {0}")]
    UnknownSalesType(i64),

    /// No fiscal year covers the document date, so no reference can be issued.
    #[error("no fiscal year covers {0}")]
    NoFiscalYear(NaiveDate),

    /// An amount overflowed the decimal range, or a tax divisor was zero.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// A reference-data lookup (customer, branch, stock item) found nothing.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "lines[2].quantity").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
