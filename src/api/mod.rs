//! Async client for the ERP backend's REST API.
//!
//! Loads the reference data behind a [`PricingContext`](crate::core::PricingContext)
//! and stores built documents.
//!
//! # Example
//!
//! ```ignore
//! use pricebook::api::*;
//! use pricebook::core::*;
//!
//! let client = ApiClient::new(&ApiConfig::from_env()?)?;
//! let ctx = load_pricing_context(&client).await?;
//!
//! let line = ctx.line_for("WIDGET", 1, dec!(2))?;
//! let order = ctx
//!     .document_builder(DocumentKind::SalesOrder, today, 7, 3, None)?
//!     .add_line(line)
//!     .build()?;
//! let saved = submit_document(&client, &order).await?;
//! ```

mod client;
mod config;
mod error;
mod loader;
mod resource;
mod session;
mod submit;

pub use client::ApiClient;
pub use config::{ApiConfig, ConfigError, ENV_API_TIMEOUT_SECS, ENV_API_TOKEN, ENV_API_URL};
pub use error::ApiError;
pub use loader::{fetch_next_reference, load_pricing_context};
pub use resource::Resource;
pub use session::{MemoryTokenStore, Session, TOKEN_KEY, TokenStore};
pub use submit::{SubmittedDocument, delete_document, submit_document};
