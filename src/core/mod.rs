//! Core document types, pricing, tax, numbering and line totals.
//!
//! Everything here is pure: no I/O, no global state. Reference data is passed
//! in by the caller or gathered in a [`PricingContext`].

mod builder;
mod context;
mod error;
pub mod format;
mod lines;
mod numbering;
mod pricing;
mod tax;
mod types;
mod validation;

pub use builder::*;
pub use context::*;
pub use error::*;
pub use format::format_amount;
pub use lines::*;
pub use numbering::*;
pub use pricing::*;
pub use tax::{UNKNOWN_TAX_NAME, compute_taxes, grand_total, items_for_group, tax_amount};
pub use types::*;
pub use validation::*;
