//! # pricebook
//!
//! Pricing, tax and reference numbering for ERP sales documents: sales
//! orders, quotations, direct invoices and credit notes.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pricebook::core::*;
//! use rust_decimal_macros::dec;
//!
//! let lists = vec![
//!     SalesType { id: 1, name: "Retail".into(), tax_included: Some(false), factor: None },
//!     SalesType { id: 2, name: "Wholesale".into(), tax_included: Some(false), factor: Some(dec!(0.9)) },
//! ];
//! let retail_row = SalesPricing {
//!     stock_id: "A".into(),
//!     sales_type_id: 1,
//!     price_before_tax: Some(dec!(100)),
//!     price_after_tax: Some(dec!(115)),
//!     price: None,
//! };
//!
//! // No wholesale row: retail price times the wholesale factor.
//! let price = resolve_price("A", 2, &[retail_row], &lists, dec!(60)).unwrap();
//! assert_eq!(price.before, dec!(90));
//!
//! let fy = FiscalYear {
//!     id: 1,
//!     begin: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
//!     closed: false,
//! };
//! assert_eq!(next_reference(TransactionType::SalesOrder, &fy, &[]), "001/2025");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document types, price resolution, tax breakdown, numbering |
//! | `api` | Async REST client: reference-data loading and document submission |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "api")]
pub mod api;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
