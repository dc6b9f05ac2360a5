//! Unit price resolution for a stock item on a price list.
//!
//! Lookup order:
//! 1. the item's own row for the selected list
//! 2. on the Wholesale list, the Retail row scaled by the wholesale factor
//! 3. the item's base cost (scaled by the factor on Wholesale)
//!
//! A missing mapping never errors; callers can inspect [`PriceSource`]
//! to tell a real price from a fallback.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::PricebookError;
use super::tax::overflow;
use super::types::{SalesPricing, SalesType};

/// Where a resolved price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    /// A pricing row exists for the item on the selected list.
    Exact,
    /// Derived from the Retail row times the Wholesale factor.
    WholesaleFromRetail,
    /// No row found; base cost used.
    BaseCost,
}

/// Before- and after-tax unit prices for one item on one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPrice {
    pub before: Decimal,
    pub after: Decimal,
    pub source: PriceSource,
}

impl ResolvedPrice {
    /// The price a line uses: after-tax on tax-inclusive lists.
    pub fn applicable(&self, tax_included: bool) -> Decimal {
        if tax_included { self.after } else { self.before }
    }
}

/// Resolve the unit price of `stock_id` on price list `sales_type_id`.
///
/// `pricing_for_item` holds the pricing rows fetched for the item; rows for
/// other items are ignored. `price_lists` must contain `sales_type_id`.
///
/// # Errors
///
/// Returns [`PricebookError::UnknownSalesType`] when `sales_type_id` is not in
/// `price_lists`, and [`PricebookError::Arithmetic`] when scaling by the
/// wholesale factor overflows.
pub fn resolve_price(
    stock_id: &str,
    sales_type_id: i64,
    pricing_for_item: &[SalesPricing],
    price_lists: &[SalesType],
    item_base_cost: Decimal,
) -> Result<ResolvedPrice, PricebookError> {
    let list = price_lists
        .iter()
        .find(|l| l.id == sales_type_id)
        .ok_or(PricebookError::UnknownSalesType(sales_type_id))?;

    let row_for = |list_id: i64| {
        pricing_for_item
            .iter()
            .find(|p| p.sales_type_id == list_id && p.stock_id == stock_id)
    };

    if let Some(row) = row_for(list.id) {
        return Ok(ResolvedPrice {
            before: row.before_tax(),
            after: row.after_tax(),
            source: PriceSource::Exact,
        });
    }

    if !list.is_wholesale() {
        tracing::debug!(
            stock_id,
            sales_type = %list.name,
            %item_base_cost,
            "no pricing row, using base cost"
        );
        return Ok(ResolvedPrice {
            before: item_base_cost,
            after: item_base_cost,
            source: PriceSource::BaseCost,
        });
    }

    let factor = list.factor_or_one();
    let retail_row = price_lists
        .iter()
        .filter(|l| l.is_retail())
        .find_map(|retail| row_for(retail.id));

    match retail_row {
        Some(row) => {
            let before = scaled(row.before_tax(), factor)?;
            let after = scaled(row.after_tax(), factor)?;
            tracing::debug!(stock_id, %factor, %before, "wholesale price derived from retail");
            Ok(ResolvedPrice {
                before,
                after,
                source: PriceSource::WholesaleFromRetail,
            })
        }
        None => {
            let price = scaled(item_base_cost, factor)?;
            tracing::debug!(stock_id, %factor, %price, "no retail row, wholesale from base cost");
            Ok(ResolvedPrice {
                before: price,
                after: price,
                source: PriceSource::BaseCost,
            })
        }
    }
}

fn scaled(price: Decimal, factor: Decimal) -> Result<Decimal, PricebookError> {
    price
        .checked_mul(factor)
        .ok_or_else(|| overflow(format!("{price} x factor {factor}")))
}
