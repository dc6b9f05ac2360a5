//! Per-tax-type breakdown for a document subtotal.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::error::PricebookError;
use super::types::{TaxBreakdown, TaxGroupItem, TaxLine, TaxType};

/// Name used when a group item points at a tax type that is not loaded.
pub const UNKNOWN_TAX_NAME: &str = "Tax";

/// Compute tax per tax type for `subtotal`.
///
/// On tax-inclusive lists the tax is extracted from the subtotal
/// (`S - S / (1 + r/100)`); otherwise it is added on top (`S * r/100`).
/// Each type is computed against the full subtotal; rates are never
/// compounded. Amounts are rounded to 2 places, half away from zero.
///
/// # Errors
///
/// [`PricebookError::Arithmetic`] when an amount overflows or an inclusive
/// rate of -100% leaves a zero divisor.
pub fn compute_taxes(
    subtotal: Decimal,
    tax_group_items: &[TaxGroupItem],
    tax_types: &[TaxType],
    tax_inclusive: bool,
) -> Result<TaxBreakdown, PricebookError> {
    let mut lines = Vec::with_capacity(tax_group_items.len());
    let mut total_tax = Decimal::ZERO;

    for item in tax_group_items {
        let tax_type = tax_types.iter().find(|t| t.id == item.tax_type_id);
        let (name, rate) = match tax_type {
            Some(t) => (t.description.clone(), t.rate),
            None => {
                tracing::debug!(tax_type_id = item.tax_type_id, "tax type not loaded, rate 0");
                (UNKNOWN_TAX_NAME.to_string(), Decimal::ZERO)
            }
        };

        let amount = round_half_up(tax_amount(subtotal, rate, tax_inclusive)?, 2);
        total_tax = total_tax
            .checked_add(amount)
            .ok_or_else(|| overflow(format!("tax total over {subtotal}")))?;
        lines.push(TaxLine {
            tax_type_id: item.tax_type_id,
            name,
            rate,
            amount,
        });
    }

    Ok(TaxBreakdown { lines, total_tax })
}

/// Unrounded tax for one rate (percent).
pub fn tax_amount(
    subtotal: Decimal,
    rate: Decimal,
    tax_inclusive: bool,
) -> Result<Decimal, PricebookError> {
    let fraction = rate / dec!(100);
    let amount = if tax_inclusive {
        Decimal::ONE
            .checked_add(fraction)
            .and_then(|divisor| subtotal.checked_div(divisor))
            .and_then(|net| subtotal.checked_sub(net))
    } else {
        subtotal.checked_mul(fraction)
    };
    amount.ok_or_else(|| overflow(format!("tax at {rate}% on {subtotal}")))
}

/// Grand total: inclusive prices already carry their tax.
pub fn grand_total(
    subtotal: Decimal,
    breakdown: &TaxBreakdown,
    tax_inclusive: bool,
) -> Result<Decimal, PricebookError> {
    if tax_inclusive {
        Ok(subtotal)
    } else {
        subtotal
            .checked_add(breakdown.total_tax)
            .ok_or_else(|| overflow(format!("total of {subtotal} plus tax")))
    }
}

/// Items belonging to one tax group, in their original order.
pub fn items_for_group(items: &[TaxGroupItem], tax_group_id: i64) -> Vec<TaxGroupItem> {
    items
        .iter()
        .filter(|i| i.tax_group_id == tax_group_id)
        .cloned()
        .collect()
}

/// Round a Decimal to `dp` decimal places using half-up (commercial rounding).
pub(crate) fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum that reports overflow instead of panicking.
pub(crate) fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

pub(crate) fn overflow(what: String) -> PricebookError {
    PricebookError::Arithmetic(format!("{what} is out of range"))
}
