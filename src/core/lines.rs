use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::PricebookError;
use super::pricing::ResolvedPrice;
use super::tax::{checked_sum, overflow, round_half_up};
use super::types::{DocumentLine, SubtotalMode};

/// An edit to one field of a document line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineChange {
    Quantity(Decimal),
    PriceBeforeTax(Decimal),
    PriceAfterTax(Decimal),
    DiscountPercent(Decimal),
    Description(String),
    /// Item picked or price list switched: both prices replaced.
    Price(ResolvedPrice),
}

/// `quantity * price * (1 - discount/100)`, rounded to 2 places.
///
/// # Errors
///
/// [`PricebookError::Arithmetic`] when the product overflows.
pub fn line_total(
    quantity: Decimal,
    unit_price: Decimal,
    discount_percent: Decimal,
) -> Result<Decimal, PricebookError> {
    Decimal::ONE
        .checked_sub(discount_percent / dec!(100))
        .and_then(|net| quantity.checked_mul(unit_price)?.checked_mul(net))
        .map(|total| round_half_up(total, 2))
        .ok_or_else(|| overflow(format!("line total of {quantity} x {unit_price}")))
}

/// Apply `change` to a copy of `row` and recompute its total.
pub fn recompute_line(
    row: &DocumentLine,
    change: LineChange,
    tax_included: bool,
) -> Result<DocumentLine, PricebookError> {
    let mut updated = row.clone();
    match change {
        LineChange::Quantity(q) => updated.quantity = q,
        LineChange::PriceBeforeTax(p) => updated.price_before_tax = p,
        LineChange::PriceAfterTax(p) => updated.price_after_tax = p,
        LineChange::DiscountPercent(d) => updated.discount_percent = d,
        LineChange::Description(text) => updated.description = text,
        LineChange::Price(price) => {
            updated.price_before_tax = price.before;
            updated.price_after_tax = price.after;
        }
    }
    updated.line_total = total_for(&updated, tax_included)?;
    Ok(updated)
}

/// Sum of line totals. In [`SubtotalMode::ExcludeDraftRow`] the last row is skipped.
pub fn document_subtotal(
    lines: &[DocumentLine],
    mode: SubtotalMode,
) -> Result<Decimal, PricebookError> {
    let counted = match mode {
        SubtotalMode::AllLines => lines,
        SubtotalMode::ExcludeDraftRow => match lines.split_last() {
            Some((_, committed)) => committed,
            None => lines,
        },
    };
    checked_sum(counted.iter().map(|l| l.line_total))
        .ok_or_else(|| overflow(format!("subtotal of {} lines", counted.len())))
}

pub(crate) fn total_for(line: &DocumentLine, tax_included: bool) -> Result<Decimal, PricebookError> {
    line_total(
        line.quantity,
        line.applicable_price(tax_included),
        line.discount_percent,
    )
}

/// Rows of a document being edited, with the running subtotal of its screen.
///
/// An edit that would overflow is rejected and leaves the rows unchanged.
#[derive(Debug, Clone)]
pub struct LineEditor {
    rows: Vec<DocumentLine>,
    tax_included: bool,
    mode: SubtotalMode,
}

impl LineEditor {
    pub fn new(tax_included: bool, mode: SubtotalMode) -> Self {
        Self {
            rows: Vec::new(),
            tax_included,
            mode,
        }
    }

    /// Append a row, recomputing its total.
    pub fn push_row(&mut self, row: DocumentLine) -> Result<(), PricebookError> {
        let line_total = total_for(&row, self.tax_included)?;
        self.rows.push(DocumentLine { line_total, ..row });
        Ok(())
    }

    /// Edit row `index`. Returns `false` when the row does not exist.
    pub fn apply(&mut self, index: usize, change: LineChange) -> Result<bool, PricebookError> {
        let Some(row) = self.rows.get(index) else {
            return Ok(false);
        };
        self.rows[index] = recompute_line(row, change, self.tax_included)?;
        Ok(true)
    }

    pub fn remove_row(&mut self, index: usize) -> Option<DocumentLine> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// Switch between before- and after-tax pricing; every total is recomputed.
    pub fn set_tax_included(&mut self, tax_included: bool) -> Result<(), PricebookError> {
        let totals = self
            .rows
            .iter()
            .map(|row| total_for(row, tax_included))
            .collect::<Result<Vec<_>, _>>()?;
        for (row, total) in self.rows.iter_mut().zip(totals) {
            row.line_total = total;
        }
        self.tax_included = tax_included;
        Ok(())
    }

    pub fn subtotal(&self) -> Result<Decimal, PricebookError> {
        document_subtotal(&self.rows, self.mode)
    }

    pub fn rows(&self) -> &[DocumentLine] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<DocumentLine> {
        self.rows
    }
}
