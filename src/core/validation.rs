use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ValidationError;
use super::lines::line_total;
use super::tax::checked_sum;
use super::types::*;

/// Validate a document header, its lines and (if present) its totals.
/// Returns all validation errors found (not just the first).
pub fn validate_document(document: &Document) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if document.reference.trim().is_empty() {
        errors.push(ValidationError::new(
            "reference",
            "reference must not be empty (is a fiscal year open for the document date?)",
        ));
    }

    if document.shipping_cost < Decimal::ZERO {
        errors.push(ValidationError::new(
            "shipping_cost",
            "shipping cost must not be negative",
        ));
    }

    if document.lines.is_empty() {
        errors.push(ValidationError::new(
            "lines",
            "document must have at least one line",
        ));
    }

    for (i, line) in document.lines.iter().enumerate() {
        validate_line(line, i, document.tax_included, &mut errors);
    }

    errors.extend(validate_totals(document));

    errors
}

/// Check stored totals against the lines they were computed from.
pub fn validate_totals(document: &Document) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(totals) = &document.totals else {
        return errors;
    };

    match checked_sum(document.lines.iter().map(|l| l.line_total)) {
        Some(expected) if expected == totals.subtotal => {}
        Some(expected) => errors.push(ValidationError::new(
            "totals.subtotal",
            format!(
                "subtotal {} does not match sum of line totals {}",
                totals.subtotal, expected
            ),
        )),
        None => errors.push(ValidationError::new(
            "totals.subtotal",
            "sum of line totals is out of range",
        )),
    }

    match checked_sum(totals.tax_lines.iter().map(|t| t.amount)) {
        Some(tax_sum) if tax_sum == totals.tax_total => {}
        Some(tax_sum) => errors.push(ValidationError::new(
            "totals.tax_total",
            format!(
                "tax total {} does not match sum of tax lines {}",
                totals.tax_total, tax_sum
            ),
        )),
        None => errors.push(ValidationError::new(
            "totals.tax_total",
            "sum of tax lines is out of range",
        )),
    }

    let tax = if document.tax_included {
        Decimal::ZERO
    } else {
        totals.tax_total
    };
    match checked_sum([totals.subtotal, totals.shipping, tax]) {
        Some(expected) if expected == totals.total => {}
        Some(expected) => errors.push(ValidationError::new(
            "totals.total",
            format!("total {} does not match expected {}", totals.total, expected),
        )),
        None => errors.push(ValidationError::new(
            "totals.total",
            "expected total is out of range",
        )),
    }

    errors
}

fn validate_line(
    line: &DocumentLine,
    index: usize,
    tax_included: bool,
    errors: &mut Vec<ValidationError>,
) {
    let prefix = format!("lines[{index}]");

    if line.stock_id.trim().is_empty() {
        errors.push(ValidationError::new(
            format!("{prefix}.stock_id"),
            "a stock item must be selected",
        ));
    }

    if line.quantity <= Decimal::ZERO {
        errors.push(ValidationError::new(
            format!("{prefix}.quantity"),
            "quantity must be positive",
        ));
    }

    if line.price_before_tax < Decimal::ZERO || line.price_after_tax < Decimal::ZERO {
        errors.push(ValidationError::new(
            format!("{prefix}.price"),
            "unit price must not be negative",
        ));
    }

    if line.discount_percent < Decimal::ZERO || line.discount_percent > dec!(100) {
        errors.push(ValidationError::new(
            format!("{prefix}.discount_percent"),
            format!(
                "discount {}% must be between 0 and 100",
                line.discount_percent
            ),
        ));
    }

    match line_total(
        line.quantity,
        line.applicable_price(tax_included),
        line.discount_percent,
    ) {
        Ok(expected) if expected == line.line_total => {}
        Ok(expected) => errors.push(ValidationError::new(
            format!("{prefix}.line_total"),
            format!("line total {} should be {}", line.line_total, expected),
        )),
        Err(e) => errors.push(ValidationError::new(
            format!("{prefix}.line_total"),
            e.to_string(),
        )),
    }
}
