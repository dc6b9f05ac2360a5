use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::PricebookError;
use super::lines::{document_subtotal, total_for};
use super::numbering::reference_for_date;
use super::tax::{compute_taxes, grand_total, overflow};
use super::types::*;
use super::validation;

/// Builder for constructing priced and taxed sales documents.
///
/// ```
/// use pricebook::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let retail = SalesType { id: 1, name: "Retail".into(), tax_included: Some(false), factor: None };
/// let vat = TaxType { id: 1, description: "VAT".into(), rate: dec!(15) };
///
/// let order = DocumentBuilder::new(DocumentKind::SalesOrder, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
///     .reference("001/2025")
///     .customer(7)
///     .branch(3)
///     .sales_type(&retail)
///     .tax_group_items(vec![TaxGroupItem { tax_group_id: 1, tax_type_id: 1 }])
///     .tax_types(vec![vat])
///     .add_line(DocumentLine::new("A", "Widget", dec!(2), dec!(50), dec!(57.5)).with_discount(dec!(10)))
///     .build()
///     .unwrap();
///
/// assert_eq!(order.totals.unwrap().total, dec!(103.5));
/// ```
pub struct DocumentBuilder {
    kind: DocumentKind,
    date: NaiveDate,
    reference: Option<String>,
    numbering: Option<(Vec<FiscalYear>, Vec<DebtorTrans>)>,
    customer_id: Option<i64>,
    branch_id: Option<i64>,
    sales_type_id: Option<i64>,
    tax_included: Option<bool>,
    shipping_cost: Decimal,
    memo: Option<String>,
    lines: Vec<DocumentLine>,
    tax_group_items: Vec<TaxGroupItem>,
    tax_types: Vec<TaxType>,
}

impl DocumentBuilder {
    pub fn new(kind: DocumentKind, date: NaiveDate) -> Self {
        Self {
            kind,
            date,
            reference: None,
            numbering: None,
            customer_id: None,
            branch_id: None,
            sales_type_id: None,
            tax_included: None,
            shipping_cost: Decimal::ZERO,
            memo: None,
            lines: Vec::new(),
            tax_group_items: Vec::new(),
            tax_types: Vec::new(),
        }
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Number the document at build time from the fiscal year containing its date.
    /// An explicit `reference` takes precedence.
    pub fn numbered_from(mut self, fiscal_years: Vec<FiscalYear>, existing: Vec<DebtorTrans>) -> Self {
        self.numbering = Some((fiscal_years, existing));
        self
    }

    pub fn customer(mut self, id: i64) -> Self {
        self.customer_id = Some(id);
        self
    }

    pub fn branch(mut self, id: i64) -> Self {
        self.branch_id = Some(id);
        self
    }

    /// Price list. Its tax-inclusive flag, when set, decides which line price applies.
    pub fn sales_type(mut self, sales_type: &SalesType) -> Self {
        self.sales_type_id = Some(sales_type.id);
        if let Some(flag) = sales_type.tax_included {
            self.tax_included = Some(flag);
        }
        self
    }

    /// Override whether line prices include tax. Defaults to exclusive.
    pub fn prices_include_tax(mut self, tax_included: bool) -> Self {
        self.tax_included = Some(tax_included);
        self
    }

    pub fn shipping_cost(mut self, amount: Decimal) -> Self {
        self.shipping_cost = amount;
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn add_line(mut self, line: DocumentLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn lines(mut self, lines: impl IntoIterator<Item = DocumentLine>) -> Self {
        self.lines.extend(lines);
        self
    }

    /// Tax types applicable to the branch's tax group.
    pub fn tax_group_items(mut self, items: Vec<TaxGroupItem>) -> Self {
        self.tax_group_items = items;
        self
    }

    pub fn tax_types(mut self, types: Vec<TaxType>) -> Self {
        self.tax_types = types;
        self
    }

    /// Build the document, calculating totals and running validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Document, PricebookError> {
        if self.lines.is_empty() {
            return Err(PricebookError::Builder(
                "at least one line is required".into(),
            ));
        }

        let (mut document, items, types) = self.assemble()?;
        calculate_totals(&mut document, &items, &types)?;

        let errors = validation::validate_document(&document);
        if !errors.is_empty() {
            let msg = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(PricebookError::Validation(msg));
        }

        Ok(document)
    }

    /// Build without validation; totals are still calculated.
    pub fn build_unchecked(self) -> Result<Document, PricebookError> {
        let (mut document, items, types) = self.assemble()?;
        calculate_totals(&mut document, &items, &types)?;
        Ok(document)
    }

    fn assemble(self) -> Result<(Document, Vec<TaxGroupItem>, Vec<TaxType>), PricebookError> {
        let customer_id = self
            .customer_id
            .ok_or_else(|| PricebookError::Builder("customer is required".into()))?;
        let branch_id = self
            .branch_id
            .ok_or_else(|| PricebookError::Builder("branch is required".into()))?;
        let sales_type_id = self
            .sales_type_id
            .ok_or_else(|| PricebookError::Builder("sales type is required".into()))?;

        if self.lines.len() > 10_000 {
            return Err(PricebookError::Builder(
                "document cannot have more than 10,000 lines".into(),
            ));
        }

        let reference = match (self.reference, self.numbering) {
            (Some(reference), _) => reference,
            (None, Some((fiscal_years, existing))) => reference_for_date(
                self.kind.transaction_type(),
                self.date,
                &fiscal_years,
                &existing,
            )?,
            (None, None) => String::new(),
        };

        let document = Document {
            kind: self.kind,
            reference,
            date: self.date,
            customer_id,
            branch_id,
            sales_type_id,
            tax_included: self.tax_included.unwrap_or(false),
            shipping_cost: self.shipping_cost,
            memo: self.memo,
            lines: self.lines,
            totals: None,
        };
        Ok((document, self.tax_group_items, self.tax_types))
    }
}

/// Recompute every line total, then the subtotal, tax breakdown and total.
///
/// All lines count towards the subtotal; a built document has no entry row.
///
/// # Errors
///
/// [`PricebookError::Arithmetic`] when an amount overflows.
pub fn calculate_totals(
    document: &mut Document,
    tax_group_items: &[TaxGroupItem],
    tax_types: &[TaxType],
) -> Result<(), PricebookError> {
    for line in &mut document.lines {
        line.line_total = total_for(line, document.tax_included)?;
    }

    let subtotal = document_subtotal(&document.lines, SubtotalMode::AllLines)?;
    let breakdown = compute_taxes(subtotal, tax_group_items, tax_types, document.tax_included)?;
    let total = grand_total(subtotal, &breakdown, document.tax_included)?
        .checked_add(document.shipping_cost)
        .ok_or_else(|| overflow(format!("total with shipping {}", document.shipping_cost)))?;

    document.totals = Some(DocumentTotals {
        subtotal,
        shipping: document.shipping_cost,
        tax_lines: breakdown.lines,
        tax_total: breakdown.total_tax,
        total,
    });
    Ok(())
}
