use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::builder::DocumentBuilder;
use super::error::PricebookError;
use super::numbering::{reference_for_date, resolve_fiscal_year};
use super::pricing::{ResolvedPrice, resolve_price};
use super::tax::{compute_taxes, items_for_group};
use super::types::*;

/// Reference data needed to price, tax and number sales documents.
///
/// Loaded once per editing session (see `api::load_pricing_context` with the
/// `api` feature) or assembled by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingContext {
    pub customers: Vec<Customer>,
    pub branches: Vec<Branch>,
    pub sales_types: Vec<SalesType>,
    pub sales_pricing: Vec<SalesPricing>,
    pub stock_items: Vec<StockItem>,
    pub tax_groups: Vec<TaxGroup>,
    pub tax_group_items: Vec<TaxGroupItem>,
    pub tax_types: Vec<TaxType>,
    pub fiscal_years: Vec<FiscalYear>,
    /// Documents already issued (sales orders, quotations and debtor transactions).
    pub documents: Vec<DebtorTrans>,
}

impl PricingContext {
    pub fn customer(&self, id: i64) -> Result<&Customer, PricebookError> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("customer", id))
    }

    pub fn branch(&self, id: i64) -> Result<&Branch, PricebookError> {
        self.branches
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("branch", id))
    }

    pub fn sales_type(&self, id: i64) -> Result<&SalesType, PricebookError> {
        self.sales_types
            .iter()
            .find(|s| s.id == id)
            .ok_or(PricebookError::UnknownSalesType(id))
    }

    pub fn tax_group(&self, id: i64) -> Result<&TaxGroup, PricebookError> {
        self.tax_groups
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| not_found("tax group", id))
    }

    pub fn stock_item(&self, stock_id: &str) -> Result<&StockItem, PricebookError> {
        self.stock_items
            .iter()
            .find(|s| s.stock_id == stock_id)
            .ok_or_else(|| not_found("stock item", stock_id))
    }

    /// The customer's default price list.
    pub fn default_sales_type(&self, customer_id: i64) -> Result<&SalesType, PricebookError> {
        let customer = self.customer(customer_id)?;
        self.sales_type(customer.sales_type_id)
    }

    /// Unit price of a stock item on a price list, with the usual fallbacks.
    pub fn price_for(&self, stock_id: &str, sales_type_id: i64) -> Result<ResolvedPrice, PricebookError> {
        let item = self.stock_item(stock_id)?;
        resolve_price(
            stock_id,
            sales_type_id,
            &self.sales_pricing,
            &self.sales_types,
            item.material_cost,
        )
    }

    /// A new line for `stock_id`, priced on `sales_type_id`.
    pub fn line_for(
        &self,
        stock_id: &str,
        sales_type_id: i64,
        quantity: Decimal,
    ) -> Result<DocumentLine, PricebookError> {
        let item = self.stock_item(stock_id)?;
        let price = self.price_for(stock_id, sales_type_id)?;
        Ok(DocumentLine::new(
            stock_id,
            item.description.clone(),
            quantity,
            price.before,
            price.after,
        ))
    }

    /// Tax group items that apply to a branch.
    pub fn tax_items_for_branch(&self, branch_id: i64) -> Result<Vec<TaxGroupItem>, PricebookError> {
        let branch = self.branch(branch_id)?;
        Ok(items_for_group(&self.tax_group_items, branch.tax_group_id))
    }

    /// Tax breakdown of `subtotal` for a branch.
    pub fn taxes_for_branch(
        &self,
        branch_id: i64,
        subtotal: Decimal,
        tax_inclusive: bool,
    ) -> Result<TaxBreakdown, PricebookError> {
        let items = self.tax_items_for_branch(branch_id)?;
        compute_taxes(subtotal, &items, &self.tax_types, tax_inclusive)
    }

    pub fn fiscal_year_for(&self, date: NaiveDate) -> Option<&FiscalYear> {
        resolve_fiscal_year(date, &self.fiscal_years)
    }

    /// Next free reference of `kind` for a document dated `date`.
    pub fn next_reference(&self, kind: DocumentKind, date: NaiveDate) -> Result<String, PricebookError> {
        reference_for_date(
            kind.transaction_type(),
            date,
            &self.fiscal_years,
            &self.documents,
        )
    }

    /// A builder preloaded with customer, branch, price list, taxes and numbering.
    ///
    /// `sales_type_id` defaults to the customer's price list. A list that
    /// does not say whether its prices include tax takes the flag of the
    /// branch's tax group.
    pub fn document_builder(
        &self,
        kind: DocumentKind,
        date: NaiveDate,
        customer_id: i64,
        branch_id: i64,
        sales_type_id: Option<i64>,
    ) -> Result<DocumentBuilder, PricebookError> {
        let sales_type = match sales_type_id {
            Some(id) => self.sales_type(id)?,
            None => self.default_sales_type(customer_id)?,
        };
        let branch = self.branch(branch_id)?;
        if branch.customer_id != customer_id {
            return Err(PricebookError::Builder(format!(
                "branch {branch_id} does not belong to customer {customer_id}"
            )));
        }

        let tax_included = sales_type.prices_include_tax(self.tax_group(branch.tax_group_id).ok());

        Ok(DocumentBuilder::new(kind, date)
            .customer(customer_id)
            .branch(branch_id)
            .sales_type(sales_type)
            .prices_include_tax(tax_included)
            .tax_group_items(items_for_group(&self.tax_group_items, branch.tax_group_id))
            .tax_types(self.tax_types.clone())
            .numbered_from(self.fiscal_years.clone(), self.documents.clone()))
    }
}

fn not_found(entity: &'static str, id: impl ToString) -> PricebookError {
    PricebookError::NotFound {
        entity,
        id: id.to_string(),
    }
}
