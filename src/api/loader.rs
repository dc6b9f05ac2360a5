//! Reference-data loading.

use chrono::NaiveDate;

use super::client::ApiClient;
use super::error::ApiError;
use super::resource::Resource;
use crate::core::{
    DebtorTrans, DocumentKind, FiscalYear, PricingContext, SalesOrderRow, reference_for_date,
};

/// Fetch everything a pricing session needs, one resource after another.
pub async fn load_pricing_context(client: &ApiClient) -> Result<PricingContext, ApiError> {
    let mut context = PricingContext {
        customers: client.list(Resource::Customers).await?,
        branches: client.list(Resource::CustomerBranches).await?,
        sales_types: client.list(Resource::SalesTypes).await?,
        sales_pricing: client.list(Resource::SalesPricing).await?,
        stock_items: client.list(Resource::StockItems).await?,
        tax_groups: client.list(Resource::TaxGroups).await?,
        tax_group_items: client.list(Resource::TaxGroupItems).await?,
        tax_types: client.list(Resource::TaxTypes).await?,
        fiscal_years: client.list(Resource::FiscalYears).await?,
        documents: issued_documents(client, Resource::DebtorTrans).await?,
    };
    context
        .documents
        .extend(issued_documents(client, Resource::SalesOrders).await?);

    tracing::info!(
        customers = context.customers.len(),
        sales_types = context.sales_types.len(),
        pricing_rows = context.sales_pricing.len(),
        stock_items = context.stock_items.len(),
        tax_types = context.tax_types.len(),
        fiscal_years = context.fiscal_years.len(),
        documents = context.documents.len(),
        "pricing context loaded"
    );
    Ok(context)
}

/// Next reference for a new document, from freshly fetched fiscal years and
/// transactions.
///
/// # Errors
///
/// `ApiError::Pricebook(PricebookError::NoFiscalYear)` when `date` falls in no
/// open fiscal year.
pub async fn fetch_next_reference(
    client: &ApiClient,
    kind: DocumentKind,
    date: NaiveDate,
) -> Result<String, ApiError> {
    let fiscal_years: Vec<FiscalYear> = client.list(Resource::FiscalYears).await?;
    let existing = issued_documents(client, Resource::header_for(kind)).await?;
    let reference = reference_for_date(kind.transaction_type(), date, &fiscal_years, &existing)?;
    tracing::debug!(?kind, %date, %reference, "reference issued");
    Ok(reference)
}

/// Issued documents of a header resource, in the shape numbering reads.
async fn issued_documents(
    client: &ApiClient,
    resource: Resource,
) -> Result<Vec<DebtorTrans>, ApiError> {
    match resource {
        Resource::SalesOrders => Ok(client
            .list::<SalesOrderRow>(resource)
            .await?
            .into_iter()
            .map(DebtorTrans::from)
            .collect()),
        _ => client.list(resource).await,
    }
}
