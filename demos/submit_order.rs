//! Loads reference data from the backend, prices a sales order and stores it.
//!
//! Needs `PRICEBOOK_API_URL` (and usually `PRICEBOOK_API_TOKEN`) in the
//! environment or a `.env` file.

use chrono::Local;
use pricebook::api::*;
use pricebook::core::*;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let client = ApiClient::new(&ApiConfig::from_env()?)?;
    let ctx = load_pricing_context(&client).await?;

    let Some(customer) = ctx.customers.first() else {
        println!("no customers on the backend");
        return Ok(());
    };
    let Some(branch) = ctx.branches.iter().find(|b| b.customer_id == customer.id) else {
        println!("customer {} has no branch", customer.id);
        return Ok(());
    };
    let Some(item) = ctx.stock_items.first() else {
        println!("no stock items on the backend");
        return Ok(());
    };

    let list = ctx.default_sales_type(customer.id)?;
    let order = ctx
        .document_builder(
            DocumentKind::SalesOrder,
            Local::now().date_naive(),
            customer.id,
            branch.id,
            None,
        )?
        .add_line(ctx.line_for(&item.stock_id, list.id, dec!(1))?)
        .build()?;

    let total = order.totals.as_ref().map(|t| t.total).unwrap_or_default();
    println!(
        "Order {} for {} on {}: {}",
        order.reference,
        customer.name,
        list.name,
        format_amount(total)
    );

    match submit_document(&client, &order).await {
        Ok(saved) => println!("Stored as #{} with {} lines", saved.header_id, saved.line_ids.len()),
        Err(ApiError::PartialSubmission {
            header_id,
            lines_created,
            lines_total,
            ..
        }) => {
            eprintln!("Only {lines_created} of {lines_total} lines stored, removing #{header_id}");
            delete_document(&client, order.kind, header_id).await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
