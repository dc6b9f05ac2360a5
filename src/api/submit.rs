//! Persisting a built document: one header request, then one request per line.
//!
//! The backend offers no transaction spanning these calls. When a line fails
//! after the header was stored, the caller gets
//! [`ApiError::PartialSubmission`] and the saved rows stay as they are.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::error::ApiError;
use super::resource::Resource;
use crate::core::{Document, DocumentKind, DocumentLine, PricebookError, TransactionType};

/// Ids assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedDocument {
    pub header_id: i64,
    pub line_ids: Vec<i64>,
}

/// A create response. Endpoints name the new id differently and some echo
/// the whole row, so every candidate is read and the first present wins.
#[derive(Debug, Deserialize)]
struct Created {
    id: Option<i64>,
    order_no: Option<i64>,
    trans_no: Option<i64>,
    #[serde(rename = "insertId")]
    insert_id: Option<i64>,
}

impl Created {
    fn into_id(self) -> Result<i64, ApiError> {
        self.id
            .or(self.order_no)
            .or(self.trans_no)
            .or(self.insert_id)
            .ok_or_else(|| ApiError::Parse("create response carries no id".into()))
    }
}

#[derive(Debug, Serialize)]
struct HeaderPayload<'a> {
    trans_type: TransactionType,
    reference: &'a str,
    #[serde(rename = "ord_date")]
    date: NaiveDate,
    debtor_no: i64,
    branch_code: i64,
    sales_type: i64,
    tax_included: bool,
    #[serde(with = "rust_decimal::serde::float")]
    freight_cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    tax_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    comments: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct LinePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    order_no: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    debtor_trans_no: Option<i64>,
    trans_type: TransactionType,
    stock_id: &'a str,
    description: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    quantity: Decimal,
    /// Price on the document's basis: after tax on tax-inclusive lists.
    #[serde(with = "rust_decimal::serde::float")]
    unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    discount_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    line_total: Decimal,
}

impl<'a> HeaderPayload<'a> {
    fn from_document(document: &'a Document) -> Result<Self, PricebookError> {
        let totals = document.totals.as_ref().ok_or_else(|| {
            PricebookError::Builder("totals must be calculated before submitting".into())
        })?;
        Ok(Self {
            trans_type: document.kind.transaction_type(),
            reference: &document.reference,
            date: document.date,
            debtor_no: document.customer_id,
            branch_code: document.branch_id,
            sales_type: document.sales_type_id,
            tax_included: document.tax_included,
            freight_cost: document.shipping_cost,
            subtotal: totals.subtotal,
            tax_total: totals.tax_total,
            total: totals.total,
            comments: document.memo.as_deref(),
        })
    }
}

impl<'a> LinePayload<'a> {
    fn new(document: &Document, header_id: i64, line: &'a DocumentLine) -> Self {
        let (order_no, debtor_trans_no) = match Resource::header_for(document.kind) {
            Resource::SalesOrders => (Some(header_id), None),
            _ => (None, Some(header_id)),
        };
        Self {
            order_no,
            debtor_trans_no,
            trans_type: document.kind.transaction_type(),
            stock_id: &line.stock_id,
            description: &line.description,
            quantity: line.quantity,
            unit_price: line.applicable_price(document.tax_included),
            discount_percent: line.discount_percent,
            line_total: line.line_total,
        }
    }
}

/// Store `document`: header first, then each line in order.
///
/// # Errors
///
/// - the header request's own error when nothing was stored
/// - [`ApiError::PartialSubmission`] when a line fails after the header was stored
pub async fn submit_document(
    client: &ApiClient,
    document: &Document,
) -> Result<SubmittedDocument, ApiError> {
    let header = HeaderPayload::from_document(document)?;
    let header_id = client
        .create::<_, Created>(Resource::header_for(document.kind), &header)
        .await?
        .into_id()?;
    tracing::info!(
        kind = ?document.kind,
        reference = %document.reference,
        header_id,
        "document header stored"
    );

    let lines_resource = Resource::lines_for(document.kind);
    let mut line_ids = Vec::with_capacity(document.lines.len());
    for line in &document.lines {
        let payload = LinePayload::new(document, header_id, line);
        match client
            .create::<_, Created>(lines_resource, &payload)
            .await
            .and_then(Created::into_id)
        {
            Ok(id) => line_ids.push(id),
            Err(source) => {
                tracing::error!(
                    reference = %document.reference,
                    header_id,
                    lines_created = line_ids.len(),
                    lines_total = document.lines.len(),
                    error = %source,
                    "line submission failed, document left partially saved"
                );
                return Err(ApiError::PartialSubmission {
                    reference: document.reference.clone(),
                    header_id,
                    lines_created: line_ids.len(),
                    lines_total: document.lines.len(),
                    source: Box::new(source),
                });
            }
        }
    }

    Ok(SubmittedDocument {
        header_id,
        line_ids,
    })
}

/// Remove a stored document header.
pub async fn delete_document(
    client: &ApiClient,
    kind: DocumentKind,
    header_id: i64,
) -> Result<(), ApiError> {
    client.delete(Resource::header_for(kind), header_id).await
}
