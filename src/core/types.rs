use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

// ── Reference data ──────────────────────────────────────────────────────────

/// A price list (Retail, Wholesale, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesType {
    pub id: i64,
    /// Display name. The backend calls this `sales_type`.
    #[serde(alias = "sales_type", alias = "salesType", alias = "type_name")]
    pub name: String,
    /// Prices on this list already include tax. `None` defers to the tax
    /// group of the branch being priced.
    #[serde(
        default,
        alias = "taxIncluded",
        deserialize_with = "lenient_optional_flag"
    )]
    pub tax_included: Option<bool>,
    /// Multiplier applied when deriving prices from another list or from cost.
    #[serde(default)]
    pub factor: Option<Decimal>,
}

impl SalesType {
    pub const WHOLESALE: &'static str = "Wholesale";
    pub const RETAIL: &'static str = "Retail";

    /// Factor, or 1 when the list carries none.
    pub fn factor_or_one(&self) -> Decimal {
        self.factor.unwrap_or(Decimal::ONE)
    }

    pub fn is_wholesale(&self) -> bool {
        self.name.trim().eq_ignore_ascii_case(Self::WHOLESALE)
    }

    pub fn is_retail(&self) -> bool {
        self.name.trim().eq_ignore_ascii_case(Self::RETAIL)
    }

    /// The list's own flag, else the tax group's, else false.
    pub fn prices_include_tax(&self, group: Option<&TaxGroup>) -> bool {
        self.tax_included
            .or(group.map(|g| g.tax_included))
            .unwrap_or(false)
    }
}

/// A (stock item, price list) price row.
///
/// Rows come from several backend endpoints that disagree on field names,
/// so `price_before_tax`, `priceBeforeTax` and a bare `price` are all accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPricing {
    #[serde(alias = "stockId")]
    pub stock_id: String,
    #[serde(alias = "salesTypeId", alias = "sales_type")]
    pub sales_type_id: i64,
    #[serde(default, alias = "priceBeforeTax")]
    pub price_before_tax: Option<Decimal>,
    #[serde(default, alias = "priceAfterTax")]
    pub price_after_tax: Option<Decimal>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl SalesPricing {
    /// Before-tax price, falling back to `price`, then to the after-tax field.
    pub fn before_tax(&self) -> Decimal {
        self.price_before_tax
            .or(self.price)
            .or(self.price_after_tax)
            .unwrap_or(Decimal::ZERO)
    }

    /// After-tax price, falling back to `price`, then to the before-tax field.
    pub fn after_tax(&self) -> Decimal {
        self.price_after_tax
            .or(self.price)
            .or(self.price_before_tax)
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    #[serde(alias = "stockId")]
    pub stock_id: String,
    #[serde(default)]
    pub description: String,
    /// Base material cost, the last-resort price.
    #[serde(default, alias = "materialCost")]
    pub material_cost: Decimal,
    #[serde(default)]
    pub units: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxGroup {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "taxIncluded", deserialize_with = "lenient_flag")]
    pub tax_included: bool,
}

/// Membership of a tax type in a tax group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxGroupItem {
    #[serde(alias = "taxGroupId")]
    pub tax_group_id: i64,
    #[serde(alias = "taxTypeId")]
    pub tax_type_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxType {
    pub id: i64,
    #[serde(default, alias = "name")]
    pub description: String,
    /// Default rate in percent (15 means 15%).
    #[serde(default, alias = "default_rate", alias = "defaultRate")]
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(alias = "debtor_no")]
    pub id: i64,
    #[serde(default, alias = "debtor_name")]
    pub name: String,
    /// Price list used for new documents unless the user picks another.
    #[serde(alias = "sales_type", alias = "salesTypeId")]
    pub sales_type_id: i64,
}

/// A customer branch; carries the tax group applied to its transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(alias = "branch_code")]
    pub id: i64,
    #[serde(alias = "debtor_no")]
    pub customer_id: i64,
    #[serde(default, alias = "br_name")]
    pub name: String,
    #[serde(alias = "tax_group", alias = "taxGroupId")]
    pub tax_group_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYear {
    pub id: i64,
    #[serde(alias = "from_date", alias = "fromDate")]
    pub begin: NaiveDate,
    #[serde(alias = "to_date", alias = "toDate")]
    pub end: NaiveDate,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub closed: bool,
}

impl FiscalYear {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.begin <= date && date <= self.end
    }

    /// `2025` for a calendar fiscal year, `2024/2025` when it spans two years.
    pub fn year_label(&self) -> String {
        let from = self.begin.year();
        let to = self.end.year();
        if from == to {
            from.to_string()
        } else {
            format!("{from}/{to}")
        }
    }
}

/// A customer-side ledger transaction as returned by `/api/debtor-trans`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtorTrans {
    #[serde(alias = "transNo")]
    pub trans_no: i64,
    #[serde(alias = "type", alias = "transType")]
    pub trans_type: TransactionType,
    #[serde(default)]
    pub reference: String,
    #[serde(default, alias = "tranDate")]
    pub tran_date: Option<NaiveDate>,
}

/// A row of `/api/sales-orders`.
///
/// Order rows carry `trans_type` next to an unrelated `type` column, so they
/// get their own shape and convert into [`DebtorTrans`] for numbering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SalesOrderRow {
    pub order_no: i64,
    pub trans_type: TransactionType,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub ord_date: Option<NaiveDate>,
}

impl From<SalesOrderRow> for DebtorTrans {
    fn from(row: SalesOrderRow) -> Self {
        DebtorTrans {
            trans_no: row.order_no,
            trans_type: row.trans_type,
            reference: row.reference,
            tran_date: row.ord_date,
        }
    }
}

// ── Codes ───────────────────────────────────────────────────────────────────

/// Transaction type codes shared with the backend ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum TransactionType {
    /// 10
    SalesInvoice,
    /// 11
    CustomerCredit,
    /// 12
    CustomerPayment,
    /// 13
    CustomerDelivery,
    /// 30
    SalesOrder,
    /// 32
    SalesQuotation,
    /// Any other code value.
    Other(u16),
}

impl TransactionType {
    pub fn code(&self) -> u16 {
        match self {
            Self::SalesInvoice => 10,
            Self::CustomerCredit => 11,
            Self::CustomerPayment => 12,
            Self::CustomerDelivery => 13,
            Self::SalesOrder => 30,
            Self::SalesQuotation => 32,
            Self::Other(c) => *c,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            10 => Self::SalesInvoice,
            11 => Self::CustomerCredit,
            12 => Self::CustomerPayment,
            13 => Self::CustomerDelivery,
            30 => Self::SalesOrder,
            32 => Self::SalesQuotation,
            c => Self::Other(c),
        }
    }
}

impl From<u16> for TransactionType {
    fn from(code: u16) -> Self {
        Self::from_code(code)
    }
}

impl From<TransactionType> for u16 {
    fn from(t: TransactionType) -> Self {
        t.code()
    }
}

/// How the running subtotal treats the row currently being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubtotalMode {
    /// Every row counts.
    AllLines,
    /// The last row is an entry row and is left out until another row is appended.
    ExcludeDraftRow,
}

/// The sales documents that are priced and taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    SalesOrder,
    SalesQuotation,
    DirectInvoice,
    CreditNote,
}

impl DocumentKind {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::SalesOrder => TransactionType::SalesOrder,
            Self::SalesQuotation => TransactionType::SalesQuotation,
            Self::DirectInvoice => TransactionType::SalesInvoice,
            Self::CreditNote => TransactionType::CustomerCredit,
        }
    }

    /// Subtotal behaviour of the entry screen for this kind.
    pub fn subtotal_mode(&self) -> SubtotalMode {
        match self {
            Self::SalesOrder | Self::DirectInvoice => SubtotalMode::ExcludeDraftRow,
            Self::SalesQuotation | Self::CreditNote => SubtotalMode::AllLines,
        }
    }
}

// ── Documents ───────────────────────────────────────────────────────────────

/// Header plus lines of a sales order, quotation, invoice or credit note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub kind: DocumentKind,
    /// `NNN/YYYY` reference, unique per fiscal year and transaction type.
    pub reference: String,
    pub date: NaiveDate,
    pub customer_id: i64,
    pub branch_id: i64,
    pub sales_type_id: i64,
    /// Copied from the price list; decides which line price applies.
    pub tax_included: bool,
    pub shipping_cost: Decimal,
    pub memo: Option<String>,
    pub lines: Vec<DocumentLine>,
    /// Set by the builder.
    pub totals: Option<DocumentTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLine {
    pub stock_id: String,
    pub description: String,
    pub quantity: Decimal,
    pub price_before_tax: Decimal,
    pub price_after_tax: Decimal,
    /// Percent, 0..=100.
    pub discount_percent: Decimal,
    pub line_total: Decimal,
}

impl DocumentLine {
    /// A line with no discount and a zero total; call `recompute_line` to fill the total.
    pub fn new(
        stock_id: impl Into<String>,
        description: impl Into<String>,
        quantity: Decimal,
        price_before_tax: Decimal,
        price_after_tax: Decimal,
    ) -> Self {
        Self {
            stock_id: stock_id.into(),
            description: description.into(),
            quantity,
            price_before_tax,
            price_after_tax,
            discount_percent: Decimal::ZERO,
            line_total: Decimal::ZERO,
        }
    }

    pub fn with_discount(mut self, percent: Decimal) -> Self {
        self.discount_percent = percent;
        self
    }

    /// After-tax price on tax-inclusive lists, before-tax otherwise.
    pub fn applicable_price(&self, tax_included: bool) -> Decimal {
        if tax_included {
            self.price_after_tax
        } else {
            self.price_before_tax
        }
    }
}

/// Tax amount for one tax type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    pub tax_type_id: i64,
    pub name: String,
    pub rate: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub lines: Vec<TaxLine>,
    pub total_tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of line totals.
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax_lines: Vec<TaxLine>,
    pub tax_total: Decimal,
    /// subtotal + shipping, plus tax_total when prices exclude tax.
    pub total: Decimal,
}

// ── Lenient decoding ────────────────────────────────────────────────────────

/// Accepts `true`, `1`, `"1"`, `"true"`, `"yes"` and their negatives; `null` is false.
pub(crate) fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean, 0/1, or a boolean-like string")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" | "" => Ok(false),
                _ => Err(E::invalid_value(Unexpected::Str(v), &self)),
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }

        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(false)
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Like [`lenient_flag`], but `null` means "not set".
pub(crate) fn lenient_optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Flag(#[serde(deserialize_with = "lenient_flag")] bool);

    Ok(Option::<Flag>::deserialize(deserializer)?.map(|Flag(v)| v))
}
