use crate::core::DocumentKind;

/// Backend REST resources. Each maps to one path under `/api/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Customers,
    CustomerBranches,
    PaymentTerms,
    SalesTypes,
    SalesPricing,
    StockItems,
    ItemUnits,
    TaxGroups,
    TaxGroupItems,
    TaxTypes,
    FiscalYears,
    SalesOrders,
    SalesOrderDetails,
    DebtorTrans,
    DebtorTransDetails,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Customers => "/api/customers",
            Self::CustomerBranches => "/api/customer-branch",
            Self::PaymentTerms => "/api/payment-terms",
            Self::SalesTypes => "/api/sales-types",
            Self::SalesPricing => "/api/sales-pricing",
            Self::StockItems => "/api/stock-items",
            Self::ItemUnits => "/api/item-units",
            Self::TaxGroups => "/api/tax-groups",
            Self::TaxGroupItems => "/api/tax-group-items",
            Self::TaxTypes => "/api/tax-types",
            Self::FiscalYears => "/api/fiscal-years",
            Self::SalesOrders => "/api/sales-orders",
            Self::SalesOrderDetails => "/api/sales-order-details",
            Self::DebtorTrans => "/api/debtor-trans",
            Self::DebtorTransDetails => "/api/debtor-trans-details",
        }
    }
}

impl Resource {
    /// Where headers of `kind` are stored. Quotations live with sales orders.
    pub fn header_for(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::SalesOrder | DocumentKind::SalesQuotation => Self::SalesOrders,
            DocumentKind::DirectInvoice | DocumentKind::CreditNote => Self::DebtorTrans,
        }
    }

    /// Where lines of `kind` are stored.
    pub fn lines_for(kind: DocumentKind) -> Self {
        match Self::header_for(kind) {
            Self::SalesOrders => Self::SalesOrderDetails,
            _ => Self::DebtorTransDetails,
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}
