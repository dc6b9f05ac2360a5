#![no_main]

use libfuzzer_sys::fuzz_target;
use pricebook::core::*;

const KINDS: [DocumentKind; 4] = [
    DocumentKind::SalesOrder,
    DocumentKind::SalesQuotation,
    DocumentKind::DirectInvoice,
    DocumentKind::CreditNote,
];

fuzz_target!(|data: &[u8]| {
    // Arbitrary backend payloads: decoding may fail, numbering must not panic.
    let Ok(ctx) = serde_json::from_slice::<PricingContext>(data) else {
        return;
    };
    for row in &ctx.sales_pricing {
        let _ = (row.before_tax(), row.after_tax());
    }
    for fy in &ctx.fiscal_years {
        for kind in KINDS {
            let _ = next_reference(kind.transaction_type(), fy, &ctx.documents);
            let _ = ctx.next_reference(kind, fy.begin);
        }
    }
});
