use chrono::NaiveDate;
use pricebook::core::format::format_rate;
use pricebook::core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn context() -> PricingContext {
    PricingContext {
        customers: vec![
            Customer {
                id: 7,
                name: "Acme Trading".into(),
                sales_type_id: 2,
            },
            Customer {
                id: 8,
                name: "Bolt Retail".into(),
                sales_type_id: 3,
            },
        ],
        branches: vec![
            Branch {
                id: 3,
                customer_id: 7,
                name: "Acme Main".into(),
                tax_group_id: 1,
            },
            Branch {
                id: 4,
                customer_id: 8,
                name: "Bolt Harbour".into(),
                tax_group_id: 2,
            },
        ],
        sales_types: vec![
            SalesType {
                id: 1,
                name: "Retail".into(),
                tax_included: Some(false),
                factor: Some(dec!(1)),
            },
            SalesType {
                id: 2,
                name: "Wholesale".into(),
                tax_included: Some(false),
                factor: Some(dec!(0.9)),
            },
            SalesType {
                id: 3,
                name: "Retail Incl".into(),
                tax_included: Some(true),
                factor: None,
            },
            SalesType {
                id: 4,
                name: "Trade".into(),
                tax_included: None,
                factor: None,
            },
        ],
        sales_pricing: vec![
            SalesPricing {
                stock_id: "A".into(),
                sales_type_id: 1,
                price_before_tax: Some(dec!(100)),
                price_after_tax: Some(dec!(115)),
                price: None,
            },
            SalesPricing {
                stock_id: "B".into(),
                sales_type_id: 1,
                price_before_tax: Some(dec!(50)),
                price_after_tax: Some(dec!(57.5)),
                price: None,
            },
            SalesPricing {
                stock_id: "A".into(),
                sales_type_id: 3,
                price_before_tax: None,
                price_after_tax: None,
                price: Some(dec!(115)),
            },
        ],
        stock_items: vec![
            StockItem {
                stock_id: "A".into(),
                description: "Widget".into(),
                material_cost: dec!(40),
                units: Some("each".into()),
            },
            StockItem {
                stock_id: "B".into(),
                description: "Gadget".into(),
                material_cost: dec!(20),
                units: Some("each".into()),
            },
            StockItem {
                stock_id: "C".into(),
                description: "Gizmo".into(),
                material_cost: dec!(5),
                units: None,
            },
        ],
        tax_groups: vec![
            TaxGroup {
                id: 1,
                name: "Standard".into(),
                tax_included: false,
            },
            TaxGroup {
                id: 2,
                name: "Standard + Levy".into(),
                tax_included: true,
            },
        ],
        tax_group_items: vec![
            TaxGroupItem {
                tax_group_id: 1,
                tax_type_id: 1,
            },
            TaxGroupItem {
                tax_group_id: 2,
                tax_type_id: 1,
            },
            TaxGroupItem {
                tax_group_id: 2,
                tax_type_id: 2,
            },
        ],
        tax_types: vec![
            TaxType {
                id: 1,
                description: "VAT".into(),
                rate: dec!(15),
            },
            TaxType {
                id: 2,
                description: "Levy".into(),
                rate: dec!(2),
            },
        ],
        fiscal_years: vec![FiscalYear {
            id: 1,
            begin: date(2025, 1, 1),
            end: date(2025, 12, 31),
            closed: false,
        }],
        documents: vec![
            DebtorTrans {
                trans_no: 1,
                trans_type: TransactionType::SalesOrder,
                reference: "001/2025".into(),
                tran_date: Some(date(2025, 1, 5)),
            },
            DebtorTrans {
                trans_no: 2,
                trans_type: TransactionType::SalesOrder,
                reference: "002/2025".into(),
                tran_date: Some(date(2025, 2, 5)),
            },
            DebtorTrans {
                trans_no: 1,
                trans_type: TransactionType::SalesInvoice,
                reference: "001/2025".into(),
                tran_date: Some(date(2025, 2, 6)),
            },
        ],
    }
}

fn wholesale_order(ctx: &PricingContext) -> Document {
    let list = ctx.default_sales_type(7).unwrap().id;
    ctx.document_builder(DocumentKind::SalesOrder, date(2025, 3, 10), 7, 3, None)
        .unwrap()
        .add_line(
            ctx.line_for("A", list, dec!(2))
                .unwrap()
                .with_discount(dec!(10)),
        )
        .add_line(ctx.line_for("B", list, dec!(1)).unwrap())
        .add_line(ctx.line_for("C", list, dec!(3)).unwrap())
        .build()
        .unwrap()
}

fn render(doc: &Document) -> String {
    let mut out = vec![format!("{:?} {}", doc.kind, doc.reference)];
    for line in &doc.lines {
        out.push(format!(
            "{} x{} @ {} -{} = {}",
            line.stock_id,
            format_amount(line.quantity),
            format_amount(line.applicable_price(doc.tax_included)),
            format_rate(line.discount_percent),
            format_amount(line.line_total),
        ));
    }
    let totals = doc.totals.as_ref().unwrap();
    out.push(format!("subtotal {}", format_amount(totals.subtotal)));
    for tax in &totals.tax_lines {
        out.push(format!(
            "{} {}: {}",
            tax.name,
            format_rate(tax.rate),
            format_amount(tax.amount)
        ));
    }
    out.push(format!("total {}", format_amount(totals.total)));
    out.join("\n")
}

// --- Wholesale sales order ---

#[test]
fn wholesale_order_totals() {
    let ctx = context();
    let order = wholesale_order(&ctx);

    assert_eq!(order.reference, "003/2025");
    assert_eq!(order.sales_type_id, 2);
    assert!(!order.tax_included);

    // 2 * 90 * 0.9 = 162; 45; 3 * 4.5 = 13.5
    assert_eq!(order.lines[0].line_total, dec!(162.00));
    assert_eq!(order.lines[1].line_total, dec!(45));
    assert_eq!(order.lines[2].line_total, dec!(13.5));

    let totals = order.totals.as_ref().unwrap();
    assert_eq!(totals.subtotal, dec!(220.50));
    // 220.50 * 0.15 = 33.075 → 33.08
    assert_eq!(totals.tax_total, dec!(33.08));
    assert_eq!(totals.total, dec!(253.58));
    assert!(validate_document(&order).is_empty());
}

#[test]
fn wholesale_order_summary_snapshot() {
    let ctx = context();
    let order = wholesale_order(&ctx);
    insta::assert_snapshot!("sales_order_summary", render(&order));
}

#[test]
fn wholesale_price_sources() {
    let ctx = context();
    assert_eq!(
        ctx.price_for("A", 2).unwrap().source,
        PriceSource::WholesaleFromRetail
    );
    assert_eq!(ctx.price_for("C", 2).unwrap().source, PriceSource::BaseCost);
    assert_eq!(ctx.price_for("A", 1).unwrap().source, PriceSource::Exact);
    // Non-wholesale list without a row: base cost, unscaled
    assert_eq!(ctx.price_for("C", 1).unwrap().before, dec!(5));
}

// --- Tax-inclusive direct invoice ---

#[test]
fn inclusive_direct_invoice() {
    let ctx = context();
    let invoice = ctx
        .document_builder(DocumentKind::DirectInvoice, date(2025, 4, 1), 8, 4, None)
        .unwrap()
        .add_line(ctx.line_for("A", 3, dec!(1)).unwrap())
        .build()
        .unwrap();

    assert_eq!(invoice.reference, "002/2025");
    assert!(invoice.tax_included);

    let totals = invoice.totals.as_ref().unwrap();
    assert_eq!(totals.subtotal, dec!(115));
    assert_eq!(totals.tax_lines.len(), 2);
    // 115 - 115/1.15 = 15
    assert_eq!(totals.tax_lines[0].amount, dec!(15.00));
    // 115 - 115/1.02 = 2.2549... → 2.25
    assert_eq!(totals.tax_lines[1].amount, dec!(2.25));
    assert_eq!(totals.tax_total, dec!(17.25));
    // Inclusive: tax already in the subtotal
    assert_eq!(totals.total, dec!(115));
}

#[test]
fn explicit_price_list_overrides_customer_default() {
    let ctx = context();
    let quote = ctx
        .document_builder(DocumentKind::SalesQuotation, date(2025, 5, 1), 7, 3, Some(1))
        .unwrap()
        .add_line(ctx.line_for("A", 1, dec!(1)).unwrap())
        .build()
        .unwrap();
    assert_eq!(quote.sales_type_id, 1);
    assert_eq!(quote.reference, "001/2025");
    let totals = quote.totals.unwrap();
    assert_eq!(totals.subtotal, dec!(100));
    assert_eq!(totals.total, dec!(115));
}

#[test]
fn shipping_added_to_total() {
    let ctx = context();
    let note = ctx
        .document_builder(DocumentKind::CreditNote, date(2025, 6, 1), 7, 3, Some(1))
        .unwrap()
        .shipping_cost(dec!(10))
        .add_line(ctx.line_for("B", 1, dec!(2)).unwrap())
        .build()
        .unwrap();
    let totals = note.totals.unwrap();
    assert_eq!(totals.subtotal, dec!(100));
    assert_eq!(totals.shipping, dec!(10));
    assert_eq!(totals.tax_total, dec!(15));
    assert_eq!(totals.total, dec!(125));
}

#[test]
fn taxes_for_branch_uses_its_group() {
    let ctx = context();
    let b = ctx.taxes_for_branch(3, dec!(90), false).unwrap();
    assert_eq!(b.lines.len(), 1);
    assert_eq!(b.total_tax, dec!(13.5));
    assert_eq!(grand_total(dec!(90), &b, false).unwrap(), dec!(103.5));
}

#[test]
fn unflagged_price_list_follows_branch_tax_group() {
    let ctx = context();

    // Branch 4 sits in a tax-inclusive group
    let inclusive = ctx
        .document_builder(DocumentKind::SalesOrder, date(2025, 4, 2), 8, 4, Some(4))
        .unwrap()
        .add_line(ctx.line_for("A", 1, dec!(1)).unwrap())
        .build()
        .unwrap();
    assert!(inclusive.tax_included);
    let totals = inclusive.totals.unwrap();
    assert_eq!(totals.subtotal, dec!(115));
    assert_eq!(totals.total, dec!(115));

    // Branch 3 does not
    let exclusive = ctx
        .document_builder(DocumentKind::SalesOrder, date(2025, 4, 2), 7, 3, Some(4))
        .unwrap()
        .add_line(ctx.line_for("A", 1, dec!(1)).unwrap())
        .build()
        .unwrap();
    assert!(!exclusive.tax_included);
    assert_eq!(exclusive.totals.unwrap().total, dec!(115));

    // A flagged list keeps its own setting in an inclusive group
    let flagged = ctx
        .document_builder(DocumentKind::SalesOrder, date(2025, 4, 2), 8, 4, Some(1))
        .unwrap()
        .add_line(ctx.line_for("A", 1, dec!(1)).unwrap())
        .build()
        .unwrap();
    assert!(!flagged.tax_included);
}

#[test]
fn fiscal_year_lookup() {
    let ctx = context();
    assert_eq!(ctx.fiscal_year_for(date(2025, 8, 8)).unwrap().id, 1);
    assert!(ctx.fiscal_year_for(date(2026, 1, 1)).is_none());
    assert_eq!(
        ctx.next_reference(DocumentKind::CreditNote, date(2025, 8, 8))
            .unwrap(),
        "001/2025"
    );
}

// --- Line editing ---

#[test]
fn editing_session_matches_built_document() {
    let ctx = context();
    let mut editor = LineEditor::new(false, DocumentKind::SalesOrder.subtotal_mode());
    editor
        .push_row(ctx.line_for("A", 2, dec!(2)).unwrap())
        .unwrap();
    assert_eq!(editor.subtotal().unwrap(), Decimal::ZERO);

    editor
        .push_row(ctx.line_for("B", 2, dec!(1)).unwrap())
        .unwrap();
    assert!(editor.apply(0, LineChange::DiscountPercent(dec!(10))).unwrap());
    assert_eq!(editor.subtotal().unwrap(), dec!(162));

    // Switching to retail re-prices the row
    let retail = ctx.price_for("A", 1).unwrap();
    assert!(editor.apply(0, LineChange::Price(retail)).unwrap());
    assert_eq!(editor.subtotal().unwrap(), dec!(180));

    let rows = editor.into_rows();
    let doc = ctx
        .document_builder(DocumentKind::SalesOrder, date(2025, 3, 10), 7, 3, None)
        .unwrap()
        .lines(rows)
        .build()
        .unwrap();
    // The built document counts every row
    assert_eq!(doc.totals.unwrap().subtotal, dec!(225));
}
