use chrono::NaiveDate;
use pricebook::core::format::format_rate;
use pricebook::core::*;
use rust_decimal_macros::dec;

fn main() {
    // Reference data normally loaded from the backend
    let ctx = PricingContext {
        customers: vec![Customer {
            id: 7,
            name: "Acme Trading".into(),
            sales_type_id: 2,
        }],
        branches: vec![Branch {
            id: 3,
            customer_id: 7,
            name: "Acme Main".into(),
            tax_group_id: 1,
        }],
        sales_types: vec![
            SalesType {
                id: 1,
                name: "Retail".into(),
                tax_included: Some(false),
                factor: None,
            },
            SalesType {
                id: 2,
                name: "Wholesale".into(),
                tax_included: Some(false),
                factor: Some(dec!(0.9)),
            },
        ],
        sales_pricing: vec![SalesPricing {
            stock_id: "WIDGET".into(),
            sales_type_id: 1,
            price_before_tax: Some(dec!(100)),
            price_after_tax: Some(dec!(115)),
            price: None,
        }],
        stock_items: vec![
            StockItem {
                stock_id: "WIDGET".into(),
                description: "Widget".into(),
                material_cost: dec!(40),
                units: Some("each".into()),
            },
            StockItem {
                stock_id: "BOLT".into(),
                description: "Bolt, M8".into(),
                material_cost: dec!(0.35),
                units: Some("each".into()),
            },
        ],
        tax_group_items: vec![TaxGroupItem {
            tax_group_id: 1,
            tax_type_id: 1,
        }],
        tax_types: vec![TaxType {
            id: 1,
            description: "VAT".into(),
            rate: dec!(15),
        }],
        fiscal_years: vec![FiscalYear {
            id: 1,
            begin: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            closed: false,
        }],
        ..Default::default()
    };

    let date = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let list = ctx.default_sales_type(7).unwrap().id;

    for stock_id in ["WIDGET", "BOLT"] {
        let price = ctx.price_for(stock_id, list).unwrap();
        println!("{stock_id}: {} ({:?})", format_amount(price.before), price.source);
    }

    let quote = ctx
        .document_builder(DocumentKind::SalesQuotation, date, 7, 3, None)
        .unwrap()
        .memo("Valid for 30 days")
        .add_line(ctx.line_for("WIDGET", list, dec!(4)).unwrap().with_discount(dec!(5)))
        .add_line(ctx.line_for("BOLT", list, dec!(200)).unwrap())
        .build()
        .unwrap();

    println!("\nQuotation {}", quote.reference);
    for line in &quote.lines {
        println!(
            "  {:<10} {:>8} x {:>8}  {:>10}",
            line.stock_id,
            format_amount(line.quantity),
            format_amount(line.applicable_price(quote.tax_included)),
            format_amount(line.line_total)
        );
    }

    if let Some(totals) = &quote.totals {
        println!("  Subtotal: {}", format_amount(totals.subtotal));
        for tax in &totals.tax_lines {
            println!("  {} {}: {}", tax.name, format_rate(tax.rate), format_amount(tax.amount));
        }
        println!("  Total: {}", format_amount(totals.total));
    }
}
