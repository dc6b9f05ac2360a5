use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use pricebook::core::*;

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn fiscal_year() -> FiscalYear {
    FiscalYear {
        id: 1,
        begin: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        closed: false,
    }
}

fn price_lists() -> Vec<SalesType> {
    vec![
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
            factor: Some(dec!(0.85)),
        },
    ]
}

/// Retail rows for every other item, so wholesale hits both fallbacks.
fn pricing_rows(items: usize) -> Vec<SalesPricing> {
    (0..items)
        .step_by(2)
        .map(|i| SalesPricing {
            stock_id: format!("ITEM-{i}"),
            sales_type_id: 1,
            price_before_tax: Some(dec!(19.99)),
            price_after_tax: Some(dec!(22.99)),
            price: None,
        })
        .collect()
}

fn issued(n: u64) -> Vec<DebtorTrans> {
    (1..=n)
        .map(|i| DebtorTrans {
            trans_no: i as i64,
            trans_type: TransactionType::SalesOrder,
            reference: format!("{i:03}/2025"),
            tran_date: None,
        })
        .collect()
}

fn build_order(lines: usize) -> Document {
    let mut builder = DocumentBuilder::new(DocumentKind::SalesOrder, test_date())
        .reference("001/2025")
        .customer(1)
        .branch(1)
        .sales_type(&price_lists()[1])
        .tax_group_items(vec![
            TaxGroupItem {
                tax_group_id: 1,
                tax_type_id: 1,
            },
            TaxGroupItem {
                tax_group_id: 1,
                tax_type_id: 2,
            },
        ])
        .tax_types(vec![
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
        ]);

    for i in 1..=lines {
        builder = builder.add_line(
            DocumentLine::new(format!("ITEM-{i}"), format!("Item {i}"), dec!(3), dec!(16.99), dec!(19.54))
                .with_discount(dec!(5)),
        );
    }

    builder.build().unwrap()
}

fn bench_resolve_price(c: &mut Criterion) {
    let lists = price_lists();
    let rows = pricing_rows(1000);

    c.bench_function("resolve_price_exact", |b| {
        b.iter(|| resolve_price(black_box("ITEM-500"), 1, &rows, &lists, dec!(7)))
    });
    c.bench_function("resolve_price_wholesale_fallback", |b| {
        b.iter(|| resolve_price(black_box("ITEM-501"), 2, &rows, &lists, dec!(7)))
    });
}

fn bench_compute_taxes(c: &mut Criterion) {
    let items: Vec<TaxGroupItem> = (1..=5)
        .map(|id| TaxGroupItem {
            tax_group_id: 1,
            tax_type_id: id,
        })
        .collect();
    let types: Vec<TaxType> = (1..=5)
        .map(|id| TaxType {
            id,
            description: format!("Tax {id}"),
            rate: dec!(3.5),
        })
        .collect();

    c.bench_function("compute_taxes_exclusive", |b| {
        b.iter(|| compute_taxes(black_box(dec!(12345.67)), &items, &types, false))
    });
    c.bench_function("compute_taxes_inclusive", |b| {
        b.iter(|| compute_taxes(black_box(dec!(12345.67)), &items, &types, true))
    });
}

fn bench_next_reference(c: &mut Criterion) {
    let fy = fiscal_year();
    let existing = issued(5000);
    c.bench_function("next_reference_5000_issued", |b| {
        b.iter(|| next_reference(TransactionType::SalesOrder, &fy, black_box(&existing)))
    });
}

fn bench_build_document(c: &mut Criterion) {
    c.bench_function("build_order_10_lines", |b| {
        b.iter(|| black_box(build_order(10)))
    });
    c.bench_function("build_order_1000_lines", |b| {
        b.iter(|| black_box(build_order(1000)))
    });
}

fn bench_line_editor(c: &mut Criterion) {
    let rows = build_order(200).lines;
    c.bench_function("line_editor_reprice_200_rows", |b| {
        b.iter(|| {
            let mut editor = LineEditor::new(false, SubtotalMode::ExcludeDraftRow);
            for row in rows.iter().cloned() {
                editor.push_row(row).unwrap();
            }
            for i in 0..rows.len() {
                editor.apply(i, LineChange::DiscountPercent(dec!(10))).unwrap();
            }
            black_box(editor.subtotal().unwrap())
        })
    });
}

fn bench_validate(c: &mut Criterion) {
    let order = build_order(1000);
    c.bench_function("validate_1000_lines", |b| {
        b.iter(|| validate_document(black_box(&order)))
    });
}

criterion_group!(
    benches,
    bench_resolve_price,
    bench_compute_taxes,
    bench_next_reference,
    bench_build_document,
    bench_line_editor,
    bench_validate,
);
criterion_main!(benches);
