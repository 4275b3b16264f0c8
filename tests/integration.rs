use cafe_sales::{
    error::Error,
    parser::{load, parse},
    pipeline::{Pipeline, PipelineOutput},
    record::RawRecord,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn read(input: &str) -> Vec<RawRecord> {
    let rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());
    parse(rdr).collect::<Result<_, _>>().unwrap()
}

fn process(input: &str) -> Result<PipelineOutput, Error> {
    Pipeline::default().run(read(input))
}

const SALES: &str = r#"Date,ItemName,Category,UnitPrice,QuantitySold,TotalSale
    2023-01-02, Latte ,Coffee,3.50,2,7.00
    2023-01-01,LATTE, coffee ,3.50,,3.50
    2023-01-01,Muffin,Bakery,2.25,4,9.99
    2023-01-03,Iced Tea,Tea,2.00,abc,4.00
    2023-01-03,Croissant,Bakery,2.75,3,8.25
    2023-01-02,Espresso,Coffee,2.50,4,10.005"#;

#[test]
fn cleans_and_aggregates_a_batch() {
    let output = process(SALES).unwrap();

    // median of {2, 4, 3, 4} is 3.5, truncated to 3
    let quantities: Vec<_> = output.records.iter().map(|r| r.quantity_sold).collect();
    assert_eq!(quantities, vec![2, 3, 4, 3, 3, 4]);
    assert_eq!(output.imputation.median, dec!(3.5));
    assert_eq!(output.imputation.imputed, 2);
    assert_eq!(output.missing.quantity_sold, 2);

    // latte: 3.50 * 3 = 10.50 vs 3.50, muffin: 9.00 vs 9.99, iced tea: 6.00 vs 4.00
    let flagged: Vec<_> = output
        .discrepancies
        .iter()
        .map(|d| (d.item_name.as_str(), d.stored_total, d.calculated_total))
        .collect();
    assert_eq!(
        flagged,
        vec![
            ("latte", dec!(3.50), dec!(10.50)),
            ("muffin", dec!(9.99), dec!(9.00)),
            ("iced tea", dec!(4.00), dec!(6.00)),
        ]
    );

    let agg = &output.aggregates;
    assert_eq!(agg.total_revenue, dec!(50.75));
    assert_eq!(agg.best_selling_item.as_deref(), Some("latte"));
    let by_category: Vec<_> = agg
        .revenue_by_category
        .iter()
        .map(|(k, v)| (k.as_str(), *v))
        .collect();
    assert_eq!(
        by_category,
        vec![
            ("bakery", dec!(17.25)),
            ("coffee", dec!(27.50)),
            ("tea", dec!(6.00)),
        ]
    );
    assert_eq!(
        agg.daily_revenue.values().copied().collect::<Vec<_>>(),
        vec![dec!(19.50), dec!(17.00), dec!(14.25)]
    );
}

#[test]
fn normalized_names_aggregate_together() {
    let output = process(SALES).unwrap();
    let latte = output
        .aggregates
        .item_shares
        .iter()
        .find(|s| s.item_name == "latte")
        .unwrap();
    assert_eq!(latte.quantity, 5);
    for r in &output.records {
        assert_eq!(r.item_name, r.item_name.trim().to_lowercase());
        assert_eq!(r.category, r.category.trim().to_lowercase());
    }
}

#[test]
fn totals_match_price_times_quantity() {
    let output = process(SALES).unwrap();
    for r in &output.records {
        assert_eq!(r.total_sale, r.unit_price * Decimal::from(r.quantity_sold));
    }
}

#[test]
fn aggregates_are_consistent() {
    let agg = process(SALES).unwrap().aggregates;
    let by_category: Decimal = agg.revenue_by_category.values().copied().sum();
    let by_day: Decimal = agg.daily_revenue.values().copied().sum();
    assert_eq!(by_category, agg.total_revenue);
    assert_eq!(by_day, agg.total_revenue);
    let percent: Decimal = agg.item_shares.iter().map(|s| s.percent).sum();
    assert!((percent - dec!(100)).abs() < dec!(0.000000001));
}

#[test]
fn pipeline_is_idempotent() {
    assert_eq!(process(SALES), process(SALES));
}

#[test]
fn missing_quantities_take_the_median() {
    let output = process(
        r#"Date,ItemName,Category,UnitPrice,QuantitySold,TotalSale
        2023-01-01,Latte,Coffee,1.00,3,3.00
        2023-01-01,Latte,Coffee,1.00,,5.00
        2023-01-01,Latte,Coffee,1.00,7,7.00
        2023-01-01,Latte,Coffee,1.00,n/a,5.00
        2023-01-01,Latte,Coffee,1.00,5,5.00"#,
    )
    .unwrap();
    let quantities: Vec<_> = output.records.iter().map(|r| r.quantity_sold).collect();
    assert_eq!(quantities, vec![3, 5, 7, 5, 5]);
    assert!(output.discrepancies.is_empty());
}

#[test]
fn missing_text_fields_keep_the_row() {
    let output = process(
        r#"Date,ItemName,Category,UnitPrice,QuantitySold,TotalSale
        2023-01-01,,Coffee,1.00,2,2.00
        2023-01-01,Latte,,1.00,1,1.00"#,
    )
    .unwrap();
    assert_eq!(output.records.len(), 2);
    assert_eq!(output.records[0].item_name, "");
    assert_eq!(output.records[1].category, "");
    assert_eq!(output.missing.item_name, 1);
    assert_eq!(output.missing.category, 1);
}

#[test]
fn no_usable_quantities_is_fatal() {
    assert_eq!(
        process(
            r#"Date,ItemName,Category,UnitPrice,QuantitySold,TotalSale
            2023-01-01,Latte,Coffee,1.00,,2.00
            2023-01-01,Latte,Coffee,1.00,lots,1.00"#
        ),
        Err(Error::EmptyQuantityDomain)
    );
}

#[test]
fn overflowing_total_is_fatal() {
    assert_eq!(
        process(
            r#"Date,ItemName,Category,UnitPrice,QuantitySold,TotalSale
            2023-01-01,Latte,Coffee,10000000000000000000000000.0,10000,1.00"#
        ),
        Err(Error::TotalOutOfRange { row: 1 })
    );
}

#[test]
fn missing_column_is_a_parsing_failure() {
    let input = "Date,ItemName,Category,UnitPrice,TotalSale\n2023-01-01,Latte,Coffee,1,1";
    let rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());
    assert_eq!(
        parse(rdr).collect::<Vec<_>>(),
        vec![Err(Error::ParsingFailure(
            "missing column(s): QuantitySold".to_string()
        ))]
    );
}

#[test]
fn missing_source_is_fatal() {
    assert!(matches!(
        load("no_such_dir/cafe_sales.csv"),
        Err(Error::SourceUnavailable { path, .. }) if path == "no_such_dir/cafe_sales.csv"
    ));
}
