use watsan_report::filter::FilterSpec;
use watsan_report::loader::load_and_clean;
use watsan_report::metrics::{evaluate, Metric};
use watsan_report::reports::{
    generate_annual_trend, generate_country_comparison, generate_summary, generate_zone_kpis,
};

fn fixture_path() -> String {
    format!(
        "{}/tests/fixtures/service_data_sample.csv",
        env!("CARGO_MANIFEST_DIR")
    )
}

#[test]
fn test_full_pipeline() {
    let (data, report) = load_and_clean(&fixture_path()).expect("Failed to load fixture");

    // 11 data rows in the fixture: one has no country, one a bad date,
    // one a non-numeric total_consumption.
    assert_eq!(report.total_rows, 11);
    assert_eq!(report.loaded_rows, 8);
    assert_eq!(report.skipped_rows, 3);
    assert_eq!(data.len(), 8);

    let comparison = generate_country_comparison(&data);
    let countries: Vec<&str> = comparison.iter().map(|r| r.country.as_str()).collect();
    assert_eq!(countries, ["Cameroon", "Lesotho", "Malawi", "Uganda"]);

    let summary = generate_summary(&data);
    assert_eq!(summary.total_records, 8);
    assert_eq!(summary.total_countries, 4);
    assert_eq!(summary.total_zones, 5);
}

#[test]
fn test_zone_detail_for_one_country() {
    let (data, _) = load_and_clean(&fixture_path()).unwrap();

    let rows = generate_zone_kpis(&data, "malawi");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].zone, "area18");
    assert_eq!(rows[0].records, 3);
    assert_eq!(rows[1].zone, "area25");
    assert_eq!(rows[1].records, 1);
}

#[test]
fn test_year_filter_is_inclusive() {
    let (data, _) = load_and_clean(&fixture_path()).unwrap();

    let only_2021 = FilterSpec::default().with_years(2021, 2021).apply(&data);
    assert_eq!(only_2021.len(), 6);

    let both_years = FilterSpec::default().with_years(2021, 2022).apply(&data);
    assert_eq!(both_years.len(), 8);
}

#[test]
fn test_people_per_toilet_uses_column_sums() {
    let (data, _) = load_and_clean(&fixture_path()).unwrap();

    let spec = FilterSpec::country("malawi").with_years(2021, 2021);
    let rows = spec.apply(&data);
    let res = evaluate(&rows, Metric::PeoplePerToilet, "malawi 2021");

    // (1000 + 1000 + 800) households x 5 people over 10 + 10 + 2 toilets.
    let expected = 14000.0 / 22.0;
    let got = res.value.value().expect("should be defined");
    assert!((got - expected).abs() < 1e-9);
}

#[test]
fn test_filtered_out_country_reports_no_data() {
    let (data, _) = load_and_clean(&fixture_path()).unwrap();

    let spec = FilterSpec::country("tanzania");
    let rows = spec.apply(&data);
    assert!(rows.is_empty());

    let res = evaluate(&rows, Metric::NrwPercentage, "tanzania");
    assert_eq!(res.value, watsan_report::metrics::AggregateValue::NoData);
    assert!(res.tier.is_none());
}

#[test]
fn test_malformed_numeric_cell_does_not_fabricate_rates() {
    let (data, _) = load_and_clean(&fixture_path()).unwrap();

    // The Apr 2021 malawi row has `total_consumption = "n/a"`. Zero-filling
    // it would read as a fake 100% NRW and drag the 2021 mean from ~27.9%
    // up to ~46%; the row must be dropped instead.
    let spec = FilterSpec::country("malawi").with_years(2021, 2021);
    let rows = spec.apply(&data);
    assert_eq!(rows.len(), 3);

    let res = evaluate(&rows, Metric::NrwPercentage, "malawi 2021");
    let got = res.value.value().expect("should be defined");
    // (300/1200 + 290/1150 + 300/900) / 3, as percentages.
    assert!((got - 27.8502415).abs() < 1e-6, "got {}", got);
}

#[test]
fn test_annual_trend_over_fixture() {
    let (data, _) = load_and_clean(&fixture_path()).unwrap();

    let trend = generate_annual_trend(&data, Metric::NrwPercentage);
    // cameroon 2021, lesotho 2021, malawi 2021+2022, Uganda 2021+2022.
    assert_eq!(trend.len(), 6);
    let malawi_2022 = trend
        .iter()
        .find(|r| r.country == "Malawi" && r.year == 2022)
        .unwrap();
    assert_ne!(malawi_2022.yoy_change, "—");
}
