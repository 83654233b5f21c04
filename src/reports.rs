use crate::benchmarks::Tier;
use crate::filter::FilterSpec;
use crate::metrics::{evaluate, AggregateResult, AggregateValue, Metric};
use crate::types::{
    AttentionAlerts, CountryComparisonRow, Observation, SummaryStats, TrendRow, ZoneKpiRow,
};
use crate::util::{format_number, percent};
use std::collections::{BTreeMap, HashMap};

/// Render an aggregate for a table cell: value with unit, tier mark when
/// the metric is benchmarked, "no data" / "N/A" sentinels otherwise.
fn render(res: &AggregateResult, decimals: usize) -> String {
    match res.value {
        AggregateValue::NoData => "no data".to_string(),
        AggregateValue::Undefined => "N/A".to_string(),
        AggregateValue::Value(v) => {
            let unit = if res.metric.is_percentage() { "%" } else { "" };
            match res.tier {
                Some(tier) => format!("{}{} {}", format_number(v, decimals), unit, tier.symbol()),
                None => format!("{}{}", format_number(v, decimals), unit),
            }
        }
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Report 1: side-by-side country comparison of the headline service
/// indicators, one row per country, sorted by country name.
pub fn generate_country_comparison(data: &[Observation]) -> Vec<CountryComparisonRow> {
    let mut by_country: BTreeMap<String, Vec<&Observation>> = BTreeMap::new();
    for r in data {
        by_country
            .entry(r.country.to_lowercase())
            .or_default()
            .push(r);
    }

    by_country
        .into_iter()
        .map(|(country, rows)| {
            let scope = title_case(&country);
            let eval = |m: Metric| render(&evaluate(&rows, m, &scope), 1);
            let households: f64 = rows.iter().map(|r| r.households).sum();
            let population: f64 = rows.iter().map(|r| r.population_estimate()).sum();
            CountryComparisonRow {
                country: scope.clone(),
                water_coverage: eval(Metric::MeteringCoverage),
                nrw: eval(Metric::NrwPercentage),
                ecoli_pass_rate: eval(Metric::EcoliPassRate),
                complaint_resolution: eval(Metric::ComplaintResolutionEfficiency),
                ww_treatment_coverage: eval(Metric::WwTreatmentCoverage),
                total_households: format_number(households, 0),
                population_served: format_number(population, 0),
            }
        })
        .collect()
}

/// Report 2: per-zone KPI detail for one country, one row per zone.
pub fn generate_zone_kpis(data: &[Observation], country: &str) -> Vec<ZoneKpiRow> {
    let spec = FilterSpec::country(country);
    let filtered = spec.apply(data);

    let mut by_zone: BTreeMap<String, Vec<&Observation>> = BTreeMap::new();
    for r in filtered {
        by_zone.entry(r.zone.clone()).or_default().push(r);
    }

    by_zone
        .into_iter()
        .map(|(zone, rows)| {
            let eval = |m: Metric, d: usize| render(&evaluate(&rows, m, &zone), d);
            ZoneKpiRow {
                records: rows.len(),
                ecoli_pass_rate: eval(Metric::EcoliPassRate, 1),
                chlorine_pass_rate: eval(Metric::ChlorinePassRate, 1),
                resolution_efficiency: eval(Metric::ComplaintResolutionEfficiency, 1),
                nrw: eval(Metric::NrwPercentage, 1),
                metering_coverage: eval(Metric::MeteringCoverage, 1),
                people_per_toilet: eval(Metric::PeoplePerToilet, 0),
                zone,
            }
        })
        .collect()
}

/// Report 3: annual mean of one metric per country with year-over-year
/// change, sorted by country then year. The first year of each country
/// has no prior point, so its change column is a dash.
pub fn generate_annual_trend(data: &[Observation], metric: Metric) -> Vec<TrendRow> {
    let mut groups: BTreeMap<(String, i32), Vec<&Observation>> = BTreeMap::new();
    for r in data {
        groups
            .entry((r.country.to_lowercase(), r.year))
            .or_default()
            .push(r);
    }

    let mut rows: Vec<TrendRow> = Vec::new();
    let mut prev: Option<(String, f64)> = None;
    for ((country, year), group) in groups {
        let scope = format!("{} {}", title_case(&country), year);
        let res = evaluate(&group, metric, &scope);
        // The tier goes in its own status column here, so the value cell
        // stays a plain number.
        let value = match res.value {
            AggregateValue::NoData => "no data".to_string(),
            AggregateValue::Undefined => "N/A".to_string(),
            AggregateValue::Value(v) => {
                let unit = if metric.is_percentage() { "%" } else { "" };
                format!("{}{}", format_number(v, 1), unit)
            }
        };
        let status = res
            .tier
            .map(|t| t.symbol().to_string())
            .unwrap_or_else(|| "—".to_string());
        let yoy_change = match (&prev, res.value.value()) {
            (Some((prev_country, prev_val)), Some(cur))
                if prev_country == &country && *prev_val != 0.0 =>
            {
                format!("{:+.1}%", (cur - prev_val) / prev_val * 100.0)
            }
            _ => "—".to_string(),
        };
        prev = res.value.value().map(|v| (country.clone(), v));
        rows.push(TrendRow {
            country: title_case(&country),
            year,
            value,
            yoy_change,
            status,
        });
    }
    rows
}

/// Sector-wide summary for the JSON export: headline totals, the two
/// flagship indicators with their tiers, the compliant-zone count (zone
/// mean E. Coli pass rate at or above the 95% WHO target), and the
/// attention alerts of the dashboard's "critical gaps" panel.
pub fn generate_summary(data: &[Observation]) -> SummaryStats {
    let rows: Vec<&Observation> = data.iter().collect();

    let countries: std::collections::HashSet<String> =
        data.iter().map(|r| r.country.to_lowercase()).collect();

    let mut by_zone: HashMap<(String, String), Vec<&Observation>> = HashMap::new();
    for r in data {
        by_zone
            .entry((r.country.to_lowercase(), r.zone.clone()))
            .or_default()
            .push(r);
    }

    let total_households: f64 = data.iter().map(|r| r.households).sum();
    let total_metered: f64 = data.iter().map(|r| r.metered).sum();
    let population_served: f64 = data.iter().map(|r| r.population_estimate()).sum();

    let nrw = evaluate(&rows, Metric::NrwPercentage, "sector");
    let ecoli = evaluate(&rows, Metric::EcoliPassRate, "sector");

    let mut compliant_zones = 0usize;
    let mut low_coverage_zones = 0usize;
    let mut poor_quality_zones = 0usize;
    for zone_rows in by_zone.values() {
        let zone_ecoli = evaluate(zone_rows, Metric::EcoliPassRate, "zone");
        let zone_coverage = evaluate(zone_rows, Metric::MeteringCoverage, "zone");
        match zone_ecoli.value.value() {
            Some(v) if v >= 95.0 => compliant_zones += 1,
            Some(_) => poor_quality_zones += 1,
            None => {}
        }
        if let Some(v) = zone_coverage.value.value() {
            if v < 50.0 {
                low_coverage_zones += 1;
            }
        }
    }

    let high_nrw_records = data
        .iter()
        .filter(|r| r.nrw_percentage().map(|v| v > 25.0).unwrap_or(false))
        .count();
    let high_nrw_record_pct = if data.is_empty() {
        0.0
    } else {
        high_nrw_records as f64 / data.len() as f64 * 100.0
    };

    SummaryStats {
        total_records: data.len(),
        total_countries: countries.len(),
        total_zones: by_zone.len(),
        population_served,
        water_coverage_pct: percent(total_metered, total_households),
        avg_nrw_pct: nrw.value.value(),
        nrw_status: nrw.tier.map(|t| t.label().to_string()),
        avg_ecoli_pass_pct: ecoli.value.value(),
        ecoli_status: ecoli.tier.map(|t| t.label().to_string()),
        compliant_zones,
        alerts: AttentionAlerts {
            high_nrw_record_pct,
            low_coverage_zones,
            poor_quality_zones,
        },
    }
}

/// Tier of the sector-wide mean of a metric, for console one-liners.
pub fn sector_tier(data: &[Observation], metric: Metric) -> Option<Tier> {
    let rows: Vec<&Observation> = data.iter().collect();
    evaluate(&rows, metric, "sector").tier
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(country: &str, zone: &str, year: i32, w_supplied: f64, consumed: f64) -> Observation {
        Observation {
            country: country.to_string(),
            zone: zone.to_string(),
            city: "City".to_string(),
            area_type: "urban".to_string(),
            month: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            year,
            households: 1000.0,
            metered: 850.0,
            w_supplied,
            total_consumption: consumed,
            tests_chlorine: 100.0,
            tests_conducted_chlorine: 95.0,
            test_passed_chlorine: 92.0,
            tests_ecoli: 60.0,
            test_conducted_ecoli: 58.0,
            tests_passed_ecoli: 56.0,
            complaints: 40.0,
            resolved: 36.0,
            resolution_days: 9.0,
            workforce: 50.0,
            f_workforce: 15.0,
            ww_capacity: 300.0,
            ww_collected: 250.0,
            ww_treated: 210.0,
            sewer_connections: 400.0,
            hh_emptied: 120.0,
            fs_treated: 80.0,
            fs_reused: 20.0,
            public_toilets: 12.0,
        }
    }

    #[test]
    fn test_country_comparison_one_row_per_country() {
        let data = vec![
            obs("malawi", "area18", 2021, 1000.0, 800.0),
            obs("malawi", "area25", 2021, 1000.0, 750.0),
            obs("Uganda", "central", 2021, 1000.0, 600.0),
        ];
        let rows = generate_country_comparison(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].country, "Malawi");
        assert_eq!(rows[1].country, "Uganda");
        // 2,000 households at 5 persons each.
        assert_eq!(rows[0].population_served, "10,000");
    }

    #[test]
    fn test_zone_kpis_respect_country_filter() {
        let data = vec![
            obs("malawi", "area18", 2021, 1000.0, 800.0),
            obs("malawi", "area18", 2021, 1000.0, 780.0),
            obs("lesotho", "maseru", 2021, 1000.0, 700.0),
        ];
        let rows = generate_zone_kpis(&data, "Malawi");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].zone, "area18");
        assert_eq!(rows[0].records, 2);
    }

    #[test]
    fn test_zone_kpis_empty_country_yields_no_rows() {
        let data = vec![obs("malawi", "area18", 2021, 1000.0, 800.0)];
        assert!(generate_zone_kpis(&data, "cameroon").is_empty());
    }

    #[test]
    fn test_annual_trend_first_year_has_no_change() {
        let data = vec![
            obs("malawi", "a", 2020, 1000.0, 800.0), // NRW 20%
            obs("malawi", "a", 2021, 1000.0, 750.0), // NRW 25%
        ];
        let rows = generate_annual_trend(&data, Metric::NrwPercentage);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].yoy_change, "—");
        assert_eq!(rows[1].yoy_change, "+25.0%");
        assert_eq!(rows[1].status, "🟢");
    }

    #[test]
    fn test_trend_change_does_not_cross_countries() {
        let data = vec![
            obs("lesotho", "a", 2021, 1000.0, 800.0),
            obs("malawi", "a", 2021, 1000.0, 700.0),
        ];
        let rows = generate_annual_trend(&data, Metric::NrwPercentage);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].yoy_change, "—");
        assert_eq!(rows[1].yoy_change, "—");
    }

    #[test]
    fn test_summary_counts_and_alerts() {
        let data = vec![
            obs("malawi", "a", 2021, 1000.0, 800.0),  // NRW 20%
            obs("malawi", "b", 2021, 1000.0, 600.0),  // NRW 40%
            obs("lesotho", "a", 2021, 1000.0, 650.0), // NRW 35%
        ];
        let s = generate_summary(&data);
        assert_eq!(s.total_records, 3);
        assert_eq!(s.total_countries, 2);
        assert_eq!(s.total_zones, 3);
        assert_eq!(s.population_served, 15000.0);
        // Two of three records exceed the 25% NRW benchmark.
        assert!((s.alerts.high_nrw_record_pct - 66.66666).abs() < 0.01);
        // ecoli pass rate is 56/58 ≈ 96.6% everywhere, so all zones comply.
        assert_eq!(s.compliant_zones, 3);
        assert_eq!(s.alerts.poor_quality_zones, 0);
    }
}
