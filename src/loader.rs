use crate::types::{Observation, RawRow};
use crate::util::{parse_f64_safe, parse_i32_safe, parse_month_safe};
use chrono::Datelike;
use csv::ReaderBuilder;
use std::error::Error;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
}

fn non_empty(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Turn one raw row into a clean observation, or `None` if it is unusable:
/// missing identity fields (country, zone, reporting month) or any numeric
/// cell that fails to parse. Zero-filling a bad cell would fabricate a rate
/// (a bad `total_consumption` reads as 100% NRW), so the whole row is
/// dropped instead.
fn clean_row(row: RawRow) -> Option<Observation> {
    let country = non_empty(row.country.as_deref())?;
    let zone = non_empty(row.zone.as_deref())?;
    let month = parse_month_safe(row.date.as_deref())?;
    // Prefer the explicit year column; fall back to the parsed month.
    let year = parse_i32_safe(row.year.as_deref()).unwrap_or_else(|| month.year());

    let num = |s: &Option<String>| parse_f64_safe(s.as_deref());

    Some(Observation {
        country,
        zone,
        city: non_empty(row.city.as_deref()).unwrap_or_else(|| "Unknown".to_string()),
        area_type: non_empty(row.area_type.as_deref()).unwrap_or_else(|| "Unknown".to_string()),
        month,
        year,
        households: num(&row.households)?,
        metered: num(&row.metered)?,
        w_supplied: num(&row.w_supplied)?,
        total_consumption: num(&row.total_consumption)?,
        tests_chlorine: num(&row.tests_chlorine)?,
        tests_conducted_chlorine: num(&row.tests_conducted_chlorine)?,
        test_passed_chlorine: num(&row.test_passed_chlorine)?,
        tests_ecoli: num(&row.tests_ecoli)?,
        test_conducted_ecoli: num(&row.test_conducted_ecoli)?,
        tests_passed_ecoli: num(&row.tests_passed_ecoli)?,
        complaints: num(&row.complaints)?,
        resolved: num(&row.resolved)?,
        resolution_days: num(&row.complaint_resolution)?,
        workforce: num(&row.workforce)?,
        f_workforce: num(&row.f_workforce)?,
        ww_capacity: num(&row.ww_capacity)?,
        ww_collected: num(&row.ww_collected)?,
        ww_treated: num(&row.ww_treated)?,
        sewer_connections: num(&row.sewer_connections)?,
        hh_emptied: num(&row.hh_emptied)?,
        fs_treated: num(&row.fs_treated)?,
        fs_reused: num(&row.fs_reused)?,
        public_toilets: num(&row.public_toilets)?,
    })
}

/// Load the service CSV into memory. A row that cannot be identified or
/// carries a malformed numeric cell is skipped and counted in the report,
/// never zero-filled and never fatal; one bad row does not block the rest
/// of the file. Zero denominators in otherwise-valid rows still surface
/// later as "N/A" through the derived-rate methods.
pub fn load_and_clean(path: &str) -> Result<(Vec<Observation>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut skipped_rows = 0usize;
    let mut records: Vec<Observation> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                skipped_rows += 1;
                continue;
            }
        };
        match clean_row(row) {
            Some(obs) => records.push(obs),
            None => skipped_rows += 1,
        }
    }

    let loaded_rows = records.len();
    let report = LoadReport {
        total_rows,
        loaded_rows,
        skipped_rows,
    };
    Ok((records, report))
}
