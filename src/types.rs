use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::util::{percent, safe_ratio};

/// One raw CSV row, everything optional and untyped.
///
/// The service CSV headers are already snake_case, so no renaming is
/// needed; every field is read as a string and parsed defensively in the
/// loader so one malformed cell never aborts the run.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    pub country: Option<String>,
    pub zone: Option<String>,
    pub city: Option<String>,
    pub area_type: Option<String>,
    pub date: Option<String>,
    pub year: Option<String>,
    pub households: Option<String>,
    pub metered: Option<String>,
    pub w_supplied: Option<String>,
    pub total_consumption: Option<String>,
    pub tests_chlorine: Option<String>,
    pub tests_conducted_chlorine: Option<String>,
    pub test_passed_chlorine: Option<String>,
    pub tests_ecoli: Option<String>,
    pub test_conducted_ecoli: Option<String>,
    pub tests_passed_ecoli: Option<String>,
    pub complaints: Option<String>,
    pub resolved: Option<String>,
    pub complaint_resolution: Option<String>,
    pub workforce: Option<String>,
    pub f_workforce: Option<String>,
    pub ww_capacity: Option<String>,
    pub ww_collected: Option<String>,
    pub ww_treated: Option<String>,
    pub sewer_connections: Option<String>,
    pub hh_emptied: Option<String>,
    pub fs_treated: Option<String>,
    pub fs_reused: Option<String>,
    pub public_toilets: Option<String>,
}

/// One cleaned monthly observation for a (country, zone, city).
///
/// Counts are stored raw; rates are derived on demand so a zero
/// denominator surfaces as `None` ("N/A") instead of an infinity.
/// Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Observation {
    pub country: String,
    pub zone: String,
    pub city: String,
    pub area_type: String,
    pub month: NaiveDate,
    pub year: i32,
    pub households: f64,
    pub metered: f64,
    pub w_supplied: f64,
    pub total_consumption: f64,
    pub tests_chlorine: f64,
    pub tests_conducted_chlorine: f64,
    pub test_passed_chlorine: f64,
    pub tests_ecoli: f64,
    pub test_conducted_ecoli: f64,
    pub tests_passed_ecoli: f64,
    pub complaints: f64,
    pub resolved: f64,
    pub resolution_days: f64,
    pub workforce: f64,
    pub f_workforce: f64,
    pub ww_capacity: f64,
    pub ww_collected: f64,
    pub ww_treated: f64,
    pub sewer_connections: f64,
    pub hh_emptied: f64,
    pub fs_treated: f64,
    pub fs_reused: f64,
    pub public_toilets: f64,
}

// Assumed average household size used to estimate population served.
pub const PERSONS_PER_HOUSEHOLD: f64 = 5.0;

impl Observation {
    pub fn chlorine_execution_rate(&self) -> Option<f64> {
        percent(self.tests_conducted_chlorine, self.tests_chlorine)
    }

    pub fn chlorine_pass_rate(&self) -> Option<f64> {
        percent(self.test_passed_chlorine, self.tests_conducted_chlorine)
    }

    pub fn ecoli_execution_rate(&self) -> Option<f64> {
        percent(self.test_conducted_ecoli, self.tests_ecoli)
    }

    pub fn ecoli_pass_rate(&self) -> Option<f64> {
        percent(self.tests_passed_ecoli, self.test_conducted_ecoli)
    }

    pub fn complaint_resolution_efficiency(&self) -> Option<f64> {
        percent(self.resolved, self.complaints)
    }

    pub fn complaints_per_1000_hh(&self) -> Option<f64> {
        safe_ratio(self.complaints, self.households).map(|r| r * 1000.0)
    }

    pub fn female_workforce_ratio(&self) -> Option<f64> {
        percent(self.f_workforce, self.workforce)
    }

    pub fn connections_per_employee(&self) -> Option<f64> {
        safe_ratio(self.metered, self.workforce)
    }

    pub fn ww_capacity_utilization(&self) -> Option<f64> {
        percent(self.ww_treated, self.ww_capacity)
    }

    pub fn ww_collection_efficiency(&self) -> Option<f64> {
        percent(self.ww_collected, self.total_consumption)
    }

    pub fn ww_treatment_coverage(&self) -> Option<f64> {
        percent(self.ww_treated, self.ww_collected)
    }

    pub fn sewer_connection_density(&self) -> Option<f64> {
        safe_ratio(self.sewer_connections, self.households)
    }

    pub fn fs_service_coverage(&self) -> Option<f64> {
        percent(self.hh_emptied, self.households)
    }

    pub fn fs_reuse_rate(&self) -> Option<f64> {
        percent(self.fs_reused, self.fs_treated)
    }

    pub fn water_per_connection(&self) -> Option<f64> {
        safe_ratio(self.w_supplied, self.metered)
    }

    /// Non-Revenue Water: share of supplied water that never reached a bill.
    pub fn nrw_percentage(&self) -> Option<f64> {
        percent(self.w_supplied - self.total_consumption, self.w_supplied)
    }

    pub fn metering_coverage(&self) -> Option<f64> {
        percent(self.metered, self.households)
    }

    pub fn population_estimate(&self) -> f64 {
        self.households * PERSONS_PER_HOUSEHOLD
    }

    pub fn people_per_toilet(&self) -> Option<f64> {
        safe_ratio(self.population_estimate(), self.public_toilets)
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CountryComparisonRow {
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "WaterCoverage")]
    #[tabled(rename = "WaterCoverage")]
    pub water_coverage: String,
    #[serde(rename = "NRW")]
    #[tabled(rename = "NRW")]
    pub nrw: String,
    #[serde(rename = "EColiPassRate")]
    #[tabled(rename = "EColiPassRate")]
    pub ecoli_pass_rate: String,
    #[serde(rename = "ComplaintResolution")]
    #[tabled(rename = "ComplaintResolution")]
    pub complaint_resolution: String,
    #[serde(rename = "WWTreatmentCoverage")]
    #[tabled(rename = "WWTreatmentCoverage")]
    pub ww_treatment_coverage: String,
    #[serde(rename = "TotalHouseholds")]
    #[tabled(rename = "TotalHouseholds")]
    pub total_households: String,
    #[serde(rename = "PopulationServed")]
    #[tabled(rename = "PopulationServed")]
    pub population_served: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ZoneKpiRow {
    #[serde(rename = "Zone")]
    #[tabled(rename = "Zone")]
    pub zone: String,
    #[serde(rename = "Records")]
    #[tabled(rename = "Records")]
    pub records: usize,
    #[serde(rename = "EColiPassRate")]
    #[tabled(rename = "EColiPassRate")]
    pub ecoli_pass_rate: String,
    #[serde(rename = "ChlorinePassRate")]
    #[tabled(rename = "ChlorinePassRate")]
    pub chlorine_pass_rate: String,
    #[serde(rename = "ResolutionEfficiency")]
    #[tabled(rename = "ResolutionEfficiency")]
    pub resolution_efficiency: String,
    #[serde(rename = "NRW")]
    #[tabled(rename = "NRW")]
    pub nrw: String,
    #[serde(rename = "MeteringCoverage")]
    #[tabled(rename = "MeteringCoverage")]
    pub metering_coverage: String,
    #[serde(rename = "PeoplePerToilet")]
    #[tabled(rename = "PeoplePerToilet")]
    pub people_per_toilet: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendRow {
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "YoYChange")]
    #[tabled(rename = "YoYChange")]
    pub yoy_change: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

/// Counts of records and zones that need regulatory attention, mirroring
/// the "critical gaps" panel of the original dashboard.
#[derive(Debug, Serialize)]
pub struct AttentionAlerts {
    pub high_nrw_record_pct: f64,
    pub low_coverage_zones: usize,
    pub poor_quality_zones: usize,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_records: usize,
    pub total_countries: usize,
    pub total_zones: usize,
    pub population_served: f64,
    pub water_coverage_pct: Option<f64>,
    pub avg_nrw_pct: Option<f64>,
    pub nrw_status: Option<String>,
    pub avg_ecoli_pass_pct: Option<f64>,
    pub ecoli_status: Option<String>,
    pub compliant_zones: usize,
    pub alerts: AttentionAlerts,
}
