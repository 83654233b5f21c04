// Metric aggregation and benchmark evaluation.
//
// Three aggregation strategies cover the whole metric catalog:
// - rate metrics average the per-row derived rate, skipping rows where the
//   rate is undefined (zero denominator), the same way pandas `.mean()`
//   skips NaN;
// - count metrics sum the raw column;
// - composite ratios divide column sums (sum(population) / sum(toilets))
//   instead of averaging per-row ratios, which would over-weight zones
//   with tiny denominators.
use crate::benchmarks::{benchmark_for, classify, Tier};
use crate::types::Observation;
use crate::util::mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    MeteringCoverage,
    NrwPercentage,
    EcoliPassRate,
    EcoliExecutionRate,
    ChlorinePassRate,
    ChlorineExecutionRate,
    ComplaintResolutionEfficiency,
    ComplaintResolutionDays,
    ComplaintsPer1000Households,
    WwTreatmentCoverage,
    WwCapacityUtilization,
    PeoplePerToilet,
    PopulationServed,
    Households,
    Complaints,
}

enum Strategy {
    /// Mean of a per-row rate, skipping rows where it is undefined.
    RateMean(fn(&Observation) -> Option<f64>),
    /// Sum of a raw count column.
    CountSum(fn(&Observation) -> f64),
    /// Sum of a numerator column over sum of a denominator column.
    RatioOfSums {
        num: fn(&Observation) -> f64,
        den: fn(&Observation) -> f64,
    },
}

impl Metric {
    pub const ALL: [Metric; 15] = [
        Metric::MeteringCoverage,
        Metric::NrwPercentage,
        Metric::EcoliPassRate,
        Metric::EcoliExecutionRate,
        Metric::ChlorinePassRate,
        Metric::ChlorineExecutionRate,
        Metric::ComplaintResolutionEfficiency,
        Metric::ComplaintResolutionDays,
        Metric::ComplaintsPer1000Households,
        Metric::WwTreatmentCoverage,
        Metric::WwCapacityUtilization,
        Metric::PeoplePerToilet,
        Metric::PopulationServed,
        Metric::Households,
        Metric::Complaints,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::MeteringCoverage => "Water Coverage (%)",
            Metric::NrwPercentage => "NRW (%)",
            Metric::EcoliPassRate => "E. Coli Pass Rate (%)",
            Metric::EcoliExecutionRate => "E. Coli Execution Rate (%)",
            Metric::ChlorinePassRate => "Chlorine Pass Rate (%)",
            Metric::ChlorineExecutionRate => "Chlorine Execution Rate (%)",
            Metric::ComplaintResolutionEfficiency => "Complaint Resolution (%)",
            Metric::ComplaintResolutionDays => "Complaint Resolution Time (days)",
            Metric::ComplaintsPer1000Households => "Complaints per 1000 HH",
            Metric::WwTreatmentCoverage => "Wastewater Treatment Coverage (%)",
            Metric::WwCapacityUtilization => "WW Capacity Utilization (%)",
            Metric::PeoplePerToilet => "People per Public Toilet",
            Metric::PopulationServed => "Population Served",
            Metric::Households => "Households",
            Metric::Complaints => "Complaints",
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            Metric::MeteringCoverage
                | Metric::NrwPercentage
                | Metric::EcoliPassRate
                | Metric::EcoliExecutionRate
                | Metric::ChlorinePassRate
                | Metric::ChlorineExecutionRate
                | Metric::ComplaintResolutionEfficiency
                | Metric::WwTreatmentCoverage
                | Metric::WwCapacityUtilization
        )
    }

    fn strategy(&self) -> Strategy {
        match self {
            Metric::MeteringCoverage => Strategy::RateMean(Observation::metering_coverage),
            Metric::NrwPercentage => Strategy::RateMean(Observation::nrw_percentage),
            Metric::EcoliPassRate => Strategy::RateMean(Observation::ecoli_pass_rate),
            Metric::EcoliExecutionRate => Strategy::RateMean(Observation::ecoli_execution_rate),
            Metric::ChlorinePassRate => Strategy::RateMean(Observation::chlorine_pass_rate),
            Metric::ChlorineExecutionRate => {
                Strategy::RateMean(Observation::chlorine_execution_rate)
            }
            Metric::ComplaintResolutionEfficiency => {
                Strategy::RateMean(Observation::complaint_resolution_efficiency)
            }
            Metric::ComplaintResolutionDays => Strategy::RateMean(|o| Some(o.resolution_days)),
            Metric::ComplaintsPer1000Households => {
                Strategy::RateMean(Observation::complaints_per_1000_hh)
            }
            Metric::WwTreatmentCoverage => Strategy::RateMean(Observation::ww_treatment_coverage),
            Metric::WwCapacityUtilization => {
                Strategy::RateMean(Observation::ww_capacity_utilization)
            }
            Metric::PeoplePerToilet => Strategy::RatioOfSums {
                num: Observation::population_estimate,
                den: |o| o.public_toilets,
            },
            Metric::PopulationServed => Strategy::CountSum(Observation::population_estimate),
            Metric::Households => Strategy::CountSum(|o| o.households),
            Metric::Complaints => Strategy::CountSum(|o| o.complaints),
        }
    }
}

/// Outcome of aggregating a metric over a filtered row set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateValue {
    Value(f64),
    /// The filter matched no rows.
    NoData,
    /// Rows matched, but every denominator was zero.
    Undefined,
}

impl AggregateValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            AggregateValue::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// A classified aggregate for display: metric, human-readable scope,
/// aggregated value, and its benchmark tier (None for count metrics and
/// for no-data/undefined outcomes). Ephemeral, recomputed per request.
#[derive(Debug, Clone)]
pub struct AggregateResult {
    pub metric: Metric,
    pub scope: String,
    pub value: AggregateValue,
    pub tier: Option<Tier>,
}

/// Aggregate a metric over the given rows.
///
/// An empty row set yields `NoData`; a row set where the metric is
/// undefined everywhere (e.g. people-per-toilet with zero toilets) yields
/// `Undefined`. Neither is ever reported as a computed zero.
pub fn aggregate(rows: &[&Observation], metric: Metric) -> AggregateValue {
    if rows.is_empty() {
        return AggregateValue::NoData;
    }
    match metric.strategy() {
        Strategy::RateMean(rate) => {
            let defined: Vec<f64> = rows.iter().filter_map(|o| rate(o)).collect();
            match mean(&defined) {
                Some(v) => AggregateValue::Value(v),
                None => AggregateValue::Undefined,
            }
        }
        Strategy::CountSum(count) => {
            AggregateValue::Value(rows.iter().map(|o| count(o)).sum())
        }
        Strategy::RatioOfSums { num, den } => {
            let num_sum: f64 = rows.iter().map(|o| num(o)).sum();
            let den_sum: f64 = rows.iter().map(|o| den(o)).sum();
            if den_sum == 0.0 {
                AggregateValue::Undefined
            } else {
                AggregateValue::Value(num_sum / den_sum)
            }
        }
    }
}

/// Aggregate then classify. The tier is a pure function of the aggregated
/// value and the static benchmark table.
pub fn evaluate(rows: &[&Observation], metric: Metric, scope: &str) -> AggregateResult {
    let value = aggregate(rows, metric);
    let tier = match value {
        AggregateValue::Value(v) => benchmark_for(metric).map(|b| classify(v, b)),
        _ => None,
    };
    AggregateResult {
        metric,
        scope: scope.to_string(),
        value,
        tier,
    }
}
