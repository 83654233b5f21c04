// Benchmark thresholds and tier classification.
//
// Thresholds are regulatory/WHO targets documented for the sector:
//
// | metric                          | direction | green | amber |
// |---------------------------------|-----------|-------|-------|
// | metering (water) coverage %     | higher    | 80    | 64    |
// | NRW %                           | lower     | 25    | 30    |
// | E. Coli pass rate %             | higher    | 95    | 80    |
// | chlorine pass rate %            | higher    | 95    | 80    |
// | E. Coli execution rate %        | higher    | 90    | 72    |
// | chlorine execution rate %       | higher    | 90    | 72    |
// | complaint resolution efficiency | higher    | 80    | 64    |
// | complaint resolution days       | lower     | 15    | 18    |
// | WW treatment coverage %         | higher    | 80    | 64    |
// | people per public toilet        | lower     | 500   | 600   |
//
// Boundary values belong to the better tier. Count metrics (population,
// households, complaints) carry no benchmark and are never classified.
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::metrics::Metric;

/// Green/amber/red status of a metric value against its benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Green,
    Amber,
    Red,
}

impl Tier {
    pub fn symbol(&self) -> &'static str {
        match self {
            Tier::Green => "🟢",
            Tier::Amber => "🟡",
            Tier::Red => "🔴",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Green => "green",
            Tier::Amber => "amber",
            Tier::Red => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy)]
pub struct Benchmark {
    pub green: f64,
    pub amber: f64,
    pub direction: Direction,
}

impl Benchmark {
    const fn higher(green: f64, amber: f64) -> Self {
        Benchmark {
            green,
            amber,
            direction: Direction::HigherIsBetter,
        }
    }

    const fn lower(green: f64, amber: f64) -> Self {
        Benchmark {
            green,
            amber,
            direction: Direction::LowerIsBetter,
        }
    }
}

static BENCHMARKS: Lazy<HashMap<Metric, Benchmark>> = Lazy::new(|| {
    HashMap::from([
        (Metric::MeteringCoverage, Benchmark::higher(80.0, 64.0)),
        (Metric::NrwPercentage, Benchmark::lower(25.0, 30.0)),
        (Metric::EcoliPassRate, Benchmark::higher(95.0, 80.0)),
        (Metric::ChlorinePassRate, Benchmark::higher(95.0, 80.0)),
        (Metric::EcoliExecutionRate, Benchmark::higher(90.0, 72.0)),
        (Metric::ChlorineExecutionRate, Benchmark::higher(90.0, 72.0)),
        (
            Metric::ComplaintResolutionEfficiency,
            Benchmark::higher(80.0, 64.0),
        ),
        (Metric::ComplaintResolutionDays, Benchmark::lower(15.0, 18.0)),
        (Metric::WwTreatmentCoverage, Benchmark::higher(80.0, 64.0)),
        (Metric::PeoplePerToilet, Benchmark::lower(500.0, 600.0)),
    ])
});

/// Look up the fixed benchmark for a metric, if it has one.
pub fn benchmark_for(metric: Metric) -> Option<&'static Benchmark> {
    BENCHMARKS.get(&metric)
}

/// Classify a value against a benchmark. Pure: depends only on the
/// arguments, inclusive on the favorable side of each boundary.
pub fn classify(value: f64, benchmark: &Benchmark) -> Tier {
    match benchmark.direction {
        Direction::HigherIsBetter => {
            if value >= benchmark.green {
                Tier::Green
            } else if value >= benchmark.amber {
                Tier::Amber
            } else {
                Tier::Red
            }
        }
        Direction::LowerIsBetter => {
            if value <= benchmark.green {
                Tier::Green
            } else if value <= benchmark.amber {
                Tier::Amber
            } else {
                Tier::Red
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_higher_is_better_boundaries() {
        let b = benchmark_for(Metric::EcoliPassRate).unwrap();
        assert_eq!(classify(100.0, b), Tier::Green);
        assert_eq!(classify(95.0, b), Tier::Green);
        assert_eq!(classify(94.99, b), Tier::Amber);
        assert_eq!(classify(80.0, b), Tier::Amber);
        assert_eq!(classify(79.99, b), Tier::Red);
        assert_eq!(classify(0.0, b), Tier::Red);
    }

    #[test]
    fn test_lower_is_better_boundaries() {
        let b = benchmark_for(Metric::NrwPercentage).unwrap();
        assert_eq!(classify(10.0, b), Tier::Green);
        assert_eq!(classify(25.0, b), Tier::Green);
        assert_eq!(classify(25.01, b), Tier::Amber);
        assert_eq!(classify(30.0, b), Tier::Amber);
        assert_eq!(classify(30.01, b), Tier::Red);
        assert_eq!(classify(40.0, b), Tier::Red);
    }

    #[test]
    fn test_green_threshold_is_green_for_all_metrics() {
        for metric in Metric::ALL {
            if let Some(b) = benchmark_for(metric) {
                assert_eq!(classify(b.green, b), Tier::Green, "{:?}", metric);
                // Just past green lands in amber, since every amber
                // threshold sits strictly on the worse side of green.
                let eps = 1e-9_f64.max(b.green.abs() * 1e-12);
                let past_green = match b.direction {
                    Direction::HigherIsBetter => b.green - eps,
                    Direction::LowerIsBetter => b.green + eps,
                };
                assert_eq!(classify(past_green, b), Tier::Amber, "{:?}", metric);
            }
        }
    }

    #[test]
    fn test_count_metrics_have_no_benchmark() {
        assert!(benchmark_for(Metric::PopulationServed).is_none());
        assert!(benchmark_for(Metric::Households).is_none());
        assert!(benchmark_for(Metric::Complaints).is_none());
    }
}
