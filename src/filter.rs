// Row filtering for report scopes.
//
// Mirrors the dashboard's sidebar filters: country set, zone set, a single
// city, and an inclusive year range, AND-combined. Country and city names
// in the source data are inconsistently cased ("cameroon" vs "Uganda"),
// so matching is case-insensitive.
use crate::types::Observation;

#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    pub countries: Option<Vec<String>>,
    pub zones: Option<Vec<String>>,
    pub city: Option<String>,
    pub year_range: Option<(i32, i32)>,
}

impl FilterSpec {
    /// Everything for one country, all zones and years.
    pub fn country(name: &str) -> Self {
        FilterSpec {
            countries: Some(vec![name.to_string()]),
            ..FilterSpec::default()
        }
    }

    pub fn with_years(mut self, from: i32, to: i32) -> Self {
        self.year_range = Some((from, to));
        self
    }

    pub fn matches(&self, obs: &Observation) -> bool {
        if let Some(countries) = &self.countries {
            if !countries
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&obs.country))
            {
                return false;
            }
        }
        if let Some(zones) = &self.zones {
            if !zones.iter().any(|z| z.eq_ignore_ascii_case(&obs.zone)) {
                return false;
            }
        }
        if let Some(city) = &self.city {
            if !city.eq_ignore_ascii_case(&obs.city) {
                return false;
            }
        }
        if let Some((from, to)) = self.year_range {
            if obs.year < from || obs.year > to {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, rows: &'a [Observation]) -> Vec<&'a Observation> {
        rows.iter().filter(|o| self.matches(o)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(country: &str, zone: &str, year: i32) -> Observation {
        Observation {
            country: country.to_string(),
            zone: zone.to_string(),
            city: "Kampala".to_string(),
            area_type: "urban".to_string(),
            month: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
            year,
            households: 100.0,
            metered: 80.0,
            w_supplied: 500.0,
            total_consumption: 400.0,
            tests_chlorine: 10.0,
            tests_conducted_chlorine: 9.0,
            test_passed_chlorine: 9.0,
            tests_ecoli: 10.0,
            test_conducted_ecoli: 10.0,
            tests_passed_ecoli: 10.0,
            complaints: 5.0,
            resolved: 4.0,
            resolution_days: 10.0,
            workforce: 20.0,
            f_workforce: 6.0,
            ww_capacity: 100.0,
            ww_collected: 80.0,
            ww_treated: 70.0,
            sewer_connections: 50.0,
            hh_emptied: 10.0,
            fs_treated: 20.0,
            fs_reused: 5.0,
            public_toilets: 4.0,
        }
    }

    #[test]
    fn test_country_match_is_case_insensitive() {
        let spec = FilterSpec::country("uganda");
        assert!(spec.matches(&obs("Uganda", "central", 2021)));
        assert!(!spec.matches(&obs("malawi", "central", 2021)));
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let spec = FilterSpec::default().with_years(2020, 2022);
        assert!(spec.matches(&obs("malawi", "a", 2020)));
        assert!(spec.matches(&obs("malawi", "a", 2022)));
        assert!(!spec.matches(&obs("malawi", "a", 2019)));
        assert!(!spec.matches(&obs("malawi", "a", 2023)));
    }

    #[test]
    fn test_filters_and_combine() {
        let rows = vec![
            obs("malawi", "area18", 2021),
            obs("malawi", "area25", 2021),
            obs("lesotho", "area18", 2021),
        ];
        let spec = FilterSpec {
            countries: Some(vec!["malawi".to_string()]),
            zones: Some(vec!["area18".to_string()]),
            ..FilterSpec::default()
        };
        let picked = spec.apply(&rows);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].zone, "area18");
    }
}
