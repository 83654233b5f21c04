// Utility helpers for parsing and basic statistics.
//
// This module centralizes all the "dirty" CSV/number/date handling so the
// rest of the code can assume clean, typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64`, tolerating the formatting quirks
/// of CSV exports: surrounding whitespace is trimmed and `","` thousands
/// separators are stripped. Anything containing letters (placeholders like
/// `"n/a"`) and anything else that fails to parse comes back as `None` —
/// callers decide whether that skips a row or renders as "N/A".
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Parse a month label like `"Jan 2020"` into the first day of that month.
///
/// The service CSV stores its reporting period in `%b %Y` form, so the day
/// is pinned to 1 before handing the string to chrono.
pub fn parse_month_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("1 {}", s), "%d %b %Y").ok()
}

pub fn mean(v: &[f64]) -> Option<f64> {
    // Arithmetic mean; `None` for an empty slice so callers can distinguish
    // "no data" from a real zero.
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

/// Divide, treating a zero denominator as undefined instead of producing an
/// infinity or NaN that would poison later averages.
pub fn safe_ratio(num: f64, den: f64) -> Option<f64> {
    if den == 0.0 {
        None
    } else {
        Some(num / den)
    }
}

pub fn percent(num: f64, den: f64) -> Option<f64> {
    safe_ratio(num, den).map(|r| r * 100.0)
}

/// Fixed decimal places plus thousands separators, e.g. `1,234,567.89`.
///
/// `num-format` only groups integers, so the value is rendered to a plain
/// fixed-decimal string first and the integer part is grouped separately.
pub fn format_number(n: f64, decimals: usize) -> String {
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Comma-grouped integer, for counts in console messages
/// (e.g., `1,080 rows loaded`).
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_handles_commas_and_garbage() {
        assert_eq!(parse_f64_safe(Some("1,234.5")), Some(1234.5));
        assert_eq!(parse_f64_safe(Some(" 42 ")), Some(42.0));
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parse_month_pins_first_day() {
        let d = parse_month_safe(Some("Mar 2021")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert_eq!(parse_month_safe(Some("2021-03")), None);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn safe_ratio_rejects_zero_denominator() {
        assert_eq!(safe_ratio(10.0, 0.0), None);
        assert_eq!(percent(1.0, 4.0), Some(25.0));
    }
}
