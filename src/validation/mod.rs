//! Signup and adopter-data validation rules.

use chrono::{Datelike, NaiveDate};

/// Minimum age required to sign up or adopt.
pub const MINIMUM_AGE: i32 = 18;

/// Age in whole years at `today`, by exact calendar-year subtraction.
///
/// The year difference is decremented by one when the current month/day
/// precedes the birth month/day. Not floor(days / 365).
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Normalize a CPF to its 11-digit form.
///
/// Accepts formatted ("123.456.789-01") or bare input; returns `None` when
/// the digit count after stripping separators is not exactly 11.
pub fn normalize_cpf(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 11 {
        Some(digits)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_on_birthday() {
        assert_eq!(age_in_years(date(2000, 6, 15), date(2018, 6, 15)), 18);
    }

    #[test]
    fn test_age_one_day_before_birthday() {
        // 18 years minus one day: still 17
        assert_eq!(age_in_years(date(2000, 6, 15), date(2018, 6, 14)), 17);
    }

    #[test]
    fn test_age_one_day_after_birthday() {
        assert_eq!(age_in_years(date(2000, 6, 15), date(2018, 6, 16)), 18);
    }

    #[test]
    fn test_age_earlier_month() {
        assert_eq!(age_in_years(date(2000, 12, 1), date(2018, 6, 30)), 17);
    }

    #[test]
    fn test_age_leap_day_birth() {
        // Feb 29 birth: turns 18 on Mar 1 in a non-leap year
        assert_eq!(age_in_years(date(2000, 2, 29), date(2018, 2, 28)), 17);
        assert_eq!(age_in_years(date(2000, 2, 29), date(2018, 3, 1)), 18);
    }

    #[test]
    fn test_cpf_formatted_and_bare_normalize_equal() {
        let a = normalize_cpf("123.456.789-01").unwrap();
        let b = normalize_cpf("12345678901").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "12345678901");
    }

    #[test]
    fn test_cpf_wrong_length_rejected() {
        assert!(normalize_cpf("123.456.789-0").is_none());
        assert!(normalize_cpf("123456789012").is_none());
        assert!(normalize_cpf("").is_none());
        assert!(normalize_cpf("abc").is_none());
    }
}
