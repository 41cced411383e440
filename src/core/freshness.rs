//! Decides whether cached price history must be fetched again

use crate::core::stock::PricePoint;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Returns true unless `history` holds today's price and the prices of the
/// `working_days_to_check - 1` working days before it.
pub fn should_refresh(history: &[PricePoint], working_days_to_check: usize) -> bool {
    should_refresh_on(history, working_days_to_check, Local::now().date_naive())
}

/// Same as [`should_refresh`] with an explicit current date.
///
/// Today is always required, even on a weekend. Earlier weekends are skipped
/// without being looked up; holidays count as working days.
pub fn should_refresh_on(
    history: &[PricePoint],
    working_days_to_check: usize,
    today: NaiveDate,
) -> bool {
    let has_date = |date: NaiveDate| history.iter().any(|p| p.date == date);

    if history.is_empty() || !has_date(today) {
        return true;
    }

    let mut checked_days = 1;
    let mut current = today - Duration::days(1);
    while checked_days < working_days_to_check {
        if is_working_day(current) {
            if !has_date(current) {
                return true;
            }
            checked_days += 1;
        }
        current -= Duration::days(1);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    // Friday
    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 13).unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
    }

    fn history_for(dates: &[NaiveDate]) -> Vec<PricePoint> {
        dates.iter().map(|d| PricePoint::new(*d, 10.0)).collect()
    }

    fn working_days_back_from(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let mut dates = vec![today];
        let mut current = today;
        while dates.len() < count {
            current -= Duration::days(1);
            if is_working_day(current) {
                dates.push(current);
            }
        }
        dates
    }

    #[test]
    fn test_empty_history_always_refreshes() {
        for n in 0..10 {
            assert!(should_refresh_on(&[], n, friday()));
        }
        assert!(should_refresh(&[], 7));
    }

    #[test]
    fn test_missing_today_refreshes() {
        let history = history_for(&working_days_back_from(friday(), 7)[1..]);
        assert!(should_refresh_on(&history, 1, friday()));
        assert!(should_refresh_on(&history, 7, friday()));
    }

    #[test]
    fn test_complete_window_is_fresh() {
        for n in 1..12 {
            let history = history_for(&working_days_back_from(friday(), n));
            assert!(!should_refresh_on(&history, n, friday()), "n = {n}");
        }
    }

    #[test]
    fn test_only_today_needed_for_single_day_window() {
        let history = history_for(&[friday()]);
        assert!(!should_refresh_on(&history, 1, friday()));
        assert!(!should_refresh_on(&history, 0, friday()));
        assert!(should_refresh_on(&history, 2, friday()));
    }

    #[test]
    fn test_weekend_is_skipped() {
        let friday_before = monday() - Duration::days(3);
        let history = history_for(&[monday(), friday_before]);
        assert!(!should_refresh_on(&history, 2, monday()));
    }

    #[test]
    fn test_gap_in_working_days_refreshes() {
        let mut dates = working_days_back_from(friday(), 5);
        dates.remove(2);
        let history = history_for(&dates);
        assert!(!should_refresh_on(&history, 2, friday()));
        assert!(should_refresh_on(&history, 5, friday()));
    }

    #[test]
    fn test_unordered_duplicates_are_fine() {
        let mut dates = working_days_back_from(friday(), 3);
        dates.reverse();
        dates.push(friday());
        let history = history_for(&dates);
        assert!(!should_refresh_on(&history, 3, friday()));
    }

    #[test]
    fn test_weekend_today_still_required() {
        let saturday = friday() + Duration::days(1);
        let history = history_for(&working_days_back_from(friday(), 5));
        assert!(should_refresh_on(&history, 5, saturday));
    }
}
