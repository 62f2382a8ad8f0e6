// Property-based tests for the date-range resolver.
//
// The resolver is a pure function of the injected reference instant, so
// every property is checked across many instants.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use proptest::prelude::*;
use std::str::FromStr;

use edupay::core::AppError;
use edupay::modules::reports::services::date_range::{resolve, RangeFilter};

fn instant_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    // 2001-09-09 .. 2033-05-18, well inside chrono's range
    (1_000_000_000i64..2_000_000_000i64)
        .prop_map(|secs| Utc.timestamp_opt(secs, 0).single().unwrap())
}

proptest! {
    #[test]
    fn bounded_ranges_are_ordered(secs in 1_000_000_000i64..2_000_000_000i64) {
        let now = Utc.timestamp_opt(secs, 0).single().unwrap();

        for filter in [RangeFilter::Weekly, RangeFilter::Monthly, RangeFilter::Yearly] {
            let range = resolve(filter, now, None, None).unwrap();
            if let (Some(start), Some(end)) = (range.start, range.end) {
                prop_assert!(start <= end, "{:?}: {} > {}", filter, start, end);
            }
        }
    }

    #[test]
    fn weekly_start_is_seven_days_back(secs in 1_000_000_000i64..2_000_000_000i64) {
        let now = Utc.timestamp_opt(secs, 0).single().unwrap();
        let range = resolve(RangeFilter::Weekly, now, None, None).unwrap();

        prop_assert_eq!(range.start, Some(now - Duration::days(7)));
        prop_assert_eq!(range.end, None);
    }

    #[test]
    fn yearly_bounds_sit_on_day_boundaries(secs in 1_000_000_000i64..2_000_000_000i64) {
        let now = Utc.timestamp_opt(secs, 0).single().unwrap();
        let range = resolve(RangeFilter::Yearly, now, None, None).unwrap();

        let start = range.start.unwrap();
        prop_assert_eq!(start.hour(), 0);
        prop_assert_eq!(start.minute(), 0);
        prop_assert_eq!(start.second(), 0);
        prop_assert_eq!(start.timestamp_subsec_millis(), 0);

        let end = range.end.unwrap();
        prop_assert_eq!(end.date_naive(), now.date_naive());
        prop_assert_eq!(end.hour(), 23);
        prop_assert_eq!(end.minute(), 59);
        prop_assert_eq!(end.second(), 59);
        prop_assert_eq!(end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn custom_never_accepts_inverted_bounds(
        (a, b) in (instant_strategy(), instant_strategy())
    ) {
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let now = Utc.timestamp_opt(1_500_000_000, 0).single().unwrap();

        // ordered bounds resolve
        let range = resolve(RangeFilter::Custom, now, Some(early), Some(late)).unwrap();
        prop_assert_eq!(range.start, Some(early));
        prop_assert_eq!(range.end, Some(late));

        // inverted bounds fail, unless the instants coincide
        if early < late {
            let err = resolve(RangeFilter::Custom, now, Some(late), Some(early)).unwrap_err();
            prop_assert!(matches!(err, AppError::InvalidRange(_)));
        }
    }
}

#[test]
fn yearly_start_is_five_years_before_now() {
    let now = Utc.with_ymd_and_hms(2026, 8, 8, 14, 30, 45).unwrap();
    let range = resolve(RangeFilter::Yearly, now, None, None).unwrap();

    assert_eq!(
        range.start.unwrap(),
        Utc.with_ymd_and_hms(2021, 8, 8, 0, 0, 0).unwrap()
    );
}

#[test]
fn monthly_handles_short_month_clamping() {
    // March 31 minus one month clamps to February's last day
    let now = Utc.with_ymd_and_hms(2026, 3, 31, 9, 0, 0).unwrap();
    let range = resolve(RangeFilter::Monthly, now, None, None).unwrap();

    assert_eq!(
        range.start.unwrap().date_naive(),
        chrono::NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
    );
}

#[test]
fn unknown_filter_string_is_rejected() {
    let err = RangeFilter::from_str("fortnightly").unwrap_err();
    assert!(matches!(err, AppError::UnsupportedFilter(_)));
}
