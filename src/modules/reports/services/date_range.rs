use chrono::{DateTime, Duration, Months, Utc};

use crate::core::{AppError, Result};
use crate::modules::reports::models::DateRange;

/// Date-range strategy selected by the report request's `type` field.
///
/// A closed set dispatched by enum so every variant is exhaustively
/// checkable; each strategy is a pure function of the injected `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFilter {
    /// Trailing 7 days, open upper end
    Weekly,
    /// Trailing calendar month, open upper end
    Monthly,
    /// Trailing 5 years, both bounds normalized to day boundaries
    Yearly,
    /// Caller-supplied bounds, passed through verbatim
    Custom,
}

impl std::fmt::Display for RangeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeFilter::Weekly => write!(f, "weekly"),
            RangeFilter::Monthly => write!(f, "monthly"),
            RangeFilter::Yearly => write!(f, "yearly"),
            RangeFilter::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for RangeFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(RangeFilter::Weekly),
            "monthly" => Ok(RangeFilter::Monthly),
            "yearly" => Ok(RangeFilter::Yearly),
            "custom" => Ok(RangeFilter::Custom),
            other => Err(AppError::unsupported_filter(other)),
        }
    }
}

/// Resolve a filter into a concrete window.
///
/// `now` is injected rather than read from the ambient clock so tests can
/// pin the reference instant. Explicit bounds are only consulted for
/// `Custom`.
pub fn resolve(
    filter: RangeFilter,
    now: DateTime<Utc>,
    explicit_start: Option<DateTime<Utc>>,
    explicit_end: Option<DateTime<Utc>>,
) -> Result<DateRange> {
    match filter {
        RangeFilter::Weekly => Ok(DateRange::new(Some(now - Duration::days(7)), None)),

        RangeFilter::Monthly => {
            let start = now
                .checked_sub_months(Months::new(1))
                .ok_or_else(|| AppError::internal("Date underflow computing monthly range"))?;
            Ok(DateRange::new(Some(start), None))
        }

        RangeFilter::Yearly => {
            let five_years_ago = now
                .checked_sub_months(Months::new(60))
                .ok_or_else(|| AppError::internal("Date underflow computing yearly range"))?;

            let start = five_years_ago
                .date_naive()
                .and_hms_milli_opt(0, 0, 0, 0)
                .expect("midnight is a valid time")
                .and_utc();
            let end = now
                .date_naive()
                .and_hms_milli_opt(23, 59, 59, 999)
                .expect("end of day is a valid time")
                .and_utc();

            Ok(DateRange::new(Some(start), Some(end)))
        }

        RangeFilter::Custom => {
            if let (Some(start), Some(end)) = (explicit_start, explicit_end) {
                if end < start {
                    return Err(AppError::invalid_range(format!(
                        "end date {} precedes start date {}",
                        end, start
                    )));
                }
            }
            Ok(DateRange::new(explicit_start, explicit_end))
        }
    }
}
