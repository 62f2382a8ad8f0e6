// Revenue and payout aggregation.
//
// All monetary accumulation stays at full Decimal precision; rounding to
// presentation scale happens in the rendering/serialization layer only.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::modules::payouts::models::{Payout, PayoutStatus};
use crate::modules::reports::models::{
    AggregationResult, DateRange, OrderRecord, PayoutSummary, RevenueBucket,
};
use crate::modules::reports::services::date_range::RangeFilter;

/// Sub-period size for the revenue-by-period series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketGranularity {
    Daily,
    Weekly,
    Monthly,
}

impl BucketGranularity {
    /// Pick the granularity implied by the filter kind. Custom windows pick
    /// by span: up to two weeks daily, up to a quarter weekly, monthly
    /// beyond that.
    pub fn for_filter(filter: RangeFilter, range: &DateRange, now: DateTime<Utc>) -> Self {
        match filter {
            RangeFilter::Weekly => BucketGranularity::Daily,
            RangeFilter::Monthly => BucketGranularity::Weekly,
            RangeFilter::Yearly => BucketGranularity::Monthly,
            RangeFilter::Custom => {
                let start = range.start.unwrap_or(now);
                let end = range.end.unwrap_or(now);
                let days = (end - start).num_days();
                if days <= 14 {
                    BucketGranularity::Daily
                } else if days <= 93 {
                    BucketGranularity::Weekly
                } else {
                    BucketGranularity::Monthly
                }
            }
        }
    }

    /// Chronologically sortable label of the period containing `day`
    fn label(&self, day: NaiveDate) -> String {
        match self {
            BucketGranularity::Daily => day.format("%Y-%m-%d").to_string(),
            BucketGranularity::Weekly => {
                let iso = day.iso_week();
                format!("{}-W{:02}", iso.year(), iso.week())
            }
            BucketGranularity::Monthly => day.format("%Y-%m").to_string(),
        }
    }

    /// First day of the period containing `day`
    fn align(&self, day: NaiveDate) -> NaiveDate {
        match self {
            BucketGranularity::Daily => day,
            BucketGranularity::Weekly => {
                day - Duration::days(day.weekday().num_days_from_monday() as i64)
            }
            BucketGranularity::Monthly => {
                day.with_day(1).expect("day 1 exists in every month")
            }
        }
    }

    /// First day of the following period
    fn advance(&self, period_start: NaiveDate) -> NaiveDate {
        match self {
            BucketGranularity::Daily => period_start + Duration::days(1),
            BucketGranularity::Weekly => period_start + Duration::days(7),
            BucketGranularity::Monthly => period_start
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX),
        }
    }
}

/// Aggregate a snapshot of order records over a window.
///
/// Records are filtered to the window (inclusive on every set bound; a
/// record without a timestamp survives only an unbounded window). Counts
/// are distinct-entity counts. `revenue_by_period` is pre-seeded with a
/// zero bucket for every sub-period of the effective window, so periods
/// without sales still appear.
pub fn aggregate(
    records: &[OrderRecord],
    range: &DateRange,
    granularity: BucketGranularity,
    now: DateTime<Utc>,
) -> AggregationResult {
    let in_window: Vec<&OrderRecord> = records
        .iter()
        .filter(|record| match record.created_at {
            Some(ts) => range.contains(ts),
            None => !range.is_bounded(),
        })
        .collect();

    let total_revenue: Decimal = in_window.iter().map(|record| record.revenue()).sum();

    let mut students = HashSet::new();
    let mut teachers = HashSet::new();
    let mut courses = HashSet::new();
    for record in &in_window {
        students.insert(record.student_id.as_str());
        teachers.insert(record.teacher_id.as_str());
        courses.insert(record.course_id.as_str());
    }

    AggregationResult {
        total_revenue,
        total_students: students.len() as i64,
        total_teachers: teachers.len() as i64,
        total_courses: courses.len() as i64,
        revenue_by_period: bucket_revenue(&in_window, range, granularity, now),
    }
}

/// Seed every sub-period of the effective window with zero, then pour the
/// in-window revenue into the matching slots. Open window ends clamp to
/// `now`; an open start clamps to the earliest in-window record.
fn bucket_revenue(
    in_window: &[&OrderRecord],
    range: &DateRange,
    granularity: BucketGranularity,
    now: DateTime<Utc>,
) -> Vec<RevenueBucket> {
    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();

    let window_end = range.end.unwrap_or(now);
    let window_start = range
        .start
        .or_else(|| in_window.iter().filter_map(|r| r.created_at).min());

    if let Some(window_start) = window_start {
        let end_day = window_end.date_naive();
        let mut cursor = granularity.align(window_start.date_naive());
        while cursor <= end_day {
            buckets.insert(granularity.label(cursor), Decimal::ZERO);
            cursor = granularity.advance(cursor);
        }
    }

    for record in in_window {
        if let Some(ts) = record.created_at {
            let label = granularity.label(ts.date_naive());
            *buckets.entry(label).or_insert(Decimal::ZERO) += record.revenue();
        }
    }

    buckets
        .into_iter()
        .map(|(label, revenue)| RevenueBucket { label, revenue })
        .collect()
}

/// Group an instructor's payouts by status: completed amounts count toward
/// the settled total, pending amounts toward the in-review total. Approved
/// and rejected payouts are in neither sum.
pub fn summarize_payouts(payouts: &[Payout]) -> PayoutSummary {
    let mut summary = PayoutSummary::zero();

    for payout in payouts {
        match payout.status {
            PayoutStatus::Completed => summary.total_payout += payout.amount,
            PayoutStatus::Pending => summary.pending_payout += payout.amount,
            PayoutStatus::Approved | PayoutStatus::Rejected => {}
        }
    }

    summary
}
