use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive aggregation window. Either bound may be absent for an
/// open-ended range; produced fresh per request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Unbounded range matching every record
    pub fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Whether an instant falls inside the window (inclusive on both set
    /// bounds)
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if instant < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if instant > end {
                return false;
            }
        }
        true
    }

    /// Whether at least one bound is set
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// One sub-period slot in the revenue-by-period series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBucket {
    /// Chronologically sortable period label, e.g. "2026-08", "2026-W32",
    /// "2026-08-05"
    pub label: String,
    pub revenue: Decimal,
}

/// Dashboard summary derived from a set of order records.
///
/// Counts are distinct-entity counts, not row counts. Recomputed on every
/// request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    pub total_revenue: Decimal,
    pub total_students: i64,
    pub total_teachers: i64,
    pub total_courses: i64,
    /// Chronologically ordered, pre-seeded with zero-revenue buckets so
    /// charting layers never see missing periods
    pub revenue_by_period: Vec<RevenueBucket>,
}

impl AggregationResult {
    /// Empty result over a window that produced no buckets
    pub fn empty() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            total_students: 0,
            total_teachers: 0,
            total_courses: 0,
            revenue_by_period: Vec::new(),
        }
    }
}

/// Instructor-scoped payout totals grouped by status.
///
/// Only settled (completed) and pending amounts are reported; approved and
/// rejected payouts are in neither sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutSummary {
    pub total_payout: Decimal,
    pub pending_payout: Decimal,
}

impl PayoutSummary {
    pub fn zero() -> Self {
        Self {
            total_payout: Decimal::ZERO,
            pending_payout: Decimal::ZERO,
        }
    }
}

/// A rendered report: bytes plus the metadata the HTTP layer needs to ship
/// it. Owned by the request that produced it.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub data: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}
