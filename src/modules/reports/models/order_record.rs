use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw course-purchase record fetched from the order store.
///
/// Reporting rows are denormalized at fetch time; optional fields reflect
/// legacy orders where the joined course or student row no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderRecord {
    /// Course title at time of purchase
    pub course_name: Option<String>,

    /// Purchasing student's display name
    pub student_name: Option<String>,

    /// Sale price in USD
    pub price_usd: Option<Decimal>,

    /// Purchase timestamp
    pub created_at: Option<DateTime<Utc>>,

    /// Purchasing student
    pub student_id: String,

    /// Instructor who owns the course
    pub teacher_id: String,

    /// Purchased course
    pub course_id: String,
}

impl OrderRecord {
    /// Revenue contributed by this record; absent prices count as zero
    pub fn revenue(&self) -> Decimal {
        self.price_usd.unwrap_or(Decimal::ZERO)
    }
}
