use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::reports::models::{DateRange, OrderRecord};

/// Read-side boundary for course purchase records.
///
/// The order rows are denormalized at write time by the ordering
/// subsystem; this repository only ever reads a window of them.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All orders whose purchase timestamp falls inside the window,
    /// oldest first
    async fn fetch_orders_in_range(&self, range: &DateRange) -> Result<Vec<OrderRecord>>;
}

/// MySQL-backed order store
pub struct MySqlOrderRepository {
    pool: MySqlPool,
}

impl MySqlOrderRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const ORDER_COLUMNS: &str = r#"
    course_name, student_name, price_usd, created_at,
    student_id, teacher_id, course_id
"#;

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn fetch_orders_in_range(&self, range: &DateRange) -> Result<Vec<OrderRecord>> {
        let fetch_err =
            |e: sqlx::Error| AppError::internal(format!("Failed to fetch orders: {}", e));

        let orders = match (range.start, range.end) {
            (Some(start), Some(end)) => {
                sqlx::query_as::<_, OrderRecord>(&format!(
                    "SELECT {} FROM orders WHERE created_at >= ? AND created_at <= ? \
                     ORDER BY created_at ASC",
                    ORDER_COLUMNS
                ))
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await
                .map_err(fetch_err)?
            }
            (Some(start), None) => {
                sqlx::query_as::<_, OrderRecord>(&format!(
                    "SELECT {} FROM orders WHERE created_at >= ? ORDER BY created_at ASC",
                    ORDER_COLUMNS
                ))
                .bind(start)
                .fetch_all(&self.pool)
                .await
                .map_err(fetch_err)?
            }
            (None, Some(end)) => {
                sqlx::query_as::<_, OrderRecord>(&format!(
                    "SELECT {} FROM orders WHERE created_at <= ? ORDER BY created_at ASC",
                    ORDER_COLUMNS
                ))
                .bind(end)
                .fetch_all(&self.pool)
                .await
                .map_err(fetch_err)?
            }
            (None, None) => {
                sqlx::query_as::<_, OrderRecord>(&format!(
                    "SELECT {} FROM orders ORDER BY created_at ASC",
                    ORDER_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
                .map_err(fetch_err)?
            }
        };

        Ok(orders)
    }
}
