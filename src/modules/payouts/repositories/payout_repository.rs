use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::payouts::models::{Payout, PayoutStatus};

/// Persistence boundary for payout requests.
///
/// `update_status_if` is the conditional write that carries the state
/// machine's atomicity guarantee: the store only applies the new status if
/// the currently persisted status still matches `expected`. Two concurrent
/// approvals of one payout therefore cannot both succeed; the loser sees
/// `false` and is surfaced as an illegal transition.
#[async_trait]
pub trait PayoutRepository: Send + Sync {
    /// Persist a new payout request
    async fn create(&self, payout: &Payout) -> Result<Payout>;

    /// Find payout by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Payout>>;

    /// All payouts for one instructor, newest first
    async fn list_by_instructor(&self, instructor_id: &str) -> Result<Vec<Payout>>;

    /// Compare-and-swap status update.
    ///
    /// Returns `true` when the stored status matched `expected` and the row
    /// was updated, `false` when the row exists with a different status.
    async fn update_status_if(
        &self,
        id: &str,
        expected: PayoutStatus,
        new_status: PayoutStatus,
        settlement_ref: Option<&str>,
    ) -> Result<bool>;
}

/// MySQL-backed payout store
pub struct MySqlPayoutRepository {
    pool: MySqlPool,
}

impl MySqlPayoutRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayoutRepository for MySqlPayoutRepository {
    async fn create(&self, payout: &Payout) -> Result<Payout> {
        let id = payout
            .id
            .as_ref()
            .ok_or_else(|| AppError::internal("Payout ID is required for creation"))?;

        sqlx::query(
            r#"
            INSERT INTO payouts (
                id, instructor_id, amount, payee_email, status, settlement_ref
            )
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&payout.instructor_id)
        .bind(payout.amount)
        .bind(&payout.payee_email)
        .bind(payout.status.to_string())
        .bind(&payout.settlement_ref)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create payout: {}", e)))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Payout was created but not found"))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Payout>> {
        let payout = sqlx::query_as::<_, Payout>(
            r#"
            SELECT
                id, instructor_id, amount, payee_email, status,
                settlement_ref, created_at, updated_at
            FROM payouts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to fetch payout: {}", e)))?;

        Ok(payout)
    }

    async fn list_by_instructor(&self, instructor_id: &str) -> Result<Vec<Payout>> {
        let payouts = sqlx::query_as::<_, Payout>(
            r#"
            SELECT
                id, instructor_id, amount, payee_email, status,
                settlement_ref, created_at, updated_at
            FROM payouts
            WHERE instructor_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(instructor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::internal(format!("Failed to fetch payouts for instructor: {}", e))
        })?;

        Ok(payouts)
    }

    async fn update_status_if(
        &self,
        id: &str,
        expected: PayoutStatus,
        new_status: PayoutStatus,
        settlement_ref: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE payouts
            SET status = ?,
                settlement_ref = COALESCE(?, settlement_ref),
                updated_at = NOW()
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(new_status.to_string())
        .bind(settlement_ref)
        .bind(id)
        .bind(expected.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to update payout status: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
