use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::payouts::models::{Payout, PayoutStatus};
use crate::modules::payouts::repositories::PayoutRepository;
use crate::modules::reports::models::PayoutSummary;
use crate::modules::reports::services::aggregation;

/// Orchestrates the payout lifecycle against the store.
///
/// Every transition is validated twice: once on the loaded domain object
/// (fast rejection with a precise message) and once by the store's
/// conditional write, which is what actually guarantees that concurrent
/// transitions cannot both land.
#[derive(Clone)]
pub struct PayoutService {
    repo: Arc<dyn PayoutRepository>,
    min_payout_usd: Decimal,
}

impl PayoutService {
    pub fn new(repo: Arc<dyn PayoutRepository>, min_payout_usd: Decimal) -> Self {
        Self {
            repo,
            min_payout_usd,
        }
    }

    /// Submit a new payout request for an instructor
    pub async fn request_payout(
        &self,
        instructor_id: String,
        amount: Decimal,
        payee_email: String,
    ) -> Result<Payout> {
        if amount < self.min_payout_usd {
            return Err(AppError::validation(format!(
                "Payout amount {} is below the minimum of {}",
                amount, self.min_payout_usd
            )));
        }

        let payout = Payout::new(instructor_id, amount, payee_email)?;
        let created = self.repo.create(&payout).await?;

        info!(
            payout_id = %created.get_id().unwrap_or("?"),
            instructor_id = %created.instructor_id,
            "Payout requested"
        );

        Ok(created)
    }

    /// Approve a pending payout
    pub async fn approve_payout(&self, id: &str) -> Result<Payout> {
        let mut payout = self.load(id).await?;
        payout.approve()?;

        self.commit_transition(id, PayoutStatus::Pending, PayoutStatus::Approved, None)
            .await
    }

    /// Reject a pending payout
    pub async fn reject_payout(&self, id: &str) -> Result<Payout> {
        let mut payout = self.load(id).await?;
        payout.reject()?;

        self.commit_transition(id, PayoutStatus::Pending, PayoutStatus::Rejected, None)
            .await
    }

    /// Complete an approved payout, attaching the settlement reference
    pub async fn complete_payout(&self, id: &str, settlement_ref: &str) -> Result<Payout> {
        let mut payout = self.load(id).await?;
        payout.complete(settlement_ref.to_string())?;

        self.commit_transition(
            id,
            PayoutStatus::Approved,
            PayoutStatus::Completed,
            Some(settlement_ref),
        )
        .await
    }

    /// All payouts for one instructor
    pub async fn list_payouts(&self, instructor_id: &str) -> Result<Vec<Payout>> {
        self.repo.list_by_instructor(instructor_id).await
    }

    /// Settled and in-review totals for one instructor.
    ///
    /// Completed amounts count toward `total_payout`, pending amounts
    /// toward `pending_payout`; approved and rejected payouts appear in
    /// neither sum.
    pub async fn get_payout_summary(&self, instructor_id: &str) -> Result<PayoutSummary> {
        let payouts = self.repo.list_by_instructor(instructor_id).await?;
        Ok(aggregation::summarize_payouts(&payouts))
    }

    async fn load(&self, id: &str) -> Result<Payout> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payout with id '{}'", id)))
    }

    /// Apply the conditional write; a non-matching write on an existing row
    /// means another request transitioned the payout first.
    async fn commit_transition(
        &self,
        id: &str,
        expected: PayoutStatus,
        new_status: PayoutStatus,
        settlement_ref: Option<&str>,
    ) -> Result<Payout> {
        let matched = self
            .repo
            .update_status_if(id, expected, new_status, settlement_ref)
            .await?;

        if !matched {
            warn!(payout_id = %id, %expected, %new_status, "Concurrent payout transition lost");
            return Err(AppError::illegal_transition(format!(
                "payout '{}' is no longer {}; refusing to apply {}",
                id, expected, new_status
            )));
        }

        info!(payout_id = %id, status = %new_status, "Payout transitioned");
        self.load(id).await
    }
}
