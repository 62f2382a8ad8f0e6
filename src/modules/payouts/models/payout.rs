// Payout request lifecycle.
//
// A payout is an instructor's request to withdraw earned revenue. It is
// created in Pending state and only ever moves along
// Pending -> Approved -> Completed, or Pending -> Rejected. Completed and
// Rejected are terminal. The amount is fixed at creation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{money, AppError, Result};

/// Payout request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
pub enum PayoutStatus {
    /// Requested by the instructor, awaiting review
    #[serde(rename = "pending")]
    Pending,

    /// Accepted by an admin, awaiting settlement
    #[serde(rename = "approved")]
    Approved,

    /// Declined by an admin (terminal)
    #[serde(rename = "rejected")]
    Rejected,

    /// Settled externally (terminal)
    #[serde(rename = "completed")]
    Completed,
}

impl Default for PayoutStatus {
    fn default() -> Self {
        PayoutStatus::Pending
    }
}

impl std::fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayoutStatus::Pending => write!(f, "pending"),
            PayoutStatus::Approved => write!(f, "approved"),
            PayoutStatus::Rejected => write!(f, "rejected"),
            PayoutStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for PayoutStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PayoutStatus::Pending),
            "approved" => Ok(PayoutStatus::Approved),
            "rejected" => Ok(PayoutStatus::Rejected),
            "completed" => Ok(PayoutStatus::Completed),
            _ => Err(format!("Invalid payout status: {}", s)),
        }
    }
}

/// Instructor payout request
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payout {
    /// Unique payout ID (UUID)
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    /// Instructor requesting the payout
    pub instructor_id: String,

    /// Requested amount in USD; fixed at creation
    pub amount: Decimal,

    /// Contact address the settlement is sent to
    pub payee_email: String,

    /// Current lifecycle status
    #[serde(skip_deserializing)]
    pub status: PayoutStatus,

    /// External settlement reference, attached on completion
    pub settlement_ref: Option<String>,

    /// Creation timestamp, set by the store
    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update timestamp
    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Payout {
    /// Create a new payout request in Pending state
    ///
    /// # Arguments
    /// * `instructor_id` - Instructor requesting the withdrawal
    /// * `amount` - Requested amount in USD (must be non-negative)
    /// * `payee_email` - Settlement contact address
    pub fn new(instructor_id: String, amount: Decimal, payee_email: String) -> Result<Self> {
        if instructor_id.trim().is_empty() {
            return Err(AppError::validation("Instructor ID cannot be empty"));
        }

        money::validate_non_negative(amount).map_err(AppError::validation)?;

        if payee_email.trim().is_empty() {
            return Err(AppError::validation("Payee email cannot be empty"));
        }

        let now = Utc::now();

        Ok(Self {
            id: Some(Uuid::new_v4().to_string()),
            instructor_id,
            amount,
            payee_email,
            status: PayoutStatus::Pending,
            settlement_ref: None,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    /// Get payout ID
    pub fn get_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Accept a pending payout request.
    ///
    /// Legal only from Pending; re-approving an already approved payout
    /// fails so double-processing never happens silently.
    pub fn approve(&mut self) -> Result<()> {
        self.transition_to(PayoutStatus::Approved)
    }

    /// Decline a pending payout request. Legal only from Pending.
    pub fn reject(&mut self) -> Result<()> {
        self.transition_to(PayoutStatus::Rejected)
    }

    /// Mark an approved payout as settled, attaching the external
    /// settlement reference. Legal only from Approved.
    pub fn complete(&mut self, settlement_ref: String) -> Result<()> {
        if settlement_ref.trim().is_empty() {
            return Err(AppError::validation(
                "Settlement reference cannot be empty",
            ));
        }

        self.transition_to(PayoutStatus::Completed)?;
        self.settlement_ref = Some(settlement_ref);
        Ok(())
    }

    fn transition_to(&mut self, new_status: PayoutStatus) -> Result<()> {
        match (self.status, new_status) {
            (PayoutStatus::Pending, PayoutStatus::Approved)
            | (PayoutStatus::Pending, PayoutStatus::Rejected)
            | (PayoutStatus::Approved, PayoutStatus::Completed) => {
                self.status = new_status;
                self.updated_at = Some(Utc::now());
                Ok(())
            }
            (from, to) => Err(AppError::illegal_transition(format!(
                "payout '{}' cannot move from {} to {}",
                self.id.as_deref().unwrap_or("?"),
                from,
                to
            ))),
        }
    }

    /// Check whether the payout has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            PayoutStatus::Rejected | PayoutStatus::Completed
        )
    }
}
