pub mod payout_repository;

pub use payout_repository::{MySqlPayoutRepository, PayoutRepository};
