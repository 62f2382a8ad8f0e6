pub mod payouts;
pub mod reports;
