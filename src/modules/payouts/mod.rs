pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Payout, PayoutStatus};
pub use services::PayoutService;
