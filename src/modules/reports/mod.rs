pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{AggregationResult, DateRange, OrderRecord, PayoutSummary, ReportArtifact};
pub use services::ReportService;
