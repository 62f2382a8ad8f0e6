use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::core::Result;
use crate::modules::reports::models::{AggregationResult, DateRange, OrderRecord, ReportArtifact};
use crate::modules::reports::repositories::OrderRepository;
use crate::modules::reports::services::aggregation::{self, BucketGranularity};
use crate::modules::reports::services::date_range::{self, RangeFilter};
use crate::modules::reports::services::renderer::{self, ReportFormat};

/// Facade over the reporting pipeline: resolve the window, fetch the raw
/// records, aggregate, and (for exports) render.
///
/// Fails fast; each component's error propagates unchanged. The record
/// fetch is the pipeline's only I/O suspend point and is never retried
/// here.
#[derive(Clone)]
pub struct ReportService {
    orders: Arc<dyn OrderRepository>,
}

impl ReportService {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    /// Summary statistics for the admin dashboard
    pub async fn get_dashboard_data(
        &self,
        filter: RangeFilter,
        explicit_start: Option<DateTime<Utc>>,
        explicit_end: Option<DateTime<Utc>>,
    ) -> Result<AggregationResult> {
        self.dashboard_at(filter, explicit_start, explicit_end, Utc::now())
            .await
    }

    /// Rendered export artifact in the requested format
    pub async fn get_report_data(
        &self,
        format: ReportFormat,
        filter: RangeFilter,
        explicit_start: Option<DateTime<Utc>>,
        explicit_end: Option<DateTime<Utc>>,
    ) -> Result<ReportArtifact> {
        self.report_at(format, filter, explicit_start, explicit_end, Utc::now())
            .await
    }

    /// Dashboard pipeline against an explicit reference instant
    pub async fn dashboard_at(
        &self,
        filter: RangeFilter,
        explicit_start: Option<DateTime<Utc>>,
        explicit_end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<AggregationResult> {
        let (range, records) = self
            .fetch_window(filter, explicit_start, explicit_end, now)
            .await?;

        let granularity = BucketGranularity::for_filter(filter, &range, now);
        Ok(aggregation::aggregate(&records, &range, granularity, now))
    }

    /// Export pipeline against an explicit reference instant
    pub async fn report_at(
        &self,
        format: ReportFormat,
        filter: RangeFilter,
        explicit_start: Option<DateTime<Utc>>,
        explicit_end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<ReportArtifact> {
        let (range, records) = self
            .fetch_window(filter, explicit_start, explicit_end, now)
            .await?;

        let granularity = BucketGranularity::for_filter(filter, &range, now);
        let result = aggregation::aggregate(&records, &range, granularity, now);

        let artifact = renderer::render(format, &records, result.total_revenue, now)?;
        info!(
            format = %format,
            rows = records.len(),
            bytes = artifact.data.len(),
            "Report rendered"
        );

        Ok(artifact)
    }

    async fn fetch_window(
        &self,
        filter: RangeFilter,
        explicit_start: Option<DateTime<Utc>>,
        explicit_end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(DateRange, Vec<OrderRecord>)> {
        let range = date_range::resolve(filter, now, explicit_start, explicit_end)?;
        let records = self.orders.fetch_orders_in_range(&range).await?;

        if records.is_empty() {
            warn!(filter = %filter, "No order records in reporting window");
        } else {
            info!(filter = %filter, rows = records.len(), "Fetched reporting window");
        }

        Ok((range, records))
    }
}
