use std::str::FromStr;
use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::core::{money, AppError, Result};
use crate::modules::reports::models::{AggregationResult, RevenueBucket};
use crate::modules::reports::repositories::MySqlOrderRepository;
use crate::modules::reports::services::date_range::RangeFilter;
use crate::modules::reports::services::renderer::ReportFormat;
use crate::modules::reports::services::ReportService;

/// Query parameters shared by the dashboard and export endpoints
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Date-range filter kind: weekly | monthly | yearly | custom
    #[serde(rename = "type")]
    pub filter_type: String,
    /// Output format for exports: json | csv | pdf
    #[serde(default)]
    pub format: Option<String>,
    /// Custom range start (inclusive, format: YYYY-MM-DD)
    #[serde(default)]
    pub start_date: Option<String>,
    /// Custom range end (inclusive, format: YYYY-MM-DD)
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Dashboard response with monetary values at presentation scale
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_revenue: String,
    pub total_students: i64,
    pub total_teachers: i64,
    pub total_courses: i64,
    pub revenue_by_period: Vec<RevenueBucketResponse>,
}

#[derive(Debug, Serialize)]
pub struct RevenueBucketResponse {
    pub period: String,
    pub revenue: String,
}

impl From<AggregationResult> for DashboardResponse {
    fn from(result: AggregationResult) -> Self {
        Self {
            total_revenue: money::format_usd(result.total_revenue),
            total_students: result.total_students,
            total_teachers: result.total_teachers,
            total_courses: result.total_courses,
            revenue_by_period: result
                .revenue_by_period
                .into_iter()
                .map(RevenueBucketResponse::from)
                .collect(),
        }
    }
}

impl From<RevenueBucket> for RevenueBucketResponse {
    fn from(bucket: RevenueBucket) -> Self {
        Self {
            period: bucket.label,
            revenue: money::format_usd(bucket.revenue),
        }
    }
}

/// GET /reports/dashboard
///
/// Aggregated revenue statistics for the requested window.
pub async fn get_dashboard(
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let filter = RangeFilter::from_str(&query.filter_type)?;
    let (start, end) = parse_bounds(&query)?;

    let service = report_service(&pool);
    let result = service.get_dashboard_data(filter, start, end).await?;

    Ok(HttpResponse::Ok().json(DashboardResponse::from(result)))
}

/// GET /reports/export
///
/// Rendered report artifact; the body is the raw bytes with the format's
/// content type and a download filename.
pub async fn export_report(
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse> {
    let filter = RangeFilter::from_str(&query.filter_type)?;
    let format = ReportFormat::from_str(query.format.as_deref().unwrap_or("json"))?;
    let (start, end) = parse_bounds(&query)?;

    let service = report_service(&pool);
    let artifact = service.get_report_data(format, filter, start, end).await?;

    Ok(HttpResponse::Ok()
        .content_type(artifact.content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", artifact.filename),
        ))
        .body(artifact.data))
}

fn report_service(pool: &web::Data<MySqlPool>) -> ReportService {
    ReportService::new(Arc::new(MySqlOrderRepository::new(pool.get_ref().clone())))
}

/// Parse optional YYYY-MM-DD bounds into inclusive day-boundary instants
fn parse_bounds(
    query: &ReportQuery,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let start = query
        .start_date
        .as_deref()
        .map(|raw| parse_day(raw, "start_date").map(day_start))
        .transpose()?;

    let end = query
        .end_date
        .as_deref()
        .map(|raw| parse_day(raw, "end_date").map(day_end))
        .transpose()?;

    Ok((start, end))
}

fn parse_day(raw: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!(
            "Invalid {} format: '{}'. Expected YYYY-MM-DD",
            field, raw
        ))
    })
}

fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_milli_opt(0, 0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
}

fn day_end(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_milli_opt(23, 59, 59, 999)
        .expect("end of day is a valid time")
        .and_utc()
}

/// Configure routes for the reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/dashboard", web::get().to(get_dashboard))
            .route("/export", web::get().to(export_report)),
    );
}
