// End-to-end reporting pipeline against an in-memory order store:
// resolve -> fetch -> aggregate -> render, with a pinned reference
// instant.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use edupay::core::{AppError, Result};
use edupay::modules::reports::models::{DateRange, OrderRecord};
use edupay::modules::reports::repositories::OrderRepository;
use edupay::modules::reports::services::date_range::RangeFilter;
use edupay::modules::reports::services::renderer::ReportFormat;
use edupay::modules::reports::services::ReportService;

struct InMemoryOrderStore {
    orders: Vec<OrderRecord>,
}

#[async_trait]
impl OrderRepository for InMemoryOrderStore {
    async fn fetch_orders_in_range(&self, range: &DateRange) -> Result<Vec<OrderRecord>> {
        tokio::task::yield_now().await;
        Ok(self
            .orders
            .iter()
            .filter(|order| match order.created_at {
                Some(ts) => range.contains(ts),
                None => !range.is_bounded(),
            })
            .cloned()
            .collect())
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 8, 12, 0, 0).unwrap()
}

fn order(
    student: &str,
    course: &str,
    price: Decimal,
    ts: DateTime<Utc>,
) -> OrderRecord {
    OrderRecord {
        course_name: Some(format!("Course {}", course)),
        student_name: Some(format!("Student {}", student)),
        price_usd: Some(price),
        created_at: Some(ts),
        student_id: format!("stu-{}", student),
        teacher_id: "teach-1".to_string(),
        course_id: format!("crs-{}", course),
    }
}

fn service_with_orders(orders: Vec<OrderRecord>) -> ReportService {
    ReportService::new(Arc::new(InMemoryOrderStore { orders }))
}

#[tokio::test]
async fn weekly_dashboard_covers_trailing_week_only() {
    let service = service_with_orders(vec![
        order("a", "1", dec!(20), now() - Duration::days(2)),
        order("b", "2", dec!(30), now() - Duration::days(5)),
        order("c", "3", dec!(999), now() - Duration::days(30)),
    ]);

    let result = service
        .dashboard_at(RangeFilter::Weekly, None, None, now())
        .await
        .unwrap();

    assert_eq!(result.total_revenue, dec!(50));
    assert_eq!(result.total_students, 2);
    assert_eq!(result.total_courses, 2);
    assert_eq!(result.total_teachers, 1);

    // daily buckets across the trailing week, zero-gap
    assert_eq!(result.revenue_by_period.len(), 8);
    let non_zero: Vec<&str> = result
        .revenue_by_period
        .iter()
        .filter(|b| b.revenue > dec!(0))
        .map(|b| b.label.as_str())
        .collect();
    assert_eq!(non_zero, vec!["2026-08-03", "2026-08-06"]);
}

#[tokio::test]
async fn yearly_dashboard_buckets_by_month() {
    let service = service_with_orders(vec![
        order("a", "1", dec!(100), Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap()),
        order("b", "2", dec!(200), Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap()),
    ]);

    let result = service
        .dashboard_at(RangeFilter::Yearly, None, None, now())
        .await
        .unwrap();

    assert_eq!(result.total_revenue, dec!(300));
    // aug 2021 .. aug 2026, one bucket per month
    assert_eq!(result.revenue_by_period.len(), 61);
    assert!(result
        .revenue_by_period
        .iter()
        .any(|b| b.label == "2024-03" && b.revenue == dec!(100)));
}

#[tokio::test]
async fn custom_range_errors_propagate_unchanged() {
    let service = service_with_orders(vec![]);

    let start = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();

    let err = service
        .dashboard_at(RangeFilter::Custom, Some(start), Some(end), now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidRange(_)));
}

#[tokio::test]
async fn csv_export_carries_window_rows_and_total() {
    let service = service_with_orders(vec![
        order("a", "1", dec!(19.99), now() - Duration::days(1)),
        order("b", "2", dec!(35.50), now() - Duration::days(3)),
    ]);

    let artifact = service
        .report_at(ReportFormat::Csv, RangeFilter::Weekly, None, None, now())
        .await
        .unwrap();

    assert_eq!(artifact.content_type, "text/csv");
    assert_eq!(artifact.filename, "revenue-report-2026-08-08.csv");

    let sheet = String::from_utf8(artifact.data).unwrap();
    assert!(sheet.contains("Course 1,Student a,19.99,2026-08-07"));
    assert!(sheet.contains("Total Revenue,,55.49,"));
}

#[tokio::test]
async fn json_export_round_trips_structured_rows() {
    let service = service_with_orders(vec![order(
        "a",
        "1",
        dec!(42),
        now() - Duration::days(1),
    )]);

    let artifact = service
        .report_at(ReportFormat::Json, RangeFilter::Weekly, None, None, now())
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&artifact.data).unwrap();
    assert_eq!(value["orders"].as_array().unwrap().len(), 1);
    assert_eq!(value["orders"][0]["student_id"], "stu-a");
    assert_eq!(value["total_revenue"], "42");
}

#[tokio::test]
async fn pdf_export_renders_document() {
    let service = service_with_orders(
        (0..60)
            .map(|i| {
                order(
                    &format!("s{}", i),
                    &format!("c{}", i),
                    dec!(10),
                    now() - Duration::days(2),
                )
            })
            .collect(),
    );

    let artifact = service
        .report_at(ReportFormat::Pdf, RangeFilter::Weekly, None, None, now())
        .await
        .unwrap();

    assert_eq!(artifact.content_type, "application/pdf");
    assert!(artifact.data.starts_with(b"%PDF"));
}

#[tokio::test]
async fn empty_window_export_still_produces_artifact() {
    let service = service_with_orders(vec![]);

    let artifact = service
        .report_at(ReportFormat::Csv, RangeFilter::Monthly, None, None, now())
        .await
        .unwrap();

    let sheet = String::from_utf8(artifact.data).unwrap();
    let lines: Vec<&str> = sheet.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "Total Revenue,,0.00,");
}
