use std::sync::Arc;

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

use crate::config::Config;
use crate::core::{money, Result};
use crate::modules::payouts::models::Payout;
use crate::modules::payouts::repositories::MySqlPayoutRepository;
use crate::modules::payouts::services::PayoutService;
use crate::modules::reports::models::PayoutSummary;

#[derive(Debug, Deserialize)]
pub struct CreatePayoutRequest {
    pub instructor_id: String,
    pub amount: Decimal,
    pub payee_email: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletePayoutRequest {
    pub settlement_ref: String,
}

/// Payout representation returned to callers; monetary values at
/// presentation scale
#[derive(Debug, Serialize)]
pub struct PayoutResponse {
    pub id: Option<String>,
    pub instructor_id: String,
    pub amount: String,
    pub payee_email: String,
    pub status: String,
    pub settlement_ref: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Payout> for PayoutResponse {
    fn from(payout: Payout) -> Self {
        Self {
            id: payout.id,
            instructor_id: payout.instructor_id,
            amount: money::format_usd(payout.amount),
            payee_email: payout.payee_email,
            status: payout.status.to_string(),
            settlement_ref: payout.settlement_ref,
            created_at: payout.created_at.map(|ts| ts.to_rfc3339()),
            updated_at: payout.updated_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PayoutSummaryResponse {
    pub total_payout: String,
    pub pending_payout: String,
}

impl From<PayoutSummary> for PayoutSummaryResponse {
    fn from(summary: PayoutSummary) -> Self {
        Self {
            total_payout: money::format_usd(summary.total_payout),
            pending_payout: money::format_usd(summary.pending_payout),
        }
    }
}

/// POST /payouts
pub async fn request_payout(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    body: web::Json<CreatePayoutRequest>,
) -> Result<HttpResponse> {
    let body = body.into_inner();
    let payout = payout_service(&pool, &config)
        .request_payout(body.instructor_id, body.amount, body.payee_email)
        .await?;

    Ok(HttpResponse::Created().json(PayoutResponse::from(payout)))
}

/// POST /payouts/{id}/approve
pub async fn approve_payout(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let payout = payout_service(&pool, &config)
        .approve_payout(&path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(PayoutResponse::from(payout)))
}

/// POST /payouts/{id}/reject
pub async fn reject_payout(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let payout = payout_service(&pool, &config)
        .reject_payout(&path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(PayoutResponse::from(payout)))
}

/// POST /payouts/{id}/complete
pub async fn complete_payout(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<String>,
    body: web::Json<CompletePayoutRequest>,
) -> Result<HttpResponse> {
    let payout = payout_service(&pool, &config)
        .complete_payout(&path.into_inner(), &body.settlement_ref)
        .await?;

    Ok(HttpResponse::Ok().json(PayoutResponse::from(payout)))
}

/// GET /payouts/instructor/{instructor_id}
pub async fn list_payouts(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let payouts = payout_service(&pool, &config)
        .list_payouts(&path.into_inner())
        .await?;

    let response: Vec<PayoutResponse> = payouts.into_iter().map(PayoutResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// GET /payouts/instructor/{instructor_id}/summary
pub async fn payout_summary(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let summary = payout_service(&pool, &config)
        .get_payout_summary(&path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(PayoutSummaryResponse::from(summary)))
}

fn payout_service(pool: &web::Data<MySqlPool>, config: &web::Data<Config>) -> PayoutService {
    PayoutService::new(
        Arc::new(MySqlPayoutRepository::new(pool.get_ref().clone())),
        config.app.min_payout_usd,
    )
}

/// Configure routes for the payouts module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payouts")
            .route("", web::post().to(request_payout))
            .route("/instructor/{instructor_id}", web::get().to(list_payouts))
            .route(
                "/instructor/{instructor_id}/summary",
                web::get().to(payout_summary),
            )
            .route("/{id}/approve", web::post().to(approve_payout))
            .route("/{id}/reject", web::post().to(reject_payout))
            .route("/{id}/complete", web::post().to(complete_payout)),
    );
}
