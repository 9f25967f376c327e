use actix_web::{get, post, web, HttpResponse};
use restaurant_wallet_core::core::withdrawals::WithdrawalFilter;
use restaurant_wallet_core::{Page, PageRequest, WithdrawalStatus};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::app::{WithdrawalService, WithdrawalView};
use crate::domain::error::ApiError;
use crate::middleware::auth::{AdminUser, AuthenticatedUser, RestaurantUser};
use crate::utils::sanitizer::InputSanitizer;

type Service = web::Data<Arc<WithdrawalService>>;

#[derive(Debug, Deserialize)]
pub struct CreateWithdrawalBody {
    pub amount: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectBody {
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub restaurant_id: Option<String>,
    pub processed_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub restaurant_id: Option<String>,
}

fn parse_status(status: Option<&str>) -> Result<Option<WithdrawalStatus>, ApiError> {
    match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Ok(Some(raw.parse::<WithdrawalStatus>()?)),
        None => Ok(None),
    }
}

fn clean_id(raw: &str) -> Result<String, ApiError> {
    InputSanitizer::new()
        .sanitize_id(raw)
        .into_result()
        .map_err(ApiError::BadRequest)?
        .ok_or_else(|| ApiError::BadRequest("Missing identifier".to_string()))
}

fn optional_id(raw: Option<&str>) -> Result<Option<String>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => clean_id(id).map(Some),
        None => Ok(None),
    }
}

/// An empty body means no reason; anything else must be a valid `RejectBody`.
fn parse_reject_body(raw: &[u8]) -> Result<RejectBody, ApiError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(RejectBody::default());
    }
    serde_json::from_slice(raw).map_err(|e| ApiError::BadRequest(format!("Invalid reject body: {}", e)))
}

fn list_response(page: Page<WithdrawalView>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "requests": page.items,
        "pagination": page.pagination,
    }))
}

#[post("/restaurant/withdrawals")]
pub async fn create_withdrawal(
    user: RestaurantUser,
    service: Service,
    body: web::Json<CreateWithdrawalBody>,
) -> Result<HttpResponse, ApiError> {
    let request = service.create_request(&user.0, body.amount).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Withdrawal request submitted",
        "request": request,
    })))
}

#[get("/restaurant/withdrawals")]
pub async fn list_own_withdrawals(
    user: RestaurantUser,
    service: Service,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let status = parse_status(query.status.as_deref())?;
    let page = PageRequest::new(query.page, query.limit);

    let page = service.list_for_restaurant(&user.0, status, page).await?;
    Ok(list_response(page))
}

#[get("/restaurant/withdrawals/balance")]
pub async fn available_balance(user: RestaurantUser, service: Service) -> Result<HttpResponse, ApiError> {
    let breakdown = service.available_balance(&user.0).await?;
    Ok(HttpResponse::Ok().json(breakdown))
}

#[get("/restaurant/wallet")]
pub async fn get_wallet(user: RestaurantUser, service: Service) -> Result<HttpResponse, ApiError> {
    let wallet = service.wallet(&user.0).await?;
    Ok(HttpResponse::Ok().json(wallet))
}

#[get("/withdrawals/{id}")]
pub async fn get_withdrawal(
    user: AuthenticatedUser,
    service: Service,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = clean_id(&path)?;
    let scope = if user.is_admin() { None } else { Some(user.id.as_str()) };

    let view = service.get_request(&id, scope).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[get("/admin/withdrawals")]
pub async fn list_all_withdrawals(
    _admin: AdminUser,
    service: Service,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    let sanitizer = InputSanitizer::new();
    let filter = WithdrawalFilter {
        status: parse_status(query.status.as_deref())?,
        restaurant_id: optional_id(query.restaurant_id.as_deref())?,
        processed_by: optional_id(query.processed_by.as_deref())?,
        search: sanitizer
            .sanitize_search(query.search.as_deref())
            .into_result()
            .map_err(ApiError::BadRequest)?,
    };
    let page = PageRequest::new(query.page, query.limit);

    let page = service.list_all(&filter, page).await?;
    Ok(list_response(page))
}

#[get("/admin/withdrawals/stats")]
pub async fn withdrawal_stats(
    _admin: AdminUser,
    service: Service,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, ApiError> {
    let restaurant_id = optional_id(query.restaurant_id.as_deref())?;
    let stats = service.stats(restaurant_id.as_deref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[post("/admin/withdrawals/{id}/approve")]
pub async fn approve_withdrawal(
    admin: AdminUser,
    service: Service,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = clean_id(&path)?;
    let request = service.approve(&id, &admin.0).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Withdrawal request approved",
        "request": request,
    })))
}

#[post("/admin/withdrawals/{id}/reject")]
pub async fn reject_withdrawal(
    admin: AdminUser,
    service: Service,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let id = clean_id(&path)?;
    let body = parse_reject_body(&body)?;
    let reason = InputSanitizer::new()
        .sanitize_reason(body.reason.as_deref())
        .into_result()
        .map_err(ApiError::BadRequest)?;

    let request = service.reject(&id, &admin.0, reason).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Withdrawal request rejected",
        "request": request,
    })))
}
