use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::infrastructure::storage::Storage;

#[get("/health")]
pub async fn health(storage: web::Data<Arc<Storage>>) -> HttpResponse {
    let storage_health = storage.check_health().await;
    let healthy = storage_health.is_healthy;
    let body = serde_json::json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage_health,
    });

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
