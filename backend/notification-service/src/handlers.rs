use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::events::NotificationStats;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "service": "Notification Service",
        "timestamp": Utc::now(),
    }))
}

/// GET /api/notifications/stats
pub async fn stats(stats: web::Data<Arc<NotificationStats>>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "service": "Notification Service",
        "status": "running",
        "timestamp": Utc::now(),
        "stats": {
            "delivered": stats.delivered(),
            "failed": stats.failed(),
        },
    }))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notifications")
            .route("/health", web::get().to(health))
            .route("/stats", web::get().to(stats)),
    );
}
