use actix_web::{guard, web, HttpResponse};
use auth_middleware::{Identity, RemoteAuth, RemoteVerifier, RequireRole, Role};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::error::PassportError;
use crate::models::{BatteryPassport, PassportData};
use crate::store::{Page, PassportFilter};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PassportPayload {
    pub data: PassportData,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// POST /api/passports
pub async fn create_passport(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PassportPayload>,
) -> Result<HttpResponse, PassportError> {
    let passport = BatteryPassport::new(body.into_inner().data, identity.subject_id);
    let passport = state.store.insert(passport).await?;

    // The mutation is committed; a lost event is observable in logs only.
    if let Err(e) = state
        .events
        .passport_created(&passport, identity.subject_id)
        .await
    {
        warn!(passport_id = %passport.id, error = %e, "failed to publish passport.created");
    }

    info!(battery_identifier = %passport.battery_identifier(), "battery passport created");

    Ok(HttpResponse::Created().json(json!({
        "message": "Battery passport created successfully",
        "passport": passport,
    })))
}

/// GET /api/passports/{id}
pub async fn get_passport(
    state: web::Data<AppState>,
    id: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, PassportError> {
    let passport = state.store.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "passport": passport })))
}

/// PUT /api/passports/{id}
pub async fn update_passport(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<uuid::Uuid>,
    body: web::Json<PassportPayload>,
) -> Result<HttpResponse, PassportError> {
    let passport = state
        .store
        .update(id.into_inner(), body.into_inner().data, identity.subject_id)
        .await?;

    if let Err(e) = state
        .events
        .passport_updated(&passport, identity.subject_id)
        .await
    {
        warn!(passport_id = %passport.id, error = %e, "failed to publish passport.updated");
    }

    info!(battery_identifier = %passport.battery_identifier(), "battery passport updated");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Battery passport updated successfully",
        "passport": passport,
    })))
}

/// DELETE /api/passports/{id}
pub async fn delete_passport(
    state: web::Data<AppState>,
    identity: Identity,
    id: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, PassportError> {
    let passport = state
        .store
        .soft_delete(id.into_inner(), identity.subject_id)
        .await?;

    if let Err(e) = state
        .events
        .passport_deleted(&passport, identity.subject_id)
        .await
    {
        warn!(passport_id = %passport.id, error = %e, "failed to publish passport.deleted");
    }

    info!(battery_identifier = %passport.battery_identifier(), "battery passport deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Battery passport deleted successfully",
    })))
}

/// GET /api/passports
pub async fn list_passports(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, PassportError> {
    let query = query.into_inner();
    let page = Page {
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(10).clamp(1, 100),
    };
    let filter = PassportFilter {
        category: query.category,
        status: query.status,
    };

    let (passports, total) = state.store.list(filter, page).await;
    let pages = total.div_ceil(page.limit);

    Ok(HttpResponse::Ok().json(json!({
        "passports": passports,
        "pagination": {
            "page": page.page,
            "limit": page.limit,
            "total": total,
            "pages": pages,
        },
    })))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "service": "Battery Passport Service",
        "timestamp": Utc::now(),
    }))
}

/// All passport routes require a verified identity; mutations additionally
/// require the admin role. Reads sit behind a GET guard so every other
/// method falls through to the admin-gated scope.
pub fn register_routes(cfg: &mut web::ServiceConfig, verifier: RemoteVerifier) {
    cfg.service(
        web::scope("/api/passports")
            .wrap(RemoteAuth::new(verifier))
            .service(
                web::scope("")
                    .guard(guard::Get())
                    .route("", web::get().to(list_passports))
                    .route("/{id}", web::get().to(get_passport)),
            )
            .service(
                web::scope("")
                    .wrap(RequireRole::new(&[Role::Admin]))
                    .route("", web::post().to(create_passport))
                    .route("/{id}", web::put().to(update_passport))
                    .route("/{id}", web::delete().to(delete_passport)),
            ),
    );
}
