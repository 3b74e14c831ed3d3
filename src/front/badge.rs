//! Badge issuance and public verification endpoints.

use crate::{
    api, config,
    front::{AppState, errors},
};
use ntex::web;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueBadgeRequest {
    pub application_id: i64,
    /// Numeric seller level: 1 verified, 2 trusted, 3 golden.
    pub level: Option<u8>,
}

/// Issues a badge for a qualified application and activates it.
#[web::post("")]
pub async fn issue(
    body: web::types::Json<IssueBadgeRequest>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let request = body.into_inner();
    let (badge, seller) = api::badge::issue_badge(
        request.application_id,
        request.level.unwrap_or(1),
        &app_state.repo,
        &app_state.notification_sink,
    )
    .await
    .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Created().json(&serde_json::json!({
        "badge": badge,
        "seller": seller,
        "badgeUrl": config::APP_CONFIG.badge_url(&badge.code),
    })))
}

/// Public verification endpoint. Unknown codes answer `valid: false`
/// instead of 404 so the response shape stays uniform for embedders.
#[web::get("/code/{code}")]
pub async fn verify(
    path: web::types::Path<String>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let verification = api::badge::verify_badge_code(&path, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    let response = match verification {
        Some(verification) => web::HttpResponse::Ok().json(&verification),
        None => web::HttpResponse::Ok().json(&serde_json::json!({ "valid": false })),
    };

    Ok(response)
}

#[web::get("/seller/{seller_id}")]
pub async fn list_by_seller(
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let badges = api::badge::get_seller_badges(*path, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&badges))
}

/// Seller profile with every badge issued to them.
#[web::get("/{seller_id}")]
pub async fn seller_profile(
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let (seller, badges) = api::badge::get_seller_profile(*path, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&serde_json::json!({
        "seller": seller,
        "badges": badges,
    })))
}

#[web::get("/{badge_id}")]
pub async fn get_by_id(
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let badge = api::badge::get_badge(*path, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&badge))
}

#[web::post("/{badge_id}/renew")]
pub async fn renew(
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let badge = api::badge::renew_badge(*path, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&badge))
}

#[web::post("/{badge_id}/suspend")]
pub async fn suspend(
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let badge = api::badge::suspend_badge(*path, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&badge))
}

#[web::post("/{badge_id}/revoke")]
pub async fn revoke(
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let badge = api::badge::revoke_badge(*path, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&badge))
}
