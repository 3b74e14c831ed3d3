//! Review dashboard endpoints for seller applications.

use crate::{
    api,
    front::{AppState, errors},
    models::application::ApplicationStatus,
};
use ntex::web;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
    pub notes: Option<String>,
}

/// Creates an application directly from the dashboard.
#[web::post("")]
pub async fn create(
    body: web::types::Json<api::application::CreateApplicationRequest>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let request = body.into_inner();
    if !request.fields_are_valid() {
        return Err(
            errors::ApiError::InvalidInput("seller_name and a valid email are required".into())
                .into(),
        );
    }

    let application = api::application::create_application(
        request,
        &app_state.repo,
        &app_state.notification_sink,
    )
    .await
    .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Created().json(&application))
}

/// Lists applications, optionally filtered by status.
/// `?status=all` and no filter both return everything.
#[web::get("")]
pub async fn list(
    query: web::types::Query<ListQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(ApplicationStatus::parse(raw).ok_or_else(|| {
            errors::ApiError::InvalidInput(format!("unknown status filter: {}", raw))
        })?),
    };

    let applications = api::application::list_applications(status, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&applications))
}

/// Per-status application counts for the dashboard header.
#[web::get("/stats")]
pub async fn stats(
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let stats = api::application::status_stats(&app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&stats))
}

#[web::get("/{application_id}")]
pub async fn get_by_id(
    path: web::types::Path<i64>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let application = api::application::get_application(*path, &app_state.repo)
        .await
        .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&application))
}

/// Moves an application through its review lifecycle. Invalid transitions
/// come back as 409 without touching the row.
#[web::patch("/{application_id}/status")]
pub async fn update_status(
    path: web::types::Path<i64>,
    body: web::types::Json<UpdateStatusRequest>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let request = body.into_inner();
    let application = api::application::update_status(
        *path,
        request.status,
        request.notes,
        &app_state.repo,
        &app_state.notification_sink,
    )
    .await
    .map_err(errors::ApiError::from)?;

    Ok(web::HttpResponse::Ok().json(&application))
}
