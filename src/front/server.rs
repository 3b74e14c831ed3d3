//! Service-level endpoints.

use crate::front::AppState;
use ntex::web;

/// Liveness and database probe. Answers 503 when the database is
/// unreachable so the platform can restart or reroute.
#[web::get("/health")]
pub async fn health(
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    match app_state.repo.count_applications_by_status().await {
        Ok(_) => Ok(web::HttpResponse::Ok().json(&serde_json::json!({
            "status": "ok",
        }))),
        Err(e) => {
            log::error!("Health check database probe failed: {}", e);
            Ok(web::HttpResponse::ServiceUnavailable().json(&serde_json::json!({
                "status": "degraded",
            })))
        }
    }
}
