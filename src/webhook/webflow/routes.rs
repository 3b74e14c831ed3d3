//! Webflow webhook endpoint handlers.
//!
//! The receiver always answers `200 OK` for payloads it could parse, even
//! when the submission is rejected, so Webflow does not retry deliveries
//! that will never succeed. Only an invalid signature (401) or a
//! persistence failure (500) break that contract.

use super::{extract, handler, security};
use crate::{
    config,
    front::{AppState, errors},
};
use ntex::{util::Bytes, web};

/// Webhook receiver endpoint (POST).
///
/// Signature verification runs over the raw body bytes before JSON parsing
/// and is skipped entirely when no webhook secret is configured.
#[web::post("")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let secret = &config::APP_CONFIG.webflow_webhook_secret;
    if secret.is_empty() {
        log::warn!("No webhook secret configured; accepting request without signature check");
    } else {
        let signature = req
            .headers()
            .get("x-webflow-signature")
            .and_then(|value| value.to_str().ok());

        match signature {
            Some(signature) if security::verify_signature(signature, &body, secret) => {}
            Some(_) => return Err(errors::ApiError::Unauthorized.into()),
            None => {
                log::warn!("Webhook request is missing the x-webflow-signature header");
                return Err(errors::ApiError::Unauthorized.into());
            }
        }
    }

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("Webhook body is not valid JSON: {}", e);
            return Ok(web::HttpResponse::Ok().json(&serde_json::json!({
                "success": false,
                "message": "request body is not valid JSON",
            })));
        }
    };

    let outcome = handler::ingest(&payload, &app_state.repo, &app_state.notification_sink)
        .await
        .map_err(errors::ApiError::from)?;

    let response = match outcome {
        handler::IngestOutcome::Accepted { application_id } => serde_json::json!({
            "success": true,
            "message": "Application received",
            "applicationId": application_id,
        }),
        handler::IngestOutcome::Rejected { reason, preview } => serde_json::json!({
            "success": false,
            "message": reason,
            "debug": preview,
        }),
    };

    Ok(web::HttpResponse::Ok().json(&response))
}

/// Diagnostic endpoint (POST): runs envelope resolution on the posted body
/// and echoes the cleaned fields back without persisting anything.
#[web::post("/test")]
pub async fn echo(body: Bytes) -> Result<impl web::Responder, web::Error> {
    let payload: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| errors::ApiError::InvalidInput(format!("invalid JSON body: {}", e)))?;

    let response = match extract::extract(&payload) {
        Ok(extracted) => serde_json::json!({
            "success": true,
            "fields": serde_json::Value::Object(extracted.fields),
            "site": extracted.site,
        }),
        Err(extract::ExtractionError::NoFormFields { preview }) => serde_json::json!({
            "success": false,
            "message": "no form fields found in payload",
            "debug": preview,
        }),
    };

    Ok(web::HttpResponse::Ok().json(&response))
}
