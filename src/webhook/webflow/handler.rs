//! Ingestion pipeline for Webflow form submissions.
//!
//! Glues the envelope extractor, field mapper and persistence together.
//! Validation failures are part of the normal outcome (the webhook caller
//! gets a structured rejection, never a retry storm); only persistence
//! failures propagate as errors. Outbound notifications are best-effort
//! and cannot change the outcome.

use super::{extract, mapper};
use crate::{api::notification, repo, services};
use serde_json::Value;

/// Result of processing one webhook delivery.
#[derive(Debug, PartialEq)]
pub enum IngestOutcome {
    Accepted {
        application_id: i64,
    },
    /// The payload could not be turned into a valid application. Carries a
    /// human-readable reason and, for structural failures, a bounded
    /// payload preview for diagnostics.
    Rejected {
        reason: String,
        preview: Option<String>,
    },
}

/// Processes a raw webhook payload end to end: resolve the envelope, map
/// the fields, persist the application, then notify the seller.
pub async fn ingest(
    raw: &Value,
    repo: &repo::ImplAppRepo,
    sink: &services::ImplNotificationSink,
) -> anyhow::Result<IngestOutcome> {
    let extracted = match extract::extract(raw) {
        Ok(extracted) => extracted,
        Err(extract::ExtractionError::NoFormFields { preview }) => {
            log::warn!("Webhook payload contained no form fields");
            return Ok(IngestOutcome::Rejected {
                reason: "no form fields found in payload".to_string(),
                preview: Some(preview),
            });
        }
    };

    let application = match mapper::map(&extracted.fields, extracted.site.as_deref()) {
        Ok(application) => application,
        Err(e) => {
            log::warn!("Webhook payload failed validation: {}", e);
            return Ok(IngestOutcome::Rejected {
                reason: e.to_string(),
                preview: None,
            });
        }
    };

    let application_id = repo.insert_application(&application).await?;
    log::info!(
        "Created application {} for seller {:?}",
        application_id,
        application.seller_name
    );

    let mut stored = application;
    stored.id = application_id;
    notification::notify(
        &stored,
        notification::NotificationEvent::Received,
        None,
        sink,
    )
    .await;

    Ok(IngestOutcome::Accepted { application_id })
}
