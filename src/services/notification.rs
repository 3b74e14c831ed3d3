//! # Notification Providers
//!
//! HTTP provider integrations behind the [`NotificationSink`] capability:
//! WhatsApp messages through the Twilio REST API and email through an HTTP
//! email provider. Channel selection and template text live in
//! `api::notification`; this module only delivers.

use crate::{config, services::NotificationSink};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::json;

#[derive(Clone)]
pub struct NotificationHandler {
    pub client: reqwest::Client,
}

impl NotificationHandler {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for NotificationHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for NotificationHandler {
    async fn send_whatsapp(&self, to: &str, body: &str) -> Result<()> {
        let app_config = &config::APP_CONFIG;

        if !app_config.whatsapp_enabled() {
            log::warn!("Twilio WhatsApp credentials missing. WhatsApp channel is disabled.");
            return Ok(());
        }

        let response = self
            .client
            .post(app_config.twilio_messages_endpoint())
            .basic_auth(
                &app_config.twilio_account_sid,
                Some(&app_config.twilio_auth_token),
            )
            .form(&[
                (
                    "From",
                    format!("whatsapp:{}", app_config.twilio_whatsapp_from),
                ),
                ("To", format!("whatsapp:{}", to)),
                ("Body", body.to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Twilio API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());

            bail!("Twilio API returned error status {}: {}", status, body);
        }

        Ok(())
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let app_config = &config::APP_CONFIG;

        if !app_config.email_enabled() {
            log::warn!("Email provider API key missing. Email channel is disabled.");
            return Ok(());
        }

        let payload = json!({
            "from": app_config.email_from,
            "to": [to],
            "subject": subject,
            "text": body,
        });

        let response = self
            .client
            .post(&app_config.email_api_endpoint)
            .bearer_auth(&app_config.email_api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .context("Failed to send request to email provider")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());

            bail!("Email provider returned error status {}: {}", status, body);
        }

        Ok(())
    }
}
