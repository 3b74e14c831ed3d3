//! Application configuration management.
//!
//! This module handles all configuration values required for the service.
//! Sensitive fields are clearly marked and should never be logged; production
//! environments should source them from a secret management system.

use envconfig::Envconfig;
use std::sync::LazyLock;

/// Service configuration loaded from environment variables.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Database host value (NON-SENSITIVE)
    #[envconfig(default = "sqlite:data/seller_intake.db?mode=rwc")]
    pub db_host: String,

    /// 🔒 SENSITIVE: Database password to encrypt SQLite data (prod only)
    #[envconfig(default = "")]
    pub db_pass_encrypt: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    /// Common values: 80 (HTTP), 443 (HTTPS), 3000 (dev)
    #[envconfig(default = "3000")]
    pub web_server_port: u64,

    /// Path to SSL private key file (SENSITIVE PATH)
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file (NON-SENSITIVE)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// Twilio account SID used for WhatsApp delivery (SEMI-SENSITIVE)
    #[envconfig(default = "")]
    pub twilio_account_sid: String,

    /// 🔒 SENSITIVE: Twilio auth token
    #[envconfig(default = "")]
    pub twilio_auth_token: String,

    /// WhatsApp sender number registered with Twilio (NON-SENSITIVE)
    /// Example: "+14155238886"
    #[envconfig(default = "")]
    pub twilio_whatsapp_from: String,

    /// Country code prepended to local phone numbers (NON-SENSITIVE)
    /// Example: "+212"
    #[envconfig(default = "")]
    pub whatsapp_default_country_code: String,

    /// HTTP email provider endpoint (NON-SENSITIVE)
    #[envconfig(default = "https://api.resend.com/emails")]
    pub email_api_endpoint: String,

    /// 🔒 SENSITIVE: HTTP email provider API key
    #[envconfig(default = "")]
    pub email_api_key: String,

    /// From address for outgoing email (NON-SENSITIVE)
    #[envconfig(default = "verification@mimmarketplace.com")]
    pub email_from: String,

    /// 🔒 SENSITIVE: HMAC secret for Webflow webhook signatures.
    /// When empty, signature verification is skipped with a logged warning.
    #[envconfig(default = "")]
    pub webflow_webhook_secret: String,

    /// Public base URL where issued badges are served (NON-SENSITIVE)
    #[envconfig(default = "https://mimmarketplace.onrender.com")]
    pub badge_base_url: String,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Constructs the Twilio endpoint for sending WhatsApp messages
    pub fn twilio_messages_endpoint(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{sid}/Messages.json",
            sid = self.twilio_account_sid
        )
    }

    /// Whether the WhatsApp channel has enough credentials to send
    pub fn whatsapp_enabled(&self) -> bool {
        !self.twilio_account_sid.is_empty()
            && !self.twilio_auth_token.is_empty()
            && !self.twilio_whatsapp_from.is_empty()
    }

    /// Whether the email channel has enough credentials to send
    pub fn email_enabled(&self) -> bool {
        !self.email_api_key.is_empty()
    }

    /// Public URL for an issued badge code
    pub fn badge_url(&self, code: &str) -> String {
        format!("{base}/badges/{code}", base = self.badge_base_url)
    }

    /// Validated TCP port for the web server bind
    pub fn server_port(&self) -> anyhow::Result<u16> {
        u16::try_from(self.web_server_port).map_err(|_| {
            anyhow::anyhow!(
                "WEB_SERVER_PORT {} is outside the valid TCP port range",
                self.web_server_port
            )
        })
    }
}

/// Global application configuration instance.
///
/// Loaded on first access; the process aborts with a descriptive message when
/// a required environment variable is missing.
pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    AppConfig::init_from_env()
        .expect("Failed to load application configuration. Check environment variables.")
});

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn test_config() -> AppConfig {
        AppConfig {
            env: "local".into(),
            db_host: "sqlite::memory:".into(),
            db_pass_encrypt: String::new(),
            web_server_host: "0.0.0.0".into(),
            web_server_port: 3000,
            private_key_path: "server.key".into(),
            certificate_path: "server.crt".into(),
            twilio_account_sid: "AC123".into(),
            twilio_auth_token: "token".into(),
            twilio_whatsapp_from: "+14155238886".into(),
            whatsapp_default_country_code: "+212".into(),
            email_api_endpoint: "https://api.resend.com/emails".into(),
            email_api_key: String::new(),
            email_from: "verification@mimmarketplace.com".into(),
            webflow_webhook_secret: String::new(),
            badge_base_url: "https://mimmarketplace.onrender.com".into(),
        }
    }

    #[test]
    fn test_twilio_endpoint_contains_sid() {
        let config = test_config();
        assert_eq!(
            config.twilio_messages_endpoint(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_channel_toggles() {
        let config = test_config();
        assert!(config.whatsapp_enabled());
        assert!(!config.email_enabled());
    }

    #[test]
    fn test_server_port_rejects_out_of_range_values() {
        let mut config = test_config();
        assert_eq!(config.server_port().unwrap(), 3000);

        config.web_server_port = 70_000;
        assert!(config.server_port().is_err());
    }

    #[test]
    fn test_badge_url() {
        let config = test_config();
        assert_eq!(
            config.badge_url("VABC123"),
            "https://mimmarketplace.onrender.com/badges/VABC123"
        );
    }
}
