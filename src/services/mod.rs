pub mod notification;

use async_trait::async_trait;

/// Outbound notification capability. One method per channel so a failing
/// channel can be isolated by the dispatcher in `api::notification`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink {
    async fn send_whatsapp(&self, to: &str, body: &str) -> anyhow::Result<()>;

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

pub type ImplNotificationSink = Box<dyn NotificationSink>;
