//! # Notification Dispatch
//!
//! Builds the status-change messages and pushes them through the configured
//! channels. Dispatch is strictly best-effort: a failing channel is logged
//! and never surfaces to the caller, and one channel failing does not stop
//! the other from being attempted.

use crate::{
    config,
    models::application::{Application, ApplicationStatus},
    services,
};

/// Events that trigger an outbound notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationEvent {
    Received,
    NeedsInfo,
    Qualified,
    Rejected,
    BadgeActivated,
}

impl From<ApplicationStatus> for NotificationEvent {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Pending => NotificationEvent::Received,
            ApplicationStatus::NeedsInfo => NotificationEvent::NeedsInfo,
            ApplicationStatus::Qualified => NotificationEvent::Qualified,
            ApplicationStatus::Rejected => NotificationEvent::Rejected,
            ApplicationStatus::BadgeActivated => NotificationEvent::BadgeActivated,
        }
    }
}

impl NotificationEvent {
    fn email_subject(&self) -> &'static str {
        match self {
            NotificationEvent::Received => "تم استلام طلبك - Mim Verified",
            NotificationEvent::NeedsInfo => "معلومات إضافية مطلوبة - Mim Verified",
            NotificationEvent::Qualified => "تم قبول طلبك - Mim Verified",
            NotificationEvent::Rejected => "تحديث حول طلبك - Mim Verified",
            NotificationEvent::BadgeActivated => "شارتك الرقمية فعالة - Mim Verified",
        }
    }
}

/// Sends the message for `event` over every configured channel.
/// Never returns an error; channel failures are logged and swallowed.
pub async fn notify(
    application: &Application,
    event: NotificationEvent,
    notes: Option<&str>,
    sink: &services::ImplNotificationSink,
) {
    let body = build_template_message(application, event, notes);
    send_best_effort(application, event.email_subject(), &body, sink).await;
}

/// Reminder nudge for applications sitting in needs_info.
pub async fn notify_needs_info_reminder(
    application: &Application,
    sink: &services::ImplNotificationSink,
) {
    let body = build_reminder_message(application);
    send_best_effort(
        application,
        NotificationEvent::NeedsInfo.email_subject(),
        &body,
        sink,
    )
    .await;
}

async fn send_best_effort(
    application: &Application,
    subject: &str,
    body: &str,
    sink: &services::ImplNotificationSink,
) {
    match whatsapp_recipient(application) {
        Some(recipient) => {
            if let Err(e) = sink.send_whatsapp(&recipient, body).await {
                log::error!(
                    "Failed to send WhatsApp notification for application {}: {}",
                    application.id,
                    e
                );
            }
        }
        None => log::warn!(
            "Cannot send WhatsApp notification for application {}: missing phone number.",
            application.id
        ),
    }

    if let Err(e) = sink.send_email(&application.email, subject, body).await {
        log::error!(
            "Failed to send email notification for application {}: {}",
            application.id,
            e
        );
    }
}

/// WhatsApp destination: dedicated number, then phone, then whatever the
/// overflow bag captured.
fn whatsapp_recipient(application: &Application) -> Option<String> {
    let raw = application
        .whatsapp_number
        .as_deref()
        .or(application.phone.as_deref())
        .or_else(|| {
            application
                .submitted_field("whatsappNumber")
                .and_then(|v| v.as_str())
        })?;

    Some(normalize_phone(raw))
}

/// International phone format: keep a leading `+`, strip separators, strip
/// leading zeros and prepend the default country code otherwise.
fn normalize_phone(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if digits.starts_with('+') {
        return digits;
    }

    let cleaned = digits.trim_start_matches('0');
    let country_code = &config::APP_CONFIG.whatsapp_default_country_code;
    if !country_code.is_empty() {
        return format!("{}{}", country_code, cleaned);
    }

    // most submissions come from Moroccan stores
    format!("+212{}", cleaned)
}

fn build_template_message(
    application: &Application,
    event: NotificationEvent,
    notes: Option<&str>,
) -> String {
    let name = display_name(application);
    match event {
        NotificationEvent::Received => format!(
            "سلام {name}👋\n\n‏شكرا لملء استمارة طلب الشارة الرقمية للثقة.\n‏لقد توصلنا بطلبك وسوف نقوم بمراجعته والتواصل معك في أقرب وقت."
        ),
        NotificationEvent::NeedsInfo => {
            let extra = match notes {
                Some(notes) => format!("\n\nالمعلومات المطلوبة:\n{notes}"),
                None => "\n\nمن فضلك أرسل لنا التفاصيل المطلوبة لنكمل الطلب.".to_string(),
            };
            format!("سلام {name}\n‼️نحن بحاجة لبعض المعلومات منك قبل إكمال الطلب.{extra}")
        }
        NotificationEvent::Qualified => format!(
            "خبار كتفرح🤩\n{name}، لقد تم قبول طلبك من أجل Mim Verified.\nستتوصل بشارتك الرقمية قريبا🥳"
        ),
        NotificationEvent::Rejected => format!(
            "سلام {name}\nشكرا لتقديمك، لكن يؤسفنا أن نخبرك أن متجرك لا يستوفي جميع متطلبات التحقق حاليا.\nيمكنك إعادة التقديم لاحقا بعد التحسن."
        ),
        NotificationEvent::BadgeActivated => format!(
            "مبروك ✅\n{name}، شارتك الرقمية أصبحت فعالة.\nيمكنك الحصول عليها من بريدك الإلكتروني واستعمالها في صفحات البيع الخاصة بك."
        ),
    }
}

fn build_reminder_message(application: &Application) -> String {
    format!(
        "مرحباً {name}، تذكير بسيط: ما زلنا ننتظر المعلومات الإضافية لإكمال عملية التحقق.",
        name = display_name(application)
    )
}

fn display_name(application: &Application) -> &str {
    if application.seller_name.is_empty() {
        "صديقي"
    } else {
        &application.seller_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockNotificationSink;
    use serde_json::json;

    fn test_application() -> Application {
        Application {
            id: 7,
            seller_name: "Amina".into(),
            email: "amina@x.com".into(),
            phone: Some("0612-345-678".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_phone_keeps_international() {
        assert_eq!(normalize_phone("+212612345678"), "+212612345678");
        assert_eq!(normalize_phone("+1 (415) 523-8886"), "+14155238886");
    }

    #[test]
    fn test_normalize_phone_prepends_country_code() {
        assert_eq!(normalize_phone("0612345678"), "+212612345678");
        assert_eq!(normalize_phone("0612-345-678"), "+212612345678");
    }

    #[test]
    fn test_recipient_falls_back_to_overflow_bag() {
        let mut application = test_application();
        application.phone = None;
        application.submitted_fields = json!({"whatsappNumber": "0699999999"});

        assert_eq!(
            whatsapp_recipient(&application),
            Some("+212699999999".to_string())
        );
    }

    #[test]
    fn test_recipient_missing_entirely() {
        let mut application = test_application();
        application.phone = None;
        application.submitted_fields = json!({});

        assert_eq!(whatsapp_recipient(&application), None);
    }

    #[test]
    fn test_needs_info_template_includes_notes() {
        let body = build_template_message(
            &test_application(),
            NotificationEvent::NeedsInfo,
            Some("صور المنتجات"),
        );
        assert!(body.contains("Amina"));
        assert!(body.contains("صور المنتجات"));
    }

    #[ntex::test]
    async fn test_channel_isolation_whatsapp_failure_still_emails() {
        let mut mock_sink = MockNotificationSink::new();
        mock_sink
            .expect_send_whatsapp()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("twilio down")));
        mock_sink
            .expect_send_email()
            .times(1)
            .returning(|_, _, _| Ok(()));
        let sink: services::ImplNotificationSink = Box::new(mock_sink);

        // must not panic or propagate the WhatsApp failure
        notify(
            &test_application(),
            NotificationEvent::Received,
            None,
            &sink,
        )
        .await;
    }
}
