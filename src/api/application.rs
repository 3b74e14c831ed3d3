//! # Application Review Operations
//!
//! Business logic behind the review dashboard: listing, manual creation,
//! and the status lifecycle. Every status mutation goes through the
//! transition table, writes an audit entry, and notifies the seller.

use crate::{
    api::notification,
    models::{
        application::{Application, ApplicationStatus},
        audit,
    },
    repo, services,
};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

#[derive(Debug, Display, Error)]
pub enum ApplicationError {
    #[display("application {_0} not found")]
    NotFound(#[error(not(source))] i64),
    #[display("cannot transition application from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[display("{_0}")]
    Repo(#[error(not(source))] anyhow::Error),
}

impl From<anyhow::Error> for ApplicationError {
    fn from(e: anyhow::Error) -> Self {
        ApplicationError::Repo(e)
    }
}

/// Request body for creating an application directly from the dashboard,
/// bypassing the webhook pipeline.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateApplicationRequest {
    pub seller_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub notes: Option<String>,
}

impl CreateApplicationRequest {
    pub fn fields_are_valid(&self) -> bool {
        !self.seller_name.trim().is_empty()
            && !self.email.trim().is_empty()
            && self.email.contains('@')
    }
}

/// Creates a pending application from dashboard input and sends the
/// reception notification.
pub async fn create_application(
    request: CreateApplicationRequest,
    repo: &repo::ImplAppRepo,
    sink: &services::ImplNotificationSink,
) -> anyhow::Result<Application> {
    let now = chrono::Utc::now();
    let mut application = Application {
        seller_name: request.seller_name.trim().to_string(),
        email: request.email.trim().to_lowercase(),
        phone: request.phone,
        whatsapp_number: request.whatsapp_number,
        category: request
            .category
            .unwrap_or_else(|| crate::consts::DEFAULT_CATEGORY.to_string()),
        language: request.language.unwrap_or_else(|| "ar".to_string()),
        notes: request.notes,
        submitted_fields: serde_json::json!({}),
        created_at: now,
        updated_at: now,
        ..Default::default()
    };

    application.id = repo.insert_application(&application).await?;
    log::info!(
        "Created application {} manually for seller {:?}",
        application.id,
        application.seller_name
    );

    notification::notify(
        &application,
        notification::NotificationEvent::Received,
        None,
        sink,
    )
    .await;

    Ok(application)
}

pub async fn get_application(
    id: i64,
    repo: &repo::ImplAppRepo,
) -> Result<Application, ApplicationError> {
    repo.get_application(id)
        .await?
        .ok_or(ApplicationError::NotFound(id))
}

pub async fn list_applications(
    status: Option<ApplicationStatus>,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<Vec<Application>> {
    repo.get_applications(status).await
}

/// Per-status counts for the dashboard, with absent statuses reported as 0.
pub async fn status_stats(repo: &repo::ImplAppRepo) -> anyhow::Result<serde_json::Value> {
    let counts = repo.count_applications_by_status().await?;

    let mut stats = serde_json::Map::new();
    for status in [
        ApplicationStatus::Pending,
        ApplicationStatus::NeedsInfo,
        ApplicationStatus::Qualified,
        ApplicationStatus::Rejected,
        ApplicationStatus::BadgeActivated,
    ] {
        stats.insert(status.to_string(), serde_json::json!(0));
    }
    for (status, count) in counts {
        stats.insert(status, serde_json::json!(count));
    }

    Ok(serde_json::Value::Object(stats))
}

/// Moves an application to `next` after validating the transition, records
/// the change in the audit log and notifies the seller of the new status.
pub async fn update_status(
    id: i64,
    next: ApplicationStatus,
    notes: Option<String>,
    repo: &repo::ImplAppRepo,
    sink: &services::ImplNotificationSink,
) -> Result<Application, ApplicationError> {
    let current = get_application(id, repo).await?;

    if !current.status.can_transition_to(next) {
        return Err(ApplicationError::InvalidTransition {
            from: current.status,
            to: next,
        });
    }

    let updated = repo
        .update_application_status(id, next, notes.clone())
        .await?;

    let entry = audit::AuditLogEntry::new(
        "application",
        id,
        &format!("status_changed:{}->{}", current.status, next),
        serde_json::json!({ "notes": notes }),
    );
    repo.append_audit_log(&entry).await?;

    log::info!(
        "Application {} moved from {} to {}",
        id,
        current.status,
        next
    );

    notification::notify(&updated, next.into(), notes.as_deref(), sink).await;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MockAppRepo;
    use crate::services::MockNotificationSink;

    fn silent_sink() -> services::ImplNotificationSink {
        let mut mock_sink = MockNotificationSink::new();
        mock_sink
            .expect_send_whatsapp()
            .returning(|_, _| Ok(()));
        mock_sink
            .expect_send_email()
            .returning(|_, _, _| Ok(()));
        Box::new(mock_sink)
    }

    fn stored_application(id: i64, status: ApplicationStatus) -> Application {
        Application {
            id,
            seller_name: "Amina".into(),
            email: "amina@x.com".into(),
            status,
            ..Default::default()
        }
    }

    #[ntex::test]
    async fn test_update_status_valid_transition() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_application()
            .times(1)
            .returning(|id| {
                Ok(Some(stored_application(id, ApplicationStatus::Pending)))
            });
        mock_repo
            .expect_update_application_status()
            .withf(|_, status, _| *status == ApplicationStatus::Qualified)
            .times(1)
            .returning(|id, status, _| {
                Ok(stored_application(id, status))
            });
        mock_repo
            .expect_append_audit_log()
            .withf(|entry| {
                entry.entity_type == "application"
                    && entry.action == "status_changed:pending->qualified"
            })
            .times(1)
            .returning(|_| Ok(1));
        let repo: repo::ImplAppRepo = Box::new(mock_repo);
        let sink = silent_sink();

        let updated = update_status(7, ApplicationStatus::Qualified, None, &repo, &sink)
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Qualified);
    }

    #[ntex::test]
    async fn test_update_status_rejects_invalid_transition() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_application()
            .times(1)
            .returning(|id| Ok(Some(stored_application(id, ApplicationStatus::Rejected))));
        mock_repo.expect_update_application_status().times(0);
        mock_repo.expect_append_audit_log().times(0);
        let repo: repo::ImplAppRepo = Box::new(mock_repo);
        let sink = silent_sink();

        let err = update_status(7, ApplicationStatus::Qualified, None, &repo, &sink)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::InvalidTransition {
                from: ApplicationStatus::Rejected,
                to: ApplicationStatus::Qualified,
            }
        ));
    }

    #[ntex::test]
    async fn test_update_status_unknown_application() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_application()
            .times(1)
            .returning(|_| Ok(None));
        let repo: repo::ImplAppRepo = Box::new(mock_repo);
        let sink = silent_sink();

        let err = update_status(404, ApplicationStatus::Qualified, None, &repo, &sink)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(404)));
    }

    #[ntex::test]
    async fn test_status_stats_fills_missing_statuses() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_count_applications_by_status()
            .times(1)
            .returning(|| Ok(vec![("pending".to_string(), 3)]));
        let repo: repo::ImplAppRepo = Box::new(mock_repo);

        let stats = status_stats(&repo).await.unwrap();
        assert_eq!(stats["pending"], 3);
        assert_eq!(stats["qualified"], 0);
        assert_eq!(stats["badge_activated"], 0);
    }

    #[test]
    fn test_create_request_validation() {
        let valid = CreateApplicationRequest {
            seller_name: "Amina".into(),
            email: "a@x.com".into(),
            phone: None,
            whatsapp_number: None,
            category: None,
            language: None,
            notes: None,
        };
        assert!(valid.fields_are_valid());

        let invalid = CreateApplicationRequest {
            seller_name: "  ".into(),
            email: "not-an-email".into(),
            phone: None,
            whatsapp_number: None,
            category: None,
            language: None,
            notes: None,
        };
        assert!(!invalid.fields_are_valid());
    }
}
