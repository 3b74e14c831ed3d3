pub mod sqlite;
pub mod sqlite_queries;

use crate::models;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppRepo {
    async fn insert_application(
        &self,
        application: &models::application::Application,
    ) -> anyhow::Result<i64>;

    async fn get_application(
        &self,
        id: i64,
    ) -> anyhow::Result<Option<models::application::Application>>;

    async fn get_applications(
        &self,
        status: Option<models::application::ApplicationStatus>,
    ) -> anyhow::Result<Vec<models::application::Application>>;

    async fn count_applications_by_status(&self) -> anyhow::Result<Vec<(String, i64)>>;

    async fn update_application_status(
        &self,
        id: i64,
        status: models::application::ApplicationStatus,
        notes: Option<String>,
    ) -> anyhow::Result<models::application::Application>;

    /// Merges `patch` into the application's submitted_fields bag.
    async fn merge_submitted_fields(
        &self,
        id: i64,
        patch: serde_json::Value,
    ) -> anyhow::Result<()>;

    async fn applications_needing_info_reminder(
        &self,
        cutoff: DateTime<Utc>,
    ) -> anyhow::Result<Vec<models::application::Application>>;

    async fn set_needs_info_reminder_sent(&self, id: i64) -> anyhow::Result<()>;

    /// Creates the seller row or updates the level of the existing row with
    /// the same name. At most one seller per name, also under concurrency.
    async fn upsert_seller(&self, seller: &models::badge::Seller) -> anyhow::Result<i64>;

    async fn get_seller(&self, id: i64) -> anyhow::Result<Option<models::badge::Seller>>;

    async fn insert_badge(&self, badge: &models::badge::Badge) -> anyhow::Result<i64>;

    async fn get_badge(&self, id: i64) -> anyhow::Result<Option<models::badge::Badge>>;

    async fn get_badge_by_code(
        &self,
        code: &str,
    ) -> anyhow::Result<Option<(models::badge::Badge, models::badge::Seller)>>;

    async fn get_badges_by_seller(
        &self,
        seller_id: i64,
    ) -> anyhow::Result<Vec<models::badge::Badge>>;

    async fn update_badge_status(
        &self,
        id: i64,
        status: models::badge::BadgeStatus,
        valid_until: Option<DateTime<Utc>>,
    ) -> anyhow::Result<models::badge::Badge>;

    async fn append_audit_log(&self, entry: &models::audit::AuditLogEntry) -> anyhow::Result<i64>;
}

pub type ImplAppRepo = Box<dyn AppRepo>;
