use crate::models;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Row, SqlitePool, sqlite::SqliteRow};

use super::{AppRepo, sqlite_queries};

#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

impl SqlxSqliteRepo {
    /// Creates missing tables and indexes. Idempotent.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(sqlite_queries::QUERY_INIT_SCHEMA)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }
}

impl FromRow<'_, SqliteRow> for models::application::Application {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            seller_name: row.try_get("seller_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            whatsapp_number: row.try_get("whatsapp_number")?,
            category: row.try_get("category")?,
            language: row.try_get("language")?,
            status: models::application::ApplicationStatus::parse(
                row.try_get::<&str, &str>("status")?,
            )
            .unwrap_or_default(),
            notes: row.try_get("notes")?,
            submitted_fields: serde_json::from_str(row.try_get::<&str, &str>("submitted_fields")?)
                .unwrap_or_else(|_| serde_json::json!({})),
            needs_info_reminder_sent_at: row.try_get("needs_info_reminder_sent_at")?,
            reviewed_at: row.try_get("reviewed_at")?,
            badge_activated_at: row.try_get("badge_activated_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::badge::Badge {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            seller_id: row.try_get("seller_id")?,
            code: row.try_get("code")?,
            status: row.try_get("status")?,
            valid_until: row.try_get("valid_until")?,
            issued_at: row.try_get("issued_at")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::badge::Seller {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            city: row.try_get("city")?,
            shop_url: row.try_get("shop_url")?,
            level: row.try_get("level")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl AppRepo for SqlxSqliteRepo {
    async fn insert_application(
        &self,
        application: &models::application::Application,
    ) -> anyhow::Result<i64> {
        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_APPLICATION)
            .bind(&application.seller_name)
            .bind(&application.email)
            .bind(&application.phone)
            .bind(&application.whatsapp_number)
            .bind(&application.category)
            .bind(&application.language)
            .bind(application.status.to_string())
            .bind(&application.notes)
            .bind(serde_json::to_string(&application.submitted_fields)?)
            .bind(application.created_at)
            .bind(application.updated_at)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }

    async fn get_application(
        &self,
        id: i64,
    ) -> anyhow::Result<Option<models::application::Application>> {
        Ok(
            sqlx::query_as(sqlite_queries::QUERY_GET_APPLICATION_BY_ID)
                .bind(id)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn get_applications(
        &self,
        status: Option<models::application::ApplicationStatus>,
    ) -> anyhow::Result<Vec<models::application::Application>> {
        let status_filter = status.map_or("all".to_string(), |s| s.to_string());

        Ok(sqlx::query_as(sqlite_queries::QUERY_GET_APPLICATIONS)
            .bind(status_filter)
            .fetch_all(&self.db_pool)
            .await?)
    }

    async fn count_applications_by_status(&self) -> anyhow::Result<Vec<(String, i64)>> {
        Ok(
            sqlx::query(sqlite_queries::QUERY_COUNT_APPLICATIONS_BY_STATUS)
                .map(|row: SqliteRow| {
                    (
                        row.try_get("status").unwrap_or_default(),
                        row.try_get("total").unwrap_or(0),
                    )
                })
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn update_application_status(
        &self,
        id: i64,
        status: models::application::ApplicationStatus,
        notes: Option<String>,
    ) -> anyhow::Result<models::application::Application> {
        use models::application::ApplicationStatus::*;

        let now = Utc::now();
        let reviewed_at = matches!(status, Qualified | BadgeActivated).then_some(now);
        let badge_activated_at = matches!(status, BadgeActivated).then_some(now);

        sqlx::query(sqlite_queries::QUERY_UPDATE_APPLICATION_STATUS)
            .bind(id)
            .bind(status.to_string())
            .bind(notes)
            .bind(reviewed_at)
            .bind(badge_activated_at)
            .bind(now)
            .execute(&self.db_pool)
            .await?;

        self.get_application(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("application {} not found after update", id))
    }

    async fn merge_submitted_fields(
        &self,
        id: i64,
        patch: serde_json::Value,
    ) -> anyhow::Result<()> {
        let mut transaction = self.db_pool.begin().await?;

        let current: String =
            sqlx::query_scalar("SELECT submitted_fields FROM applications WHERE id=$1;")
                .bind(id)
                .fetch_one(&mut *transaction)
                .await?;

        let mut fields: serde_json::Value =
            serde_json::from_str(&current).unwrap_or_else(|_| serde_json::json!({}));
        if let (Some(bag), Some(extra)) = (fields.as_object_mut(), patch.as_object()) {
            for (key, value) in extra {
                bag.insert(key.clone(), value.clone());
            }
        }

        sqlx::query(sqlite_queries::QUERY_UPDATE_SUBMITTED_FIELDS)
            .bind(id)
            .bind(serde_json::to_string(&fields)?)
            .bind(Utc::now())
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(())
    }

    async fn applications_needing_info_reminder(
        &self,
        cutoff: DateTime<Utc>,
    ) -> anyhow::Result<Vec<models::application::Application>> {
        Ok(
            sqlx::query_as(sqlite_queries::QUERY_APPLICATIONS_NEEDING_REMINDER)
                .bind(cutoff)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn set_needs_info_reminder_sent(&self, id: i64) -> anyhow::Result<()> {
        Ok(
            sqlx::query(sqlite_queries::QUERY_SET_NEEDS_INFO_REMINDER_SENT)
                .bind(id)
                .bind(Utc::now())
                .execute(&self.db_pool)
                .await
                .map(|_| ())?,
        )
    }

    async fn upsert_seller(&self, seller: &models::badge::Seller) -> anyhow::Result<i64> {
        Ok(sqlx::query_scalar(sqlite_queries::QUERY_UPSERT_SELLER)
            .bind(&seller.name)
            .bind(&seller.category)
            .bind(&seller.city)
            .bind(&seller.shop_url)
            .bind(seller.level.to_string())
            .bind(seller.created_at)
            .bind(seller.updated_at)
            .fetch_one(&self.db_pool)
            .await?)
    }

    async fn get_seller(&self, id: i64) -> anyhow::Result<Option<models::badge::Seller>> {
        Ok(sqlx::query_as(sqlite_queries::QUERY_GET_SELLER_BY_ID)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn insert_badge(&self, badge: &models::badge::Badge) -> anyhow::Result<i64> {
        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_BADGE)
            .bind(badge.seller_id)
            .bind(&badge.code)
            .bind(badge.status.to_string())
            .bind(badge.valid_until)
            .bind(badge.issued_at)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }

    async fn get_badge(&self, id: i64) -> anyhow::Result<Option<models::badge::Badge>> {
        Ok(sqlx::query_as(sqlite_queries::QUERY_GET_BADGE_BY_ID)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn get_badge_by_code(
        &self,
        code: &str,
    ) -> anyhow::Result<Option<(models::badge::Badge, models::badge::Seller)>> {
        Ok(sqlx::query(sqlite_queries::QUERY_GET_BADGE_BY_CODE)
            .bind(code)
            .map(|row: SqliteRow| {
                let badge = models::badge::Badge {
                    id: row.try_get("id").unwrap_or(-1),
                    seller_id: row.try_get("seller_id").unwrap_or(-1),
                    code: row.try_get("code").unwrap_or_default(),
                    status: row.try_get("status").unwrap_or_default(),
                    valid_until: row.try_get("valid_until").unwrap_or_default(),
                    issued_at: row.try_get("issued_at").unwrap_or_default(),
                };
                let seller = models::badge::Seller {
                    id: row.try_get("s_id").unwrap_or(-1),
                    name: row.try_get("s_name").unwrap_or_default(),
                    category: row.try_get("s_category").unwrap_or_default(),
                    city: row.try_get("s_city").unwrap_or_default(),
                    shop_url: row.try_get("s_shop_url").unwrap_or_default(),
                    level: row.try_get("s_level").unwrap_or_default(),
                    created_at: row.try_get("s_created_at").unwrap_or_default(),
                    updated_at: row.try_get("s_updated_at").unwrap_or_default(),
                };
                (badge, seller)
            })
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn get_badges_by_seller(
        &self,
        seller_id: i64,
    ) -> anyhow::Result<Vec<models::badge::Badge>> {
        Ok(sqlx::query_as(sqlite_queries::QUERY_GET_BADGES_BY_SELLER)
            .bind(seller_id)
            .fetch_all(&self.db_pool)
            .await?)
    }

    async fn update_badge_status(
        &self,
        id: i64,
        status: models::badge::BadgeStatus,
        valid_until: Option<DateTime<Utc>>,
    ) -> anyhow::Result<models::badge::Badge> {
        sqlx::query(sqlite_queries::QUERY_UPDATE_BADGE_STATUS)
            .bind(id)
            .bind(status.to_string())
            .bind(valid_until)
            .execute(&self.db_pool)
            .await?;

        self.get_badge(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("badge {} not found after update", id))
    }

    async fn append_audit_log(&self, entry: &models::audit::AuditLogEntry) -> anyhow::Result<i64> {
        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_AUDIT_LOG)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.action)
            .bind(serde_json::to_string(&entry.meta)?)
            .bind(entry.created_at)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }
}
