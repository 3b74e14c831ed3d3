//! # Badge Issuance and Lifecycle
//!
//! Issues verification badges for qualified applications and manages their
//! lifecycle. Issuing a badge is the only path that moves an application
//! into its terminal `badge_activated` state.

use crate::{
    api::notification,
    config,
    models::{
        application::ApplicationStatus,
        audit,
        badge::{Badge, BadgeStatus, Seller, SellerLevel},
    },
    repo, services,
};
use chrono::{Months, Utc};
use derive_more::{Display, Error};
use serde::Serialize;

#[derive(Debug, Display, Error)]
pub enum BadgeError {
    #[display("application {_0} not found")]
    ApplicationNotFound(#[error(not(source))] i64),
    #[display("application {id} is {status}, badges are issued from qualified only")]
    ApplicationNotQualified {
        id: i64,
        status: ApplicationStatus,
    },
    #[display("badge {_0} not found")]
    BadgeNotFound(#[error(not(source))] i64),
    #[display("seller {_0} not found")]
    SellerNotFound(#[error(not(source))] i64),
    #[display("cannot transition badge from {from} to {to}")]
    InvalidTransition { from: BadgeStatus, to: BadgeStatus },
    #[display("{_0}")]
    Repo(#[error(not(source))] anyhow::Error),
}

impl From<anyhow::Error> for BadgeError {
    fn from(e: anyhow::Error) -> Self {
        BadgeError::Repo(e)
    }
}

/// Public verification result for a badge code lookup.
#[derive(Debug, Serialize)]
pub struct BadgeVerification {
    pub valid: bool,
    pub status: BadgeStatus,
    pub seller_name: String,
    pub level: SellerLevel,
    pub valid_until: chrono::DateTime<Utc>,
}

/// Issues a badge for a qualified application.
///
/// Upserts the seller, generates a unique code, activates the application
/// and records the issued code in the application's field bag. The seller
/// is notified once the badge row exists.
pub async fn issue_badge(
    application_id: i64,
    numeric_level: u8,
    repo: &repo::ImplAppRepo,
    sink: &services::ImplNotificationSink,
) -> Result<(Badge, Seller), BadgeError> {
    let application = repo
        .get_application(application_id)
        .await?
        .ok_or(BadgeError::ApplicationNotFound(application_id))?;

    if application.status != ApplicationStatus::Qualified {
        return Err(BadgeError::ApplicationNotQualified {
            id: application_id,
            status: application.status,
        });
    }

    let now = Utc::now();
    let level = SellerLevel::from_numeric(numeric_level);
    let mut seller = Seller {
        name: application.seller_name.clone(),
        category: application.category.clone(),
        city: application
            .submitted_field("city")
            .and_then(|v| v.as_str())
            .map(String::from),
        shop_url: application
            .submitted_field("sellingPage")
            .and_then(|v| v.as_str())
            .map(String::from),
        level,
        created_at: now,
        updated_at: now,
        ..Default::default()
    };
    seller.id = repo.upsert_seller(&seller).await?;

    let mut badge = Badge {
        seller_id: seller.id,
        code: generate_badge_code(level),
        status: BadgeStatus::Active,
        valid_until: now + Months::new(crate::consts::BADGE_VALIDITY_MONTHS),
        issued_at: now,
        ..Default::default()
    };
    badge.id = repo.insert_badge(&badge).await?;

    let activated = repo
        .update_application_status(application_id, ApplicationStatus::BadgeActivated, None)
        .await?;
    repo.merge_submitted_fields(
        application_id,
        serde_json::json!({
            "badgeCode": badge.code,
            "badgeUrl": config::APP_CONFIG.badge_url(&badge.code),
        }),
    )
    .await?;

    let entry = audit::AuditLogEntry::new(
        "badge",
        badge.id,
        "badge_issued",
        serde_json::json!({
            "applicationId": application_id,
            "sellerId": seller.id,
            "code": badge.code,
            "level": level.to_string(),
            "validUntil": badge.valid_until,
        }),
    );
    repo.append_audit_log(&entry).await?;

    log::info!(
        "Issued badge {} ({}) for seller {} from application {}",
        badge.id,
        badge.code,
        seller.id,
        application_id
    );

    notification::notify(
        &activated,
        notification::NotificationEvent::BadgeActivated,
        None,
        sink,
    )
    .await;

    Ok((badge, seller))
}

/// Extends a badge's validity window from now and reactivates it when
/// suspended. Revoked badges cannot be renewed.
pub async fn renew_badge(badge_id: i64, repo: &repo::ImplAppRepo) -> Result<Badge, BadgeError> {
    let badge = get_badge(badge_id, repo).await?;

    if badge.status == BadgeStatus::Revoked {
        return Err(BadgeError::InvalidTransition {
            from: BadgeStatus::Revoked,
            to: BadgeStatus::Active,
        });
    }

    let valid_until = Utc::now() + Months::new(crate::consts::BADGE_VALIDITY_MONTHS);
    let renewed = repo
        .update_badge_status(badge_id, BadgeStatus::Active, Some(valid_until))
        .await?;

    let entry = audit::AuditLogEntry::new(
        "badge",
        badge_id,
        "badge_renewed",
        serde_json::json!({ "validUntil": valid_until }),
    );
    repo.append_audit_log(&entry).await?;

    Ok(renewed)
}

pub async fn suspend_badge(badge_id: i64, repo: &repo::ImplAppRepo) -> Result<Badge, BadgeError> {
    set_badge_status(badge_id, BadgeStatus::Suspended, repo).await
}

pub async fn revoke_badge(badge_id: i64, repo: &repo::ImplAppRepo) -> Result<Badge, BadgeError> {
    set_badge_status(badge_id, BadgeStatus::Revoked, repo).await
}

async fn set_badge_status(
    badge_id: i64,
    next: BadgeStatus,
    repo: &repo::ImplAppRepo,
) -> Result<Badge, BadgeError> {
    let badge = get_badge(badge_id, repo).await?;

    if !badge.status.can_transition_to(next) {
        return Err(BadgeError::InvalidTransition {
            from: badge.status,
            to: next,
        });
    }

    let updated = repo.update_badge_status(badge_id, next, None).await?;

    let entry = audit::AuditLogEntry::new(
        "badge",
        badge_id,
        &format!("status_changed:{}->{}", badge.status, next),
        serde_json::json!({}),
    );
    repo.append_audit_log(&entry).await?;

    log::info!("Badge {} moved from {} to {}", badge_id, badge.status, next);

    Ok(updated)
}

pub async fn get_badge(badge_id: i64, repo: &repo::ImplAppRepo) -> Result<Badge, BadgeError> {
    repo.get_badge(badge_id)
        .await?
        .ok_or(BadgeError::BadgeNotFound(badge_id))
}

pub async fn get_seller_badges(
    seller_id: i64,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<Vec<Badge>> {
    repo.get_badges_by_seller(seller_id).await
}

/// Seller row together with every badge issued to them.
pub async fn get_seller_profile(
    seller_id: i64,
    repo: &repo::ImplAppRepo,
) -> Result<(Seller, Vec<Badge>), BadgeError> {
    let seller = repo
        .get_seller(seller_id)
        .await?
        .ok_or(BadgeError::SellerNotFound(seller_id))?;
    let badges = repo.get_badges_by_seller(seller_id).await?;

    Ok((seller, badges))
}

/// Public lookup by code. `None` for unknown codes; a badge is reported
/// valid only while active and inside its validity window.
pub async fn verify_badge_code(
    code: &str,
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<Option<BadgeVerification>> {
    let Some((badge, seller)) = repo.get_badge_by_code(code).await? else {
        return Ok(None);
    };

    Ok(Some(BadgeVerification {
        valid: badge.status == BadgeStatus::Active && badge.valid_until >= Utc::now(),
        status: badge.status,
        seller_name: seller.name,
        level: seller.level,
        valid_until: badge.valid_until,
    }))
}

/// Badge codes: level prefix, issuance timestamp in base 36, and a short
/// random suffix. Uppercase throughout; uniqueness is enforced by the
/// database, the suffix makes same-second collisions unlikely.
fn generate_badge_code(level: SellerLevel) -> String {
    let timestamp = Utc::now().timestamp().max(0) as u64;
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(4)
        .collect();

    format!(
        "{prefix}{ts}{suffix}",
        prefix = level.code_prefix(),
        ts = base36(timestamp)
    )
    .to_uppercase()
}

fn base36(mut n: u64) -> String {
    const DIGITS: [char; 36] = [
        '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h',
        'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    ];

    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while n > 0 {
        digits.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    digits.iter().rev().collect()
}
