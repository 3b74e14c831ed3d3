use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Review lifecycle of a seller application.
///
/// `pending -> {needs_info, qualified, rejected}`,
/// `needs_info -> {qualified, rejected}`, `qualified -> badge_activated`.
/// `badge_activated` is terminal for the application; the badge lifecycle
/// continues on the [`super::badge::Badge`] entity.
#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    #[display("pending")]
    Pending,
    #[display("needs_info")]
    NeedsInfo,
    #[display("qualified")]
    Qualified,
    #[display("rejected")]
    Rejected,
    #[display("badge_activated")]
    BadgeActivated,
}

impl ApplicationStatus {
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Pending, NeedsInfo)
                | (Pending, Qualified)
                | (Pending, Rejected)
                | (NeedsInfo, Qualified)
                | (NeedsInfo, Rejected)
                | (Qualified, BadgeActivated)
        )
    }

    pub fn parse(raw: &str) -> Option<ApplicationStatus> {
        use ApplicationStatus::*;
        match raw {
            "pending" => Some(Pending),
            "needs_info" => Some(NeedsInfo),
            "qualified" => Some(Qualified),
            "rejected" => Some(Rejected),
            "badge_activated" => Some(BadgeActivated),
            _ => None,
        }
    }
}

/// A persisted seller application.
///
/// Optional form fields that are not promoted to first-class columns live in
/// `submitted_fields` under canonical camelCase keys; fields absent from the
/// source payload are absent from the bag as well, never null-padded.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Application {
    pub id: i64,
    pub seller_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub whatsapp_number: Option<String>,
    pub category: String,
    pub language: String,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub submitted_fields: serde_json::Value,
    pub needs_info_reminder_sent_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub badge_activated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Value of an optional field stored in the overflow bag, if any.
    pub fn submitted_field(&self, key: &str) -> Option<&serde_json::Value> {
        self.submitted_fields.as_object().and_then(|m| m.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_fans_out() {
        use ApplicationStatus::*;
        assert!(Pending.can_transition_to(NeedsInfo));
        assert!(Pending.can_transition_to(Qualified));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(BadgeActivated));
    }

    #[test]
    fn test_needs_info_is_re_reviewable() {
        use ApplicationStatus::*;
        assert!(NeedsInfo.can_transition_to(Qualified));
        assert!(NeedsInfo.can_transition_to(Rejected));
        assert!(!NeedsInfo.can_transition_to(Pending));
    }

    #[test]
    fn test_badge_activated_is_terminal() {
        use ApplicationStatus::*;
        assert!(Qualified.can_transition_to(BadgeActivated));
        for next in [Pending, NeedsInfo, Qualified, Rejected, BadgeActivated] {
            assert!(!BadgeActivated.can_transition_to(next));
        }
    }

    #[test]
    fn test_status_round_trips_through_display() {
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::NeedsInfo,
            ApplicationStatus::Qualified,
            ApplicationStatus::Rejected,
            ApplicationStatus::BadgeActivated,
        ] {
            assert_eq!(ApplicationStatus::parse(&status.to_string()), Some(status));
        }
        assert_eq!(ApplicationStatus::parse("archived"), None);
    }
}
