use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BadgeStatus {
    #[default]
    #[display("active")]
    Active,
    #[display("suspended")]
    Suspended,
    #[display("revoked")]
    Revoked,
}

impl BadgeStatus {
    /// `active <-> suspended` (renew reactivates), `revoked` is terminal.
    pub fn can_transition_to(&self, next: BadgeStatus) -> bool {
        use BadgeStatus::*;
        matches!(
            (self, next),
            (Active, Suspended) | (Active, Revoked) | (Suspended, Active) | (Suspended, Revoked)
        )
    }
}

/// Verification levels a seller can hold, from the numeric level sent by the
/// review dashboard.
#[derive(Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SellerLevel {
    #[display("verified")]
    Verified,
    #[display("trusted")]
    Trusted,
    #[display("golden")]
    Golden,
    #[default]
    #[display("basic")]
    Basic,
}

impl SellerLevel {
    pub fn from_numeric(level: u8) -> SellerLevel {
        match level {
            1 => SellerLevel::Verified,
            2 => SellerLevel::Trusted,
            3 => SellerLevel::Golden,
            _ => SellerLevel::Basic,
        }
    }

    /// Single-letter prefix baked into badge codes.
    pub fn code_prefix(&self) -> char {
        match self {
            SellerLevel::Trusted => 'T',
            SellerLevel::Golden => 'G',
            _ => 'V',
        }
    }
}

/// A seller row, deduplicated by exact name.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Seller {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub city: Option<String>,
    pub shop_url: Option<String>,
    pub level: SellerLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A time-limited verification credential issued to an approved seller.
/// Badges are never deleted; revocation is a status change.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Badge {
    pub id: i64,
    pub seller_id: i64,
    pub code: String,
    pub status: BadgeStatus,
    pub valid_until: DateTime<Utc>,
    pub issued_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_numeric() {
        assert_eq!(SellerLevel::from_numeric(1), SellerLevel::Verified);
        assert_eq!(SellerLevel::from_numeric(2), SellerLevel::Trusted);
        assert_eq!(SellerLevel::from_numeric(3), SellerLevel::Golden);
        assert_eq!(SellerLevel::from_numeric(9), SellerLevel::Basic);
    }

    #[test]
    fn test_revoked_is_terminal() {
        use BadgeStatus::*;
        assert!(Active.can_transition_to(Suspended));
        assert!(Suspended.can_transition_to(Active));
        assert!(!Revoked.can_transition_to(Active));
        assert!(!Revoked.can_transition_to(Suspended));
    }
}
