//! Member-related types for the trip settlement engine
//!
//! A member is a participant in a single trip. Members are never physically
//! removed from a trip; departure is recorded through `left_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Member identifier
///
/// Unique within a trip. Document-store ids are opaque strings.
pub type MemberId = String;

/// Role of a member within the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// The member who created the trip
    Creator,
    /// Any other participant
    Member,
}

/// A participant in a trip
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Member id, unique within the trip
    pub id: MemberId,

    /// Display name
    pub name: String,

    /// Creator or regular member
    pub role: MemberRole,

    /// When the member was added to the trip
    pub joined_at: DateTime<Utc>,

    /// When the member left the trip (None = still active)
    pub left_at: Option<DateTime<Utc>>,

    /// Linked user account
    ///
    /// `None` marks a ghost member: a placeholder participant without an
    /// account who still shares costs like everyone else.
    pub user_id: Option<String>,
}

impl Member {
    /// Create an active member
    pub fn new(
        id: impl Into<MemberId>,
        name: impl Into<String>,
        role: MemberRole,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Member {
            id: id.into(),
            name: name.into(),
            role,
            joined_at,
            left_at: None,
            user_id: None,
        }
    }

    /// Whether the member is still on the trip
    pub fn is_active(&self) -> bool {
        self.left_at.is_none()
    }

    /// Whether the member has no linked user account
    pub fn is_ghost(&self) -> bool {
        self.user_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn joined() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_new_member_is_active_ghost() {
        let member = Member::new("m1", "Alice", MemberRole::Creator, joined());

        assert!(member.is_active());
        assert!(member.is_ghost());
        assert_eq!(member.id, "m1");
        assert_eq!(member.role, MemberRole::Creator);
    }

    #[test]
    fn test_member_with_departure_is_inactive() {
        let mut member = Member::new("m2", "Bob", MemberRole::Member, joined());
        member.left_at = Some(Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap());
        member.user_id = Some("uid-42".to_string());

        assert!(!member.is_active());
        assert!(!member.is_ghost());
    }
}
