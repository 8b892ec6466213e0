//! Guild membership entity and the role hierarchy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Snowflake, UserId};

/// Role within a guild, highest authority first: MASTER > SUB_MASTER > MEMBER
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuildRole {
    Master,
    SubMaster,
    Member,
}

impl GuildRole {
    /// Numeric authority rank, higher outranks lower
    pub const fn rank(self) -> u8 {
        match self {
            Self::Master => 3,
            Self::SubMaster => 2,
            Self::Member => 1,
        }
    }

    /// MASTER and SUB_MASTER may operate on admission queues and kick
    pub const fn is_officer(self) -> bool {
        matches!(self, Self::Master | Self::SubMaster)
    }

    /// Whether this role has strictly more authority than `other`
    pub const fn outranks(self, other: Self) -> bool {
        self.rank() > other.rank()
    }
}

/// Lifecycle status of a membership row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    Active,
    Left,
    Kicked,
}

/// Membership row, one per `(guild, user)` pair for the row's whole lifetime
///
/// Departure soft-deletes (`LEFT`/`KICKED` + `left_at`); rejoining
/// reactivates the same row with the role reset to MEMBER.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMembership {
    pub guild_id: Snowflake,
    pub user_id: UserId,
    pub role: GuildRole,
    pub status: MembershipStatus,
    pub joined_at: DateTime<Utc>,
    pub left_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl GuildMembership {
    fn new_with_role(guild_id: Snowflake, user_id: UserId, role: GuildRole) -> Self {
        let now = Utc::now();
        Self {
            guild_id,
            user_id,
            role,
            status: MembershipStatus::Active,
            joined_at: now,
            left_at: None,
            updated_at: now,
        }
    }

    /// Fresh MEMBER row for a newly admitted user
    pub fn new_member(guild_id: Snowflake, user_id: UserId) -> Self {
        Self::new_with_role(guild_id, user_id, GuildRole::Member)
    }

    /// MASTER row seeded when a guild is created
    pub fn new_master(guild_id: Snowflake, user_id: UserId) -> Self {
        Self::new_with_role(guild_id, user_id, GuildRole::Master)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }

    #[inline]
    pub fn is_officer(&self) -> bool {
        self.role.is_officer()
    }

    /// Voluntary departure
    pub fn mark_left(&mut self) {
        self.status = MembershipStatus::Left;
        self.left_at = Some(Utc::now());
        self.touch();
    }

    /// Removal by an officer
    pub fn mark_kicked(&mut self) {
        self.status = MembershipStatus::Kicked;
        self.left_at = Some(Utc::now());
        self.touch();
    }

    /// Rejoin: reuse the row, reset to a plain active MEMBER
    pub fn reactivate(&mut self) {
        let now = Utc::now();
        self.role = GuildRole::Member;
        self.status = MembershipStatus::Active;
        self.joined_at = now;
        self.left_at = None;
        self.updated_at = now;
    }

    /// Change the role in place
    pub fn change_role(&mut self, role: GuildRole) {
        self.role = role;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
