//! Domain events - emitted after guild state changes commit
//!
//! Consumers (notification fan-out, activity feeds, audit trails) subscribe
//! through the `EventSink` port. Emission is best-effort: a failed emit never
//! rolls back or fails the operation that produced the event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{GuildRole, JoinRequestStatus};
use crate::value_objects::{Snowflake, UserId};

/// All events the guild engines emit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuildEvent {
    // =========================================================================
    // Guild Lifecycle Events
    // =========================================================================
    GuildCreated(GuildCreatedEvent),
    GuildDisbanded(GuildDisbandedEvent),

    // =========================================================================
    // Membership Events
    // =========================================================================
    MemberJoined(MemberJoinedEvent),
    MemberLeft(MemberLeftEvent),
    MemberKicked(MemberKickedEvent),
    MemberRoleChanged(MemberRoleChangedEvent),
    MasterTransferred(MasterTransferredEvent),

    // =========================================================================
    // Admission Queue Events
    // =========================================================================
    JoinRequestDecided(JoinRequestDecidedEvent),
    InvitationIssued(InvitationIssuedEvent),

    // =========================================================================
    // Progression Events
    // =========================================================================
    LevelChanged(LevelChangedEvent),
}

impl GuildEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::GuildCreated(_) => "GUILD_CREATED",
            Self::GuildDisbanded(_) => "GUILD_DISBANDED",
            Self::MemberJoined(_) => "MEMBER_JOINED",
            Self::MemberLeft(_) => "MEMBER_LEFT",
            Self::MemberKicked(_) => "MEMBER_KICKED",
            Self::MemberRoleChanged(_) => "MEMBER_ROLE_CHANGED",
            Self::MasterTransferred(_) => "MASTER_TRANSFERRED",
            Self::JoinRequestDecided(_) => "JOIN_REQUEST_DECIDED",
            Self::InvitationIssued(_) => "INVITATION_ISSUED",
            Self::LevelChanged(_) => "LEVEL_CHANGED",
        }
    }

    /// Get the guild the event belongs to
    pub fn guild_id(&self) -> Snowflake {
        match self {
            Self::GuildCreated(e) => e.guild_id,
            Self::GuildDisbanded(e) => e.guild_id,
            Self::MemberJoined(e) => e.guild_id,
            Self::MemberLeft(e) => e.guild_id,
            Self::MemberKicked(e) => e.guild_id,
            Self::MemberRoleChanged(e) => e.guild_id,
            Self::MasterTransferred(e) => e.guild_id,
            Self::JoinRequestDecided(e) => e.guild_id,
            Self::InvitationIssued(e) => e.guild_id,
            Self::LevelChanged(e) => e.guild_id,
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::GuildCreated(e) => e.timestamp,
            Self::GuildDisbanded(e) => e.timestamp,
            Self::MemberJoined(e) => e.timestamp,
            Self::MemberLeft(e) => e.timestamp,
            Self::MemberKicked(e) => e.timestamp,
            Self::MemberRoleChanged(e) => e.timestamp,
            Self::MasterTransferred(e) => e.timestamp,
            Self::JoinRequestDecided(e) => e.timestamp,
            Self::InvitationIssued(e) => e.timestamp,
            Self::LevelChanged(e) => e.timestamp,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildCreatedEvent {
    pub guild_id: Snowflake,
    pub master_id: UserId,
    pub category_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl GuildCreatedEvent {
    pub fn new(guild_id: Snowflake, master_id: UserId, category_id: Snowflake) -> GuildEvent {
        GuildEvent::GuildCreated(Self {
            guild_id,
            master_id,
            category_id,
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildDisbandedEvent {
    pub guild_id: Snowflake,
    pub timestamp: DateTime<Utc>,
}

impl GuildDisbandedEvent {
    pub fn new(guild_id: Snowflake) -> GuildEvent {
        GuildEvent::GuildDisbanded(Self {
            guild_id,
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberJoinedEvent {
    pub guild_id: Snowflake,
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
}

impl MemberJoinedEvent {
    pub fn new(guild_id: Snowflake, user_id: UserId) -> GuildEvent {
        GuildEvent::MemberJoined(Self {
            guild_id,
            user_id,
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberLeftEvent {
    pub guild_id: Snowflake,
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
}

impl MemberLeftEvent {
    pub fn new(guild_id: Snowflake, user_id: UserId) -> GuildEvent {
        GuildEvent::MemberLeft(Self {
            guild_id,
            user_id,
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberKickedEvent {
    pub guild_id: Snowflake,
    pub user_id: UserId,
    pub kicked_by: UserId,
    pub timestamp: DateTime<Utc>,
}

impl MemberKickedEvent {
    pub fn new(guild_id: Snowflake, user_id: UserId, kicked_by: UserId) -> GuildEvent {
        GuildEvent::MemberKicked(Self {
            guild_id,
            user_id,
            kicked_by,
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRoleChangedEvent {
    pub guild_id: Snowflake,
    pub user_id: UserId,
    pub changed_by: UserId,
    pub role_before: GuildRole,
    pub role_after: GuildRole,
    pub timestamp: DateTime<Utc>,
}

impl MemberRoleChangedEvent {
    pub fn new(
        guild_id: Snowflake,
        user_id: UserId,
        changed_by: UserId,
        role_before: GuildRole,
        role_after: GuildRole,
    ) -> GuildEvent {
        GuildEvent::MemberRoleChanged(Self {
            guild_id,
            user_id,
            changed_by,
            role_before,
            role_after,
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterTransferredEvent {
    pub guild_id: Snowflake,
    pub previous_master: UserId,
    pub new_master: UserId,
    pub timestamp: DateTime<Utc>,
}

impl MasterTransferredEvent {
    pub fn new(guild_id: Snowflake, previous_master: UserId, new_master: UserId) -> GuildEvent {
        GuildEvent::MasterTransferred(Self {
            guild_id,
            previous_master,
            new_master,
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequestDecidedEvent {
    pub guild_id: Snowflake,
    pub request_id: Snowflake,
    pub user_id: UserId,
    pub decision: JoinRequestStatus,
    pub decided_by: UserId,
    pub timestamp: DateTime<Utc>,
}

impl JoinRequestDecidedEvent {
    pub fn new(
        guild_id: Snowflake,
        request_id: Snowflake,
        user_id: UserId,
        decision: JoinRequestStatus,
        decided_by: UserId,
    ) -> GuildEvent {
        GuildEvent::JoinRequestDecided(Self {
            guild_id,
            request_id,
            user_id,
            decision,
            decided_by,
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationIssuedEvent {
    pub guild_id: Snowflake,
    pub invitation_id: Snowflake,
    pub user_id: UserId,
    pub invited_by: UserId,
    pub timestamp: DateTime<Utc>,
}

impl InvitationIssuedEvent {
    pub fn new(
        guild_id: Snowflake,
        invitation_id: Snowflake,
        user_id: UserId,
        invited_by: UserId,
    ) -> GuildEvent {
        GuildEvent::InvitationIssued(Self {
            guild_id,
            invitation_id,
            user_id,
            invited_by,
            timestamp: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelChangedEvent {
    pub guild_id: Snowflake,
    pub level_before: i32,
    pub level_after: i32,
    pub max_members: i32,
    pub timestamp: DateTime<Utc>,
}

impl LevelChangedEvent {
    pub fn new(
        guild_id: Snowflake,
        level_before: i32,
        level_after: i32,
        max_members: i32,
    ) -> GuildEvent {
        GuildEvent::LevelChanged(Self {
            guild_id,
            level_before,
            level_after,
            max_members,
            timestamp: Utc::now(),
        })
    }
}
