//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Membership not found in guild")]
    MembershipNotFound,

    #[error("Join request not found: {0}")]
    JoinRequestNotFound(Snowflake),

    #[error("Invitation not found: {0}")]
    InvitationNotFound(Snowflake),

    #[error("Category not found: {0}")]
    CategoryNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Experience amount must be positive, got {0}")]
    InvalidExpAmount(i64),

    #[error("Invalid level ladder: {0}")]
    InvalidLadder(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Only the guild master may do this")]
    NotMaster,

    #[error("Only the master or a sub-master may do this")]
    NotOfficer,

    #[error("Cannot kick a member of equal or higher rank")]
    CannotKickPeer,

    #[error("Invitation is addressed to another user")]
    InvitationNotAddressed,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Already an active member of this guild")]
    AlreadyMember,

    #[error("Guild is full ({capacity} members)")]
    GuildFull { capacity: i32 },

    #[error("User already belongs to a guild in category {category_id}")]
    CategoryExclusivity { category_id: Snowflake },

    #[error("Guild name already in use: {0}")]
    GuildNameTaken(String),

    #[error("A join request for this guild is already pending")]
    RequestAlreadyPending,

    #[error("An invitation for this user is already pending")]
    InvitationAlreadyPending,

    #[error("Request or invitation was already decided")]
    AlreadyDecided,

    #[error("Request or invitation has expired")]
    PendingExpired,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Private guilds only admit invited users")]
    PrivateGuild,

    #[error("The master cannot leave (transfer the seat first)")]
    MasterCannotLeave,

    #[error("Operation cannot target yourself")]
    CannotTargetSelf,

    #[error("Member already holds the requested role")]
    RoleUnchanged,

    // =========================================================================
    // Progress Integrity
    // =========================================================================
    #[error("Corrupt progression state: {0}")]
    CorruptProgressState(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::GuildNotFound(_) => "UNKNOWN_GUILD",
            Self::MembershipNotFound => "UNKNOWN_MEMBERSHIP",
            Self::JoinRequestNotFound(_) => "UNKNOWN_JOIN_REQUEST",
            Self::InvitationNotFound(_) => "UNKNOWN_INVITATION",
            Self::CategoryNotFound(_) => "UNKNOWN_CATEGORY",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidExpAmount(_) => "INVALID_EXP_AMOUNT",
            Self::InvalidLadder(_) => "INVALID_LADDER",

            // Authorization
            Self::NotMaster => "NOT_MASTER",
            Self::NotOfficer => "NOT_OFFICER",
            Self::CannotKickPeer => "CANNOT_KICK_PEER",
            Self::InvitationNotAddressed => "INVITATION_NOT_ADDRESSED",

            // Conflict
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::GuildFull { .. } => "GUILD_FULL",
            Self::CategoryExclusivity { .. } => "CATEGORY_EXCLUSIVITY",
            Self::GuildNameTaken(_) => "GUILD_NAME_TAKEN",
            Self::RequestAlreadyPending => "REQUEST_ALREADY_PENDING",
            Self::InvitationAlreadyPending => "INVITATION_ALREADY_PENDING",
            Self::AlreadyDecided => "ALREADY_DECIDED",
            Self::PendingExpired => "PENDING_EXPIRED",

            // Business Rules
            Self::PrivateGuild => "PRIVATE_GUILD",
            Self::MasterCannotLeave => "MASTER_CANNOT_LEAVE",
            Self::CannotTargetSelf => "CANNOT_TARGET_SELF",
            Self::RoleUnchanged => "ROLE_UNCHANGED",

            // Progress Integrity
            Self::CorruptProgressState(_) => "CORRUPT_PROGRESS_STATE",

            // Infrastructure
            Self::StorageError(_) => "STORAGE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GuildNotFound(_)
                | Self::MembershipNotFound
                | Self::JoinRequestNotFound(_)
                | Self::InvitationNotFound(_)
                | Self::CategoryNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidExpAmount(_) | Self::InvalidLadder(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotMaster | Self::NotOfficer | Self::CannotKickPeer | Self::InvitationNotAddressed
        )
    }

    /// Check if this is a conflict or business-rule error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::AlreadyMember
                | Self::GuildFull { .. }
                | Self::CategoryExclusivity { .. }
                | Self::GuildNameTaken(_)
                | Self::RequestAlreadyPending
                | Self::InvitationAlreadyPending
                | Self::AlreadyDecided
                | Self::PendingExpired
                | Self::PrivateGuild
                | Self::MasterCannotLeave
                | Self::CannotTargetSelf
                | Self::RoleUnchanged
        )
    }
}
