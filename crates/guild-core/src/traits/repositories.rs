//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. `Ok(None)` means absence; `Err` is reserved
//! for infrastructure faults and constraint violations.

use async_trait::async_trait;

use crate::entities::{
    ExpHistory, Guild, GuildInvitation, GuildJoinRequest, GuildMembership, LevelLadder,
};
use crate::error::DomainError;
use crate::value_objects::{Snowflake, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Guild Repository
// ============================================================================

#[async_trait]
pub trait GuildRepository: Send + Sync {
    /// Find guild by ID, including soft-deleted rows
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Guild>>;

    /// Find guild by ID, active rows only
    async fn find_active_by_id(&self, id: Snowflake) -> RepoResult<Option<Guild>>;

    /// Check whether an active guild already uses this name
    async fn name_taken(&self, name: &str) -> RepoResult<bool>;

    /// Create a new guild; fails with `GuildNameTaken` on a name collision
    async fn create(&self, guild: &Guild) -> RepoResult<()>;

    /// Update an existing guild
    async fn update(&self, guild: &Guild) -> RepoResult<()>;

    /// Persist a master transfer as one commit: the guild row plus the
    /// outgoing (now MEMBER) and incoming (now MASTER) membership rows.
    /// A torn read must never observe a masterless guild.
    async fn commit_master_transfer(
        &self,
        guild: &Guild,
        outgoing: &GuildMembership,
        incoming: &GuildMembership,
    ) -> RepoResult<()>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find the row for a pair regardless of status (drives row reuse)
    async fn find(&self, guild_id: Snowflake, user_id: &UserId)
        -> RepoResult<Option<GuildMembership>>;

    /// Find the row for a pair only if it is ACTIVE
    async fn find_active(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> RepoResult<Option<GuildMembership>>;

    /// Insert a new row; fails with `AlreadyMember` when the pair exists
    async fn create(&self, membership: &GuildMembership) -> RepoResult<()>;

    /// Update an existing row
    async fn update(&self, membership: &GuildMembership) -> RepoResult<()>;

    /// Count ACTIVE members of a guild
    async fn count_active(&self, guild_id: Snowflake) -> RepoResult<i64>;

    /// List ACTIVE members of a guild, joined_at ascending
    async fn list_active(&self, guild_id: Snowflake) -> RepoResult<Vec<GuildMembership>>;

    /// List a user's ACTIVE memberships across active guilds
    async fn list_active_by_user(&self, user_id: &UserId) -> RepoResult<Vec<GuildMembership>>;

    /// The category-exclusivity probe: the user's ACTIVE membership in an
    /// active guild of the given category, if any
    async fn find_active_in_category(
        &self,
        user_id: &UserId,
        category_id: Snowflake,
    ) -> RepoResult<Option<GuildMembership>>;
}

// ============================================================================
// Join Request Repository
// ============================================================================

#[async_trait]
pub trait JoinRequestRepository: Send + Sync {
    /// Find request by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GuildJoinRequest>>;

    /// Find the PENDING request for a pair, if any
    async fn find_pending(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> RepoResult<Option<GuildJoinRequest>>;

    /// Create a new request
    async fn create(&self, request: &GuildJoinRequest) -> RepoResult<()>;

    /// Update an existing request
    async fn update(&self, request: &GuildJoinRequest) -> RepoResult<()>;

    /// PENDING requests for a guild, oldest first
    async fn list_pending_by_guild(&self, guild_id: Snowflake)
        -> RepoResult<Vec<GuildJoinRequest>>;

    /// All requests filed by a user, newest first
    async fn list_by_user(&self, user_id: &UserId) -> RepoResult<Vec<GuildJoinRequest>>;
}

// ============================================================================
// Invitation Repository
// ============================================================================

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Find invitation by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GuildInvitation>>;

    /// Find the PENDING invitation for a pair, if any
    async fn find_pending(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> RepoResult<Option<GuildInvitation>>;

    /// Create a new invitation
    async fn create(&self, invitation: &GuildInvitation) -> RepoResult<()>;

    /// Update an existing invitation
    async fn update(&self, invitation: &GuildInvitation) -> RepoResult<()>;

    /// PENDING invitations sent by a guild, oldest first
    async fn list_pending_by_guild(&self, guild_id: Snowflake)
        -> RepoResult<Vec<GuildInvitation>>;

    /// PENDING invitations addressed to a user, oldest first
    async fn list_pending_by_user(&self, user_id: &UserId) -> RepoResult<Vec<GuildInvitation>>;
}

// ============================================================================
// Ladder Repository
// ============================================================================

#[async_trait]
pub trait LadderRepository: Send + Sync {
    /// Load the platform ladder; the default-formula ladder when none stored
    async fn load(&self) -> RepoResult<LevelLadder>;

    /// Replace the platform ladder
    async fn replace(&self, ladder: &LevelLadder) -> RepoResult<()>;
}

// ============================================================================
// Exp History Repository
// ============================================================================

/// Cursor pagination for ledger queries
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Return entries with IDs strictly below this one
    pub before: Option<Snowflake>,
    pub limit: i64,
}

#[async_trait]
pub trait ExpHistoryRepository: Send + Sync {
    /// Append one ledger entry; entries are never updated or deleted
    async fn append(&self, entry: &ExpHistory) -> RepoResult<()>;

    /// Page through a guild's ledger, newest first
    async fn list_by_guild(
        &self,
        guild_id: Snowflake,
        query: HistoryQuery,
    ) -> RepoResult<Vec<ExpHistory>>;
}
