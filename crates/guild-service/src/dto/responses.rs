//! Response DTOs for service operations
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use guild_core::{
    ExpSource, GuildRole, GuildVisibility, InvitationStatus, JoinPolicy, JoinRequestStatus,
    MembershipStatus,
};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response with cursor-based pagination
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, before: Option<String>, has_more: bool, limit: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                before,
                has_more,
                limit,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Cursor for fetching the next (older) page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Whether more results exist
    pub has_more: bool,
    /// Page size limit used
    pub limit: i64,
}

// ============================================================================
// Guild Responses
// ============================================================================

/// Guild response
#[derive(Debug, Clone, Serialize)]
pub struct GuildResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub visibility: GuildVisibility,
    pub join_policy: JoinPolicy,
    pub master_id: String,
    pub category_id: String,
    pub max_members: i32,
    pub current_level: i32,
    pub current_exp: i64,
    pub total_exp: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Membership Responses
// ============================================================================

/// Membership response
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub guild_id: String,
    pub user_id: String,
    pub role: GuildRole,
    pub status: MembershipStatus,
    pub joined_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_at: Option<DateTime<Utc>>,
}

/// Join request response
#[derive(Debug, Clone, Serialize)]
pub struct JoinRequestResponse {
    pub id: String,
    pub guild_id: String,
    pub user_id: String,
    pub status: JoinRequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Invitation response
#[derive(Debug, Clone, Serialize)]
pub struct InvitationResponse {
    pub id: String,
    pub guild_id: String,
    pub user_id: String,
    pub invited_by: String,
    pub status: InvitationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Outcome of a join attempt
///
/// OPEN guilds admit immediately; APPROVAL_REQUIRED guilds leave a pending
/// request behind. The tag tells the caller which happened.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinOutcomeResponse {
    Joined { membership: MembershipResponse },
    Pending { request: JoinRequestResponse },
}

// ============================================================================
// Progression Responses
// ============================================================================

/// Result of an experience mutation
#[derive(Debug, Clone, Serialize)]
pub struct ProgressionOutcome {
    pub guild_id: String,
    pub level_before: i32,
    pub level_after: i32,
    pub current_exp: i64,
    pub total_exp: i64,
    pub max_members: i32,
    pub leveled: bool,
}

/// Progression snapshot for a guild
#[derive(Debug, Clone, Serialize)]
pub struct GuildProgressResponse {
    pub guild_id: String,
    pub level: i32,
    pub current_exp: i64,
    pub total_exp: i64,
    /// Omitted at the level cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_to_next_level: Option<i64>,
    pub max_members: i32,
    pub member_count: i64,
}

/// Experience ledger entry response
#[derive(Debug, Clone, Serialize)]
pub struct ExpHistoryResponse {
    pub id: String,
    pub guild_id: String,
    pub exp_delta: i64,
    pub source: ExpSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub level_before: i32,
    pub level_after: i32,
    pub created_at: DateTime<Utc>,
}

/// One configured ladder level
#[derive(Debug, Clone, Serialize)]
pub struct LadderLevelResponse {
    pub level: i32,
    pub required_exp: i64,
    pub cumulative_exp: i64,
    pub max_members: i32,
}

/// Level ladder response
///
/// Only the explicitly configured region is listed; levels past it follow
/// the default formula.
#[derive(Debug, Clone, Serialize)]
pub struct LadderResponse {
    pub levels: Vec<LadderLevelResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_level: Option<i32>,
}
