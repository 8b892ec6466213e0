//! Request DTOs for service operations
//!
//! All request DTOs implement `Deserialize`, and `Validate` where input
//! rules apply. Snowflake IDs arrive as strings.

use guild_core::{ExpSource, GuildVisibility, JoinPolicy, LevelSpec};
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Guild Requests
// ============================================================================

/// Create guild request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGuildRequest {
    #[validate(length(min = 1, max = 40, message = "Guild name must be 1-40 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// Defaults to PUBLIC
    pub visibility: Option<GuildVisibility>,

    /// Defaults to OPEN
    pub join_policy: Option<JoinPolicy>,

    /// Category ID (Snowflake as string)
    pub category_id: String,

    /// Manual capacity override; otherwise the level-1 ladder capacity applies
    #[validate(range(min = 1, message = "max_members must be at least 1"))]
    pub max_members: Option<i32>,
}

/// Update guild request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGuildRequest {
    #[validate(length(min = 1, max = 40, message = "Guild name must be 1-40 characters"))]
    pub name: Option<String>,

    /// New description, or empty string to remove
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    pub visibility: Option<GuildVisibility>,

    pub join_policy: Option<JoinPolicy>,

    /// Manual capacity override
    #[validate(range(min = 1, message = "max_members must be at least 1"))]
    pub max_members: Option<i32>,
}

// ============================================================================
// Membership Requests
// ============================================================================

/// Join guild request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct JoinGuildRequest {
    /// Note shown to the reviewing officer
    #[validate(length(max = 200, message = "Message must be at most 200 characters"))]
    pub message: Option<String>,
}

/// Invite member request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteMemberRequest {
    /// Invitee user ID
    #[validate(length(min = 1, message = "user_id must not be empty"))]
    pub user_id: String,

    /// Note shown to the invitee
    #[validate(length(max = 200, message = "Message must be at most 200 characters"))]
    pub message: Option<String>,
}

/// Reject or cancel decision request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DecideRequest {
    #[validate(length(max = 200, message = "Reason must be at most 200 characters"))]
    pub reason: Option<String>,
}

// ============================================================================
// Progression Requests
// ============================================================================

/// Add experience request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddExperienceRequest {
    /// Amount to add; must be positive
    pub amount: i64,

    pub source: ExpSource,

    /// Foreign reference in the source system (quest ID, raid ID, ...)
    #[validate(length(max = 100, message = "source_ref must be at most 100 characters"))]
    pub source_ref: Option<String>,

    /// Member credited with the gain
    pub contributor_id: Option<String>,

    #[validate(length(max = 200, message = "Note must be at most 200 characters"))]
    pub note: Option<String>,
}

/// Subtract experience request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubtractExperienceRequest {
    /// Amount to remove; must be positive
    pub amount: i64,

    pub source: ExpSource,

    #[validate(length(max = 100, message = "source_ref must be at most 100 characters"))]
    pub source_ref: Option<String>,

    #[validate(length(max = 200, message = "Note must be at most 200 characters"))]
    pub note: Option<String>,
}

/// Replace level ladder request
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceLadderRequest {
    /// Full ladder, level 1 upward; validated by the domain constructor
    pub levels: Vec<LevelSpec>,

    /// Hard cap; `None` leaves the ladder uncapped
    pub max_level: Option<i32>,
}

// ============================================================================
// Query Requests
// ============================================================================

/// Cursor query for the experience ledger
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQueryRequest {
    /// Return entries with an ID strictly below this one (Snowflake as string)
    pub before: Option<String>,

    /// Page size; clamped to 1-100, defaults to 50
    pub limit: Option<i64>,
}
