//! Guild entity - the aggregate shared by the membership and progression engines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::level_ladder::default_capacity;
use crate::value_objects::{Snowflake, UserId};

/// Who can see the guild in discovery surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuildVisibility {
    Public,
    Private,
}

/// How self-serve joining is handled for PUBLIC guilds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinPolicy {
    Open,
    ApprovalRequired,
}

/// Guild entity
///
/// `max_members` is denormalized from the level ladder: level changes
/// overwrite it, guild settings may override it in between. `is_active` is
/// the soft-delete flag; an inactive guild is invisible to every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub visibility: GuildVisibility,
    pub join_policy: JoinPolicy,
    pub master_id: UserId,
    pub category_id: Snowflake,
    pub max_members: i32,
    pub current_level: i32,
    pub current_exp: i64,
    pub total_exp: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guild {
    /// Create a fresh guild: public, open, level 1, formula capacity
    pub fn new(id: Snowflake, name: String, master_id: UserId, category_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: None,
            visibility: GuildVisibility::Public,
            join_policy: JoinPolicy::Open,
            master_id,
            category_id,
            max_members: default_capacity(1),
            current_level: 1,
            current_exp: 0,
            total_exp: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if a user is the guild master
    #[inline]
    pub fn is_master(&self, user_id: &UserId) -> bool {
        self.master_id == *user_id
    }

    /// Update the guild name
    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.touch();
    }

    /// Update the guild description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    /// Update the visibility
    pub fn set_visibility(&mut self, visibility: GuildVisibility) {
        self.visibility = visibility;
        self.touch();
    }

    /// Update the join policy
    pub fn set_join_policy(&mut self, policy: JoinPolicy) {
        self.join_policy = policy;
        self.touch();
    }

    /// Override the capacity independently of the level ladder
    ///
    /// The next level change overwrites this with the ladder value.
    pub fn override_capacity(&mut self, max_members: i32) {
        self.max_members = max_members;
        self.touch();
    }

    /// Hand the master seat to another user
    pub fn transfer_master(&mut self, new_master: UserId) {
        self.master_id = new_master;
        self.touch();
    }

    /// Soft-delete the guild
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
