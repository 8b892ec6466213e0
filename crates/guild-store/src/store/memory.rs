//! Shared in-memory backing store
//!
//! One `MemoryStore` owns every collection the repositories operate on. The
//! handle clones cheaply like a connection pool: every clone sees the same
//! data, so the repositories can each hold their own copy.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

use guild_core::{
    Category, ExpHistory, Guild, GuildInvitation, GuildJoinRequest, GuildMembership, LevelLadder,
    Snowflake, UserId,
};

/// Cheaply clonable handle to the shared collections
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Collections>,
}

#[derive(Default)]
struct Collections {
    guilds: DashMap<Snowflake, Guild>,
    memberships: DashMap<(Snowflake, UserId), GuildMembership>,
    join_requests: DashMap<Snowflake, GuildJoinRequest>,
    invitations: DashMap<Snowflake, GuildInvitation>,
    categories: DashMap<Snowflake, Category>,
    exp_history: DashMap<Snowflake, Vec<ExpHistory>>,
    ladder: RwLock<Option<LevelLadder>>,
    // Serializes the name-uniqueness check against the guild insert
    guild_create_guard: Mutex<()>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category so `CategoryDirectory` lookups can resolve it
    pub fn put_category(&self, category: Category) {
        self.inner.categories.insert(category.id, category);
    }

    pub(crate) fn guilds(&self) -> &DashMap<Snowflake, Guild> {
        &self.inner.guilds
    }

    pub(crate) fn memberships(&self) -> &DashMap<(Snowflake, UserId), GuildMembership> {
        &self.inner.memberships
    }

    pub(crate) fn join_requests(&self) -> &DashMap<Snowflake, GuildJoinRequest> {
        &self.inner.join_requests
    }

    pub(crate) fn invitations(&self) -> &DashMap<Snowflake, GuildInvitation> {
        &self.inner.invitations
    }

    pub(crate) fn categories(&self) -> &DashMap<Snowflake, Category> {
        &self.inner.categories
    }

    pub(crate) fn exp_history(&self) -> &DashMap<Snowflake, Vec<ExpHistory>> {
        &self.inner.exp_history
    }

    pub(crate) fn ladder(&self) -> &RwLock<Option<LevelLadder>> {
        &self.inner.ladder
    }

    pub(crate) fn guild_create_guard(&self) -> &Mutex<()> {
        &self.inner.guild_create_guard
    }
}
