//! Per-entity async locks
//!
//! Compound membership operations read several collections, decide, then
//! write. The lock registry serializes those decide-then-write windows per
//! entity so two concurrent admissions cannot both observe the same free
//! slot or the same empty category.

use std::sync::Arc;

use dashmap::DashMap;
use guild_core::{Snowflake, UserId};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-entity mutexes
///
/// Guards are owned so they can be held across await points. Entries are
/// created on first use and never reclaimed; the key space is bounded by
/// the set of live guilds and users.
#[derive(Default)]
pub struct EntityLocks {
    guilds: DashMap<Snowflake, Arc<Mutex<()>>>,
    users: DashMap<UserId, Arc<Mutex<()>>>,
}

impl EntityLocks {
    /// Create an empty lock registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a guild
    pub async fn lock_guild(&self, guild_id: Snowflake) -> OwnedMutexGuard<()> {
        // Clone the Arc out before awaiting so the shard guard is released
        let lock = Arc::clone(&self.guilds.entry(guild_id).or_default());
        lock.lock_owned().await
    }

    /// Acquire the lock for a user
    pub async fn lock_user(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(&self.users.entry(user_id.clone()).or_default());
        lock.lock_owned().await
    }

    /// Acquire both admission locks, always user first then guild
    ///
    /// Every caller that needs both must go through here; a fixed order
    /// keeps two admissions from deadlocking against each other.
    pub async fn lock_admission(
        &self,
        user_id: &UserId,
        guild_id: Snowflake,
    ) -> (OwnedMutexGuard<()>, OwnedMutexGuard<()>) {
        let user_guard = self.lock_user(user_id).await;
        let guild_guard = self.lock_guild(guild_id).await;
        (user_guard, guild_guard)
    }
}
