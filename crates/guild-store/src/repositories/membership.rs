//! In-memory implementation of MembershipRepository

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use guild_core::entities::GuildMembership;
use guild_core::traits::{MembershipRepository, RepoResult};
use guild_core::value_objects::{Snowflake, UserId};
use guild_core::DomainError;

use crate::store::MemoryStore;

/// In-memory implementation of MembershipRepository
#[derive(Clone)]
pub struct MemoryMembershipRepository {
    store: MemoryStore,
}

impl MemoryMembershipRepository {
    /// Create a new MemoryMembershipRepository
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MembershipRepository for MemoryMembershipRepository {
    async fn find(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> RepoResult<Option<GuildMembership>> {
        let key = (guild_id, user_id.clone());
        Ok(self.store.memberships().get(&key).map(|row| row.clone()))
    }

    async fn find_active(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> RepoResult<Option<GuildMembership>> {
        let key = (guild_id, user_id.clone());
        Ok(self
            .store
            .memberships()
            .get(&key)
            .filter(|row| row.is_active())
            .map(|row| row.clone()))
    }

    async fn create(&self, membership: &GuildMembership) -> RepoResult<()> {
        let key = (membership.guild_id, membership.user_id.clone());
        match self.store.memberships().entry(key) {
            Entry::Occupied(_) => {
                debug!(
                    guild_id = %membership.guild_id,
                    user_id = %membership.user_id,
                    "membership row already exists"
                );
                Err(DomainError::AlreadyMember)
            }
            Entry::Vacant(slot) => {
                slot.insert(membership.clone());
                Ok(())
            }
        }
    }

    async fn update(&self, membership: &GuildMembership) -> RepoResult<()> {
        let key = (membership.guild_id, membership.user_id.clone());
        match self.store.memberships().get_mut(&key) {
            Some(mut slot) => {
                *slot = membership.clone();
                Ok(())
            }
            None => Err(DomainError::MembershipNotFound),
        }
    }

    async fn count_active(&self, guild_id: Snowflake) -> RepoResult<i64> {
        let count = self
            .store
            .memberships()
            .iter()
            .filter(|row| row.guild_id == guild_id && row.is_active())
            .count();
        Ok(count as i64)
    }

    async fn list_active(&self, guild_id: Snowflake) -> RepoResult<Vec<GuildMembership>> {
        let mut rows: Vec<GuildMembership> = self
            .store
            .memberships()
            .iter()
            .filter(|row| row.guild_id == guild_id && row.is_active())
            .map(|row| row.clone())
            .collect();
        rows.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.user_id.as_str().cmp(b.user_id.as_str()))
        });
        Ok(rows)
    }

    async fn list_active_by_user(&self, user_id: &UserId) -> RepoResult<Vec<GuildMembership>> {
        let mut rows: Vec<GuildMembership> = self
            .store
            .memberships()
            .iter()
            .filter(|row| row.user_id == *user_id && row.is_active())
            .filter(|row| {
                self.store
                    .guilds()
                    .get(&row.guild_id)
                    .is_some_and(|guild| guild.is_active)
            })
            .map(|row| row.clone())
            .collect();
        rows.sort_by_key(|row| row.joined_at);
        Ok(rows)
    }

    async fn find_active_in_category(
        &self,
        user_id: &UserId,
        category_id: Snowflake,
    ) -> RepoResult<Option<GuildMembership>> {
        let row = self
            .store
            .memberships()
            .iter()
            .filter(|row| row.user_id == *user_id && row.is_active())
            .find(|row| {
                self.store
                    .guilds()
                    .get(&row.guild_id)
                    .is_some_and(|guild| guild.is_active && guild.category_id == category_id)
            })
            .map(|row| row.clone());
        Ok(row)
    }
}
