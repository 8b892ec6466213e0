//! In-memory implementation of JoinRequestRepository

use async_trait::async_trait;

use guild_core::entities::GuildJoinRequest;
use guild_core::traits::{JoinRequestRepository, RepoResult};
use guild_core::value_objects::{Snowflake, UserId};
use guild_core::DomainError;

use crate::store::MemoryStore;

/// In-memory implementation of JoinRequestRepository
#[derive(Clone)]
pub struct MemoryJoinRequestRepository {
    store: MemoryStore,
}

impl MemoryJoinRequestRepository {
    /// Create a new MemoryJoinRequestRepository
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl JoinRequestRepository for MemoryJoinRequestRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GuildJoinRequest>> {
        Ok(self.store.join_requests().get(&id).map(|row| row.clone()))
    }

    async fn find_pending(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> RepoResult<Option<GuildJoinRequest>> {
        // Newest row wins if stale expired rows are still lying around
        let row = self
            .store
            .join_requests()
            .iter()
            .filter(|row| {
                row.guild_id == guild_id && row.user_id == *user_id && row.is_pending()
            })
            .max_by_key(|row| row.id)
            .map(|row| row.clone());
        Ok(row)
    }

    async fn create(&self, request: &GuildJoinRequest) -> RepoResult<()> {
        self.store.join_requests().insert(request.id, request.clone());
        Ok(())
    }

    async fn update(&self, request: &GuildJoinRequest) -> RepoResult<()> {
        match self.store.join_requests().get_mut(&request.id) {
            Some(mut slot) => {
                *slot = request.clone();
                Ok(())
            }
            None => Err(DomainError::JoinRequestNotFound(request.id)),
        }
    }

    async fn list_pending_by_guild(
        &self,
        guild_id: Snowflake,
    ) -> RepoResult<Vec<GuildJoinRequest>> {
        let mut rows: Vec<GuildJoinRequest> = self
            .store
            .join_requests()
            .iter()
            .filter(|row| row.guild_id == guild_id && row.is_pending())
            .map(|row| row.clone())
            .collect();
        rows.sort_by_key(|row| (row.created_at, row.id));
        Ok(rows)
    }

    async fn list_by_user(&self, user_id: &UserId) -> RepoResult<Vec<GuildJoinRequest>> {
        let mut rows: Vec<GuildJoinRequest> = self
            .store
            .join_requests()
            .iter()
            .filter(|row| row.user_id == *user_id)
            .map(|row| row.clone())
            .collect();
        rows.sort_by_key(|row| std::cmp::Reverse((row.created_at, row.id)));
        Ok(rows)
    }
}
