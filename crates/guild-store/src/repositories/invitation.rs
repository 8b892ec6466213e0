//! In-memory implementation of InvitationRepository

use async_trait::async_trait;

use guild_core::entities::GuildInvitation;
use guild_core::traits::{InvitationRepository, RepoResult};
use guild_core::value_objects::{Snowflake, UserId};
use guild_core::DomainError;

use crate::store::MemoryStore;

/// In-memory implementation of InvitationRepository
#[derive(Clone)]
pub struct MemoryInvitationRepository {
    store: MemoryStore,
}

impl MemoryInvitationRepository {
    /// Create a new MemoryInvitationRepository
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl InvitationRepository for MemoryInvitationRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GuildInvitation>> {
        Ok(self.store.invitations().get(&id).map(|row| row.clone()))
    }

    async fn find_pending(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> RepoResult<Option<GuildInvitation>> {
        let row = self
            .store
            .invitations()
            .iter()
            .filter(|row| {
                row.guild_id == guild_id && row.user_id == *user_id && row.is_pending()
            })
            .max_by_key(|row| row.id)
            .map(|row| row.clone());
        Ok(row)
    }

    async fn create(&self, invitation: &GuildInvitation) -> RepoResult<()> {
        self.store
            .invitations()
            .insert(invitation.id, invitation.clone());
        Ok(())
    }

    async fn update(&self, invitation: &GuildInvitation) -> RepoResult<()> {
        match self.store.invitations().get_mut(&invitation.id) {
            Some(mut slot) => {
                *slot = invitation.clone();
                Ok(())
            }
            None => Err(DomainError::InvitationNotFound(invitation.id)),
        }
    }

    async fn list_pending_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<GuildInvitation>> {
        let mut rows: Vec<GuildInvitation> = self
            .store
            .invitations()
            .iter()
            .filter(|row| row.guild_id == guild_id && row.is_pending())
            .map(|row| row.clone())
            .collect();
        rows.sort_by_key(|row| (row.created_at, row.id));
        Ok(rows)
    }

    async fn list_pending_by_user(&self, user_id: &UserId) -> RepoResult<Vec<GuildInvitation>> {
        let mut rows: Vec<GuildInvitation> = self
            .store
            .invitations()
            .iter()
            .filter(|row| row.user_id == *user_id && row.is_pending())
            .map(|row| row.clone())
            .collect();
        rows.sort_by_key(|row| (row.created_at, row.id));
        Ok(rows)
    }
}
