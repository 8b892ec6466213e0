//! In-memory implementation of GuildRepository

use async_trait::async_trait;
use tracing::debug;

use guild_core::entities::{Guild, GuildMembership};
use guild_core::traits::{GuildRepository, RepoResult};
use guild_core::value_objects::Snowflake;
use guild_core::DomainError;

use crate::store::MemoryStore;

/// In-memory implementation of GuildRepository
#[derive(Clone)]
pub struct MemoryGuildRepository {
    store: MemoryStore,
}

impl MemoryGuildRepository {
    /// Create a new MemoryGuildRepository
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    fn name_in_use(&self, name: &str) -> bool {
        self.store
            .guilds()
            .iter()
            .any(|guild| guild.is_active && guild.name == name)
    }
}

#[async_trait]
impl GuildRepository for MemoryGuildRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Guild>> {
        Ok(self.store.guilds().get(&id).map(|guild| guild.clone()))
    }

    async fn find_active_by_id(&self, id: Snowflake) -> RepoResult<Option<Guild>> {
        Ok(self
            .store
            .guilds()
            .get(&id)
            .filter(|guild| guild.is_active)
            .map(|guild| guild.clone()))
    }

    async fn name_taken(&self, name: &str) -> RepoResult<bool> {
        Ok(self.name_in_use(name))
    }

    async fn create(&self, guild: &Guild) -> RepoResult<()> {
        let _guard = self.store.guild_create_guard().lock();

        if self.name_in_use(&guild.name) {
            debug!(name = %guild.name, "guild name collision on create");
            return Err(DomainError::GuildNameTaken(guild.name.clone()));
        }

        self.store.guilds().insert(guild.id, guild.clone());
        Ok(())
    }

    async fn update(&self, guild: &Guild) -> RepoResult<()> {
        match self.store.guilds().get_mut(&guild.id) {
            Some(mut slot) => {
                *slot = guild.clone();
                Ok(())
            }
            None => Err(DomainError::GuildNotFound(guild.id)),
        }
    }

    async fn commit_master_transfer(
        &self,
        guild: &Guild,
        outgoing: &GuildMembership,
        incoming: &GuildMembership,
    ) -> RepoResult<()> {
        if !self.store.guilds().contains_key(&guild.id) {
            return Err(DomainError::GuildNotFound(guild.id));
        }
        let outgoing_key = (outgoing.guild_id, outgoing.user_id.clone());
        let incoming_key = (incoming.guild_id, incoming.user_id.clone());
        if !self.store.memberships().contains_key(&outgoing_key)
            || !self.store.memberships().contains_key(&incoming_key)
        {
            return Err(DomainError::MembershipNotFound);
        }

        // Promote before demoting so a torn read never sees a masterless guild
        self.store
            .memberships()
            .insert(incoming_key, incoming.clone());
        self.store.guilds().insert(guild.id, guild.clone());
        self.store
            .memberships()
            .insert(outgoing_key, outgoing.clone());

        debug!(guild_id = %guild.id, master = %guild.master_id, "master transfer committed");
        Ok(())
    }
}
