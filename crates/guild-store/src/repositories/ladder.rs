//! In-memory implementation of LadderRepository

use async_trait::async_trait;
use tracing::debug;

use guild_core::entities::LevelLadder;
use guild_core::traits::{LadderRepository, RepoResult};

use crate::store::MemoryStore;

/// In-memory implementation of LadderRepository
///
/// Holds at most one platform-wide ladder. `load` falls back to the
/// formula-driven default when nothing has been stored yet.
#[derive(Clone)]
pub struct MemoryLadderRepository {
    store: MemoryStore,
}

impl MemoryLadderRepository {
    /// Create a new MemoryLadderRepository
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LadderRepository for MemoryLadderRepository {
    async fn load(&self) -> RepoResult<LevelLadder> {
        Ok(self.store.ladder().read().clone().unwrap_or_default())
    }

    async fn replace(&self, ladder: &LevelLadder) -> RepoResult<()> {
        *self.store.ladder().write() = Some(ladder.clone());
        debug!("level ladder replaced");
        Ok(())
    }
}
