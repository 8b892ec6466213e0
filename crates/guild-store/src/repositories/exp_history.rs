//! In-memory implementation of ExpHistoryRepository

use async_trait::async_trait;

use guild_core::entities::ExpHistory;
use guild_core::traits::{ExpHistoryRepository, HistoryQuery, RepoResult};
use guild_core::value_objects::Snowflake;

use crate::store::MemoryStore;

/// In-memory implementation of ExpHistoryRepository
///
/// Entries are grouped per guild and only ever pushed, matching the
/// append-only ledger contract.
#[derive(Clone)]
pub struct MemoryExpHistoryRepository {
    store: MemoryStore,
}

impl MemoryExpHistoryRepository {
    /// Create a new MemoryExpHistoryRepository
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ExpHistoryRepository for MemoryExpHistoryRepository {
    async fn append(&self, entry: &ExpHistory) -> RepoResult<()> {
        self.store
            .exp_history()
            .entry(entry.guild_id)
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn list_by_guild(
        &self,
        guild_id: Snowflake,
        query: HistoryQuery,
    ) -> RepoResult<Vec<ExpHistory>> {
        let mut rows: Vec<ExpHistory> = self
            .store
            .exp_history()
            .get(&guild_id)
            .map(|entries| entries.clone())
            .unwrap_or_default();

        if let Some(before) = query.before {
            rows.retain(|row| row.id < before);
        }
        // ids are time-ordered, so id-descending is newest first
        rows.sort_by_key(|row| std::cmp::Reverse(row.id));

        let limit = usize::try_from(query.limit.max(0)).unwrap_or(0);
        rows.truncate(limit);
        Ok(rows)
    }
}
