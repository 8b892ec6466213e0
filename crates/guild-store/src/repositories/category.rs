//! In-memory implementation of CategoryDirectory

use async_trait::async_trait;

use guild_core::traits::{Category, CategoryDirectory, RepoResult};
use guild_core::value_objects::Snowflake;

use crate::store::MemoryStore;

/// In-memory implementation of CategoryDirectory
///
/// Categories are seeded through [`MemoryStore::put_category`]; this
/// adapter only reads them.
#[derive(Clone)]
pub struct MemoryCategoryDirectory {
    store: MemoryStore,
}

impl MemoryCategoryDirectory {
    /// Create a new MemoryCategoryDirectory
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CategoryDirectory for MemoryCategoryDirectory {
    async fn get(&self, id: Snowflake) -> RepoResult<Option<Category>> {
        Ok(self.store.categories().get(&id).map(|c| c.clone()))
    }
}
