//! Category directory port - read-only lookup into the category service
//!
//! Categories are foreign records owned by another service. This side only
//! needs existence and the active flag at guild creation; after that a
//! guild's `category_id` is trusted.

use async_trait::async_trait;

use crate::traits::repositories::RepoResult;
use crate::value_objects::Snowflake;

/// The slice of a category this service cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Snowflake,
    pub name: String,
    pub is_active: bool,
}

impl Category {
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_active: true,
        }
    }
}

#[async_trait]
pub trait CategoryDirectory: Send + Sync {
    /// Look up a category by ID
    async fn get(&self, id: Snowflake) -> RepoResult<Option<Category>>;
}
