//! Event sink port - where committed domain events go
//!
//! Delivery is at-most-once and best-effort. Services emit after their state
//! change commits and swallow sink failures; an event must never fail or roll
//! back the operation that produced it.

use async_trait::async_trait;

use crate::events::GuildEvent;
use crate::traits::repositories::RepoResult;

#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event to downstream consumers
    async fn emit(&self, event: GuildEvent) -> RepoResult<()>;
}
