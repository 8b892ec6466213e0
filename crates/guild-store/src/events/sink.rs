//! In-memory implementation of EventSink

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use guild_core::traits::{EventSink, RepoResult};
use guild_core::GuildEvent;

/// Buffering event sink
///
/// Emitted events accumulate until something drains them. Tests use this to
/// assert on what the services published; a deployment would swap in a sink
/// that forwards to a broker.
#[derive(Clone, Default)]
pub struct MemoryEventSink {
    events: Arc<Mutex<Vec<GuildEvent>>>,
}

impl MemoryEventSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every buffered event, oldest first
    #[must_use]
    pub fn drain(&self) -> Vec<GuildEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of buffered events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

#[async_trait]
impl EventSink for MemoryEventSink {
    async fn emit(&self, event: GuildEvent) -> RepoResult<()> {
        self.events.lock().push(event);
        Ok(())
    }
}
