//! Test fixtures and data generators
//!
//! Provides a wired-up service environment plus unique request builders
//! for integration tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use guild_common::PendingConfig;
use guild_core::{Category, GuildEvent, GuildVisibility, JoinPolicy, Snowflake, SnowflakeGenerator};
use guild_service::dto::{CreateGuildRequest, InviteMemberRequest, JoinGuildRequest};
use guild_service::{GuildService, MembershipService, ProgressionService, ServiceContext};
use guild_store::{
    MemoryCategoryDirectory, MemoryEventSink, MemoryExpHistoryRepository, MemoryGuildRepository,
    MemoryInvitationRepository, MemoryJoinRequestRepository, MemoryLadderRepository,
    MemoryMembershipRepository, MemoryStore,
};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Fully wired in-memory environment
///
/// Every test gets its own store, so tests never see each other's data and
/// can run in parallel. The event sink handle is kept so tests can drain
/// and assert on what the services published.
pub struct TestEnv {
    store: MemoryStore,
    sink: MemoryEventSink,
    ctx: ServiceContext,
}

impl TestEnv {
    /// Environment with the default pending-record TTL policy
    pub fn new() -> Self {
        Self::with_pending(PendingConfig::default())
    }

    /// Environment with a custom pending-record TTL policy
    pub fn with_pending(pending: PendingConfig) -> Self {
        let store = MemoryStore::new();
        let sink = MemoryEventSink::new();

        let ctx = ServiceContext::new(
            Arc::new(MemoryGuildRepository::new(store.clone())),
            Arc::new(MemoryMembershipRepository::new(store.clone())),
            Arc::new(MemoryJoinRequestRepository::new(store.clone())),
            Arc::new(MemoryInvitationRepository::new(store.clone())),
            Arc::new(MemoryLadderRepository::new(store.clone())),
            Arc::new(MemoryExpHistoryRepository::new(store.clone())),
            Arc::new(MemoryCategoryDirectory::new(store.clone())),
            Arc::new(sink.clone()),
            Arc::new(SnowflakeGenerator::new(1)),
            pending,
        );

        Self { store, sink, ctx }
    }

    pub fn ctx(&self) -> &ServiceContext {
        &self.ctx
    }

    pub fn guilds(&self) -> GuildService<'_> {
        GuildService::new(&self.ctx)
    }

    pub fn members(&self) -> MembershipService<'_> {
        MembershipService::new(&self.ctx)
    }

    pub fn progression(&self) -> ProgressionService<'_> {
        ProgressionService::new(&self.ctx)
    }

    /// Register a category and return its ID
    pub fn seed_category(&self, name: &str) -> Snowflake {
        let id = self.ctx.generate_id();
        self.store.put_category(Category::new(id, name));
        id
    }

    /// Register a deactivated category and return its ID
    pub fn seed_retired_category(&self, name: &str) -> Snowflake {
        let id = self.ctx.generate_id();
        let mut category = Category::new(id, name);
        category.is_active = false;
        self.store.put_category(category);
        id
    }

    /// Take every buffered event, oldest first
    pub fn drain_events(&self) -> Vec<GuildEvent> {
        self.sink.drain()
    }

    /// Take every buffered event and keep only the type names
    pub fn drain_event_types(&self) -> Vec<&'static str> {
        self.sink.drain().iter().map(GuildEvent::event_type).collect()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Create-guild request with a unique name; OPEN and PUBLIC by default
pub fn guild_request(category_id: Snowflake) -> CreateGuildRequest {
    let suffix = unique_suffix();
    CreateGuildRequest {
        name: format!("Test Guild {suffix}"),
        description: Some("A test guild".to_string()),
        visibility: None,
        join_policy: None,
        category_id: category_id.to_string(),
        max_members: None,
    }
}

/// Create-guild request for an approval-gated guild
pub fn approval_guild_request(category_id: Snowflake) -> CreateGuildRequest {
    CreateGuildRequest {
        join_policy: Some(JoinPolicy::ApprovalRequired),
        ..guild_request(category_id)
    }
}

/// Create-guild request for a PRIVATE guild
pub fn private_guild_request(category_id: Snowflake) -> CreateGuildRequest {
    CreateGuildRequest {
        visibility: Some(GuildVisibility::Private),
        ..guild_request(category_id)
    }
}

/// Join request with a short application note
pub fn join_request(message: &str) -> JoinGuildRequest {
    JoinGuildRequest {
        message: Some(message.to_string()),
    }
}

/// Invitation request addressed to `user_id`
pub fn invite_request(user_id: &str) -> InviteMemberRequest {
    InviteMemberRequest {
        user_id: user_id.to_string(),
        message: Some("Come join us".to_string()),
    }
}

/// Unique user handle
pub fn unique_user(prefix: &str) -> String {
    format!("{prefix}-{}", unique_suffix())
}
