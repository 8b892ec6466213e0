//! Service context - dependency container for services
//!
//! Holds the repository ports, event sink, and other dependencies needed by
//! services.

use std::sync::Arc;

use guild_common::PendingConfig;
use guild_core::traits::{
    CategoryDirectory, EventSink, ExpHistoryRepository, GuildRepository, InvitationRepository,
    JoinRequestRepository, LadderRepository, MembershipRepository,
};
use guild_core::SnowflakeGenerator;

use super::locks::EntityLocks;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repository ports (storage is behind trait objects)
/// - The category directory
/// - The domain event sink
/// - Snowflake generator for ID generation
/// - Per-entity locks and pending-record TTL policy
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    guild_repo: Arc<dyn GuildRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    join_request_repo: Arc<dyn JoinRequestRepository>,
    invitation_repo: Arc<dyn InvitationRepository>,
    ladder_repo: Arc<dyn LadderRepository>,
    exp_history_repo: Arc<dyn ExpHistoryRepository>,

    // External directories
    category_directory: Arc<dyn CategoryDirectory>,

    // Events
    event_sink: Arc<dyn EventSink>,

    // Services
    snowflake_generator: Arc<SnowflakeGenerator>,

    // Policy and coordination
    pending: PendingConfig,
    locks: Arc<EntityLocks>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        guild_repo: Arc<dyn GuildRepository>,
        membership_repo: Arc<dyn MembershipRepository>,
        join_request_repo: Arc<dyn JoinRequestRepository>,
        invitation_repo: Arc<dyn InvitationRepository>,
        ladder_repo: Arc<dyn LadderRepository>,
        exp_history_repo: Arc<dyn ExpHistoryRepository>,
        category_directory: Arc<dyn CategoryDirectory>,
        event_sink: Arc<dyn EventSink>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        pending: PendingConfig,
    ) -> Self {
        Self {
            guild_repo,
            membership_repo,
            join_request_repo,
            invitation_repo,
            ladder_repo,
            exp_history_repo,
            category_directory,
            event_sink,
            snowflake_generator,
            pending,
            locks: Arc::new(EntityLocks::new()),
        }
    }

    // === Repositories ===

    /// Get the guild repository
    pub fn guild_repo(&self) -> &dyn GuildRepository {
        self.guild_repo.as_ref()
    }

    /// Get the membership repository
    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    /// Get the join request repository
    pub fn join_request_repo(&self) -> &dyn JoinRequestRepository {
        self.join_request_repo.as_ref()
    }

    /// Get the invitation repository
    pub fn invitation_repo(&self) -> &dyn InvitationRepository {
        self.invitation_repo.as_ref()
    }

    /// Get the level ladder repository
    pub fn ladder_repo(&self) -> &dyn LadderRepository {
        self.ladder_repo.as_ref()
    }

    /// Get the experience history repository
    pub fn exp_history_repo(&self) -> &dyn ExpHistoryRepository {
        self.exp_history_repo.as_ref()
    }

    // === Directories ===

    /// Get the category directory
    pub fn category_directory(&self) -> &dyn CategoryDirectory {
        self.category_directory.as_ref()
    }

    // === Events ===

    /// Get the domain event sink
    pub fn event_sink(&self) -> &dyn EventSink {
        self.event_sink.as_ref()
    }

    // === Services ===

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> guild_core::Snowflake {
        self.snowflake_generator.generate()
    }

    // === Policy ===

    /// Get the pending-record TTL configuration
    pub fn pending(&self) -> &PendingConfig {
        &self.pending
    }

    /// Get the per-entity lock registry
    pub fn locks(&self) -> &EntityLocks {
        self.locks.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("event_sink", &"...")
            .field("pending", &self.pending)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    guild_repo: Option<Arc<dyn GuildRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    join_request_repo: Option<Arc<dyn JoinRequestRepository>>,
    invitation_repo: Option<Arc<dyn InvitationRepository>>,
    ladder_repo: Option<Arc<dyn LadderRepository>>,
    exp_history_repo: Option<Arc<dyn ExpHistoryRepository>>,
    category_directory: Option<Arc<dyn CategoryDirectory>>,
    event_sink: Option<Arc<dyn EventSink>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    pending: PendingConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            guild_repo: None,
            membership_repo: None,
            join_request_repo: None,
            invitation_repo: None,
            ladder_repo: None,
            exp_history_repo: None,
            category_directory: None,
            event_sink: None,
            snowflake_generator: None,
            pending: PendingConfig::default(),
        }
    }

    pub fn guild_repo(mut self, repo: Arc<dyn GuildRepository>) -> Self {
        self.guild_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn join_request_repo(mut self, repo: Arc<dyn JoinRequestRepository>) -> Self {
        self.join_request_repo = Some(repo);
        self
    }

    pub fn invitation_repo(mut self, repo: Arc<dyn InvitationRepository>) -> Self {
        self.invitation_repo = Some(repo);
        self
    }

    pub fn ladder_repo(mut self, repo: Arc<dyn LadderRepository>) -> Self {
        self.ladder_repo = Some(repo);
        self
    }

    pub fn exp_history_repo(mut self, repo: Arc<dyn ExpHistoryRepository>) -> Self {
        self.exp_history_repo = Some(repo);
        self
    }

    pub fn category_directory(mut self, directory: Arc<dyn CategoryDirectory>) -> Self {
        self.category_directory = Some(directory);
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn pending(mut self, pending: PendingConfig) -> Self {
        self.pending = pending;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.guild_repo
                .ok_or_else(|| super::error::ServiceError::validation("guild_repo is required"))?,
            self.membership_repo.ok_or_else(|| {
                super::error::ServiceError::validation("membership_repo is required")
            })?,
            self.join_request_repo.ok_or_else(|| {
                super::error::ServiceError::validation("join_request_repo is required")
            })?,
            self.invitation_repo.ok_or_else(|| {
                super::error::ServiceError::validation("invitation_repo is required")
            })?,
            self.ladder_repo
                .ok_or_else(|| super::error::ServiceError::validation("ladder_repo is required"))?,
            self.exp_history_repo.ok_or_else(|| {
                super::error::ServiceError::validation("exp_history_repo is required")
            })?,
            self.category_directory.ok_or_else(|| {
                super::error::ServiceError::validation("category_directory is required")
            })?,
            self.event_sink
                .ok_or_else(|| super::error::ServiceError::validation("event_sink is required"))?,
            self.snowflake_generator.ok_or_else(|| {
                super::error::ServiceError::validation("snowflake_generator is required")
            })?,
            self.pending,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
