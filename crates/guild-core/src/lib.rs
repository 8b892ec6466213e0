//! # guild-core
//!
//! Domain layer containing entities, value objects, repository traits, and domain events.
//! This crate has zero dependencies on infrastructure (storage, transport, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    default_capacity, default_required_exp, ExpHistory, ExpSource, Guild, GuildInvitation,
    GuildJoinRequest, GuildMembership, GuildRole, GuildVisibility, InvitationStatus, JoinPolicy,
    JoinRequestStatus, LevelConfig, LevelLadder, LevelSpec, MembershipStatus,
};
pub use error::DomainError;
pub use events::GuildEvent;
pub use traits::{
    Category, CategoryDirectory, EventSink, ExpHistoryRepository, GuildRepository, HistoryQuery,
    InvitationRepository, JoinRequestRepository, LadderRepository, MembershipRepository,
    RepoResult,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError, UserId};
