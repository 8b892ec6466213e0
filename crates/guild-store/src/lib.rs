//! # guild-store
//!
//! Storage layer implementing the guild-core ports over shared in-memory
//! collections.
//!
//! ## Overview
//!
//! A [`MemoryStore`] owns every collection; the repositories each hold a
//! clone of the handle, the same way pooled connections would share one
//! database. Entities are stored as-is, so there is no model or mapper
//! layer in between.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guild_store::{MemoryGuildRepository, MemoryStore};
//! use guild_core::traits::GuildRepository;
//!
//! let store = MemoryStore::new();
//! let guild_repo = MemoryGuildRepository::new(store.clone());
//! ```

pub mod events;
pub mod repositories;
pub mod store;

// Re-export commonly used types
pub use events::MemoryEventSink;
pub use repositories::{
    MemoryCategoryDirectory, MemoryExpHistoryRepository, MemoryGuildRepository,
    MemoryInvitationRepository, MemoryJoinRequestRepository, MemoryLadderRepository,
    MemoryMembershipRepository,
};
pub use store::MemoryStore;
