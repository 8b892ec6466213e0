//! Repository implementations
//!
//! In-memory implementations of the ports defined in guild-core. Each
//! repository holds a clone of the shared [`MemoryStore`](crate::MemoryStore)
//! and operates on one collection.

mod category;
mod exp_history;
mod guild;
mod invitation;
mod join_request;
mod ladder;
mod membership;

pub use category::MemoryCategoryDirectory;
pub use exp_history::MemoryExpHistoryRepository;
pub use guild::MemoryGuildRepository;
pub use invitation::MemoryInvitationRepository;
pub use join_request::MemoryJoinRequestRepository;
pub use ladder::MemoryLadderRepository;
pub use membership::MemoryMembershipRepository;
