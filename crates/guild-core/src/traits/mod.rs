//! Ports - interfaces the domain expects infrastructure to provide

mod category;
mod events;
mod repositories;

pub use category::{Category, CategoryDirectory};
pub use events::EventSink;
pub use repositories::{
    ExpHistoryRepository, GuildRepository, HistoryQuery, InvitationRepository,
    JoinRequestRepository, LadderRepository, MembershipRepository, RepoResult,
};
