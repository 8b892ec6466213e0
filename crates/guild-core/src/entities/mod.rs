//! Domain entities - core business objects

mod exp_history;
mod guild;
mod invitation;
mod join_request;
mod level_ladder;
mod membership;

pub use exp_history::{ExpHistory, ExpSource};
pub use guild::{Guild, GuildVisibility, JoinPolicy};
pub use invitation::{GuildInvitation, InvitationStatus};
pub use join_request::{GuildJoinRequest, JoinRequestStatus};
pub use level_ladder::{
    default_capacity, default_required_exp, LevelConfig, LevelLadder, LevelSpec, BASE_CAPACITY,
    BASE_REQUIRED_EXP, CAPACITY_STEP, REQUIRED_EXP_STEP,
};
pub use membership::{GuildMembership, GuildRole, MembershipStatus};
