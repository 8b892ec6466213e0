//! Domain events

mod domain_event;

pub use domain_event::{
    GuildCreatedEvent, GuildDisbandedEvent, GuildEvent, InvitationIssuedEvent,
    JoinRequestDecidedEvent, LevelChangedEvent, MasterTransferredEvent, MemberJoinedEvent,
    MemberKickedEvent, MemberLeftEvent, MemberRoleChangedEvent,
};
