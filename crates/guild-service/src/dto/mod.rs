//! Data transfer objects for service requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for operation inputs
//! - Response DTOs for serializing operation outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    AddExperienceRequest, CreateGuildRequest, DecideRequest, HistoryQueryRequest,
    InviteMemberRequest, JoinGuildRequest, ReplaceLadderRequest, SubtractExperienceRequest,
    UpdateGuildRequest,
};

// Re-export commonly used response types
pub use responses::{
    ApiResponse, ExpHistoryResponse, GuildProgressResponse, GuildResponse, InvitationResponse,
    JoinOutcomeResponse, JoinRequestResponse, LadderLevelResponse, LadderResponse,
    MembershipResponse, PaginatedResponse, PaginationMeta, ProgressionOutcome,
};
