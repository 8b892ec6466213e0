//! # guild-service
//!
//! Application layer for the guild server: membership and progression
//! business logic, request/response DTOs, validation, and per-entity
//! locking. Services are thin stateless facades over a shared
//! [`ServiceContext`]; storage and event delivery stay behind the ports
//! defined in `guild-core`.

pub mod dto;
pub mod services;

pub use services::{
    AuthorityService, EntityLocks, GuildService, MembershipService, ProgressionService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
