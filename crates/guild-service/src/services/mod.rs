//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod authority;
pub mod context;
pub mod error;
pub mod guild;
pub mod locks;
pub mod membership;
pub mod progression;

// Re-export all services for convenience
pub use authority::AuthorityService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use guild::GuildService;
pub use locks::EntityLocks;
pub use membership::MembershipService;
pub use progression::ProgressionService;

/// Run a request's validator rules, mapping failures into `ServiceError`
pub(crate) fn validated<T: validator::Validate>(request: T) -> ServiceResult<T> {
    if let Err(errors) = request.validate() {
        return Err(ServiceError::validation(errors.to_string()));
    }
    Ok(request)
}

/// Parse a string-form Snowflake from a request field
pub(crate) fn parse_snowflake(
    value: &str,
    field: &'static str,
) -> ServiceResult<guild_core::Snowflake> {
    value
        .parse()
        .map_err(|_| ServiceError::validation(format!("Invalid {field} format")))
}
