//! Authority service
//!
//! Resolves what a user is allowed to do inside a guild from their active
//! membership row. Role checks always read current state; there is no
//! cached permission set to invalidate.

use guild_core::{DomainError, GuildMembership, GuildRole, Snowflake, UserId};
use tracing::instrument;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Authority service for role-based access control
pub struct AuthorityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthorityService<'a> {
    /// Create a new AuthorityService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get a user's active membership in a guild
    #[instrument(skip(self))]
    pub async fn active_membership(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> ServiceResult<GuildMembership> {
        let membership = self
            .ctx
            .membership_repo()
            .find_active(guild_id, user_id)
            .await?
            .ok_or(DomainError::MembershipNotFound)?;
        Ok(membership)
    }

    /// Require an active MASTER or SUB_MASTER seat, returning the acting row
    ///
    /// Non-members fail the same way under-ranked members do; the caller
    /// learns nothing about who belongs to the guild.
    #[instrument(skip(self))]
    pub async fn require_officer(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> ServiceResult<GuildMembership> {
        let membership = self
            .ctx
            .membership_repo()
            .find_active(guild_id, user_id)
            .await?;
        match membership {
            Some(row) if row.is_officer() => Ok(row),
            _ => Err(DomainError::NotOfficer.into()),
        }
    }

    /// Require the active MASTER seat, returning the acting row
    #[instrument(skip(self))]
    pub async fn require_master(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> ServiceResult<GuildMembership> {
        let membership = self
            .ctx
            .membership_repo()
            .find_active(guild_id, user_id)
            .await?;
        match membership {
            Some(row) if row.role == GuildRole::Master => Ok(row),
            _ => Err(DomainError::NotMaster.into()),
        }
    }
}
