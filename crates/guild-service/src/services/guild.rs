//! Guild service
//!
//! Handles guild creation, settings updates, and disbanding.

use guild_core::events::{GuildCreatedEvent, GuildDisbandedEvent};
use guild_core::{DomainError, Guild, GuildEvent, GuildMembership, Snowflake, UserId};
use tracing::{info, instrument, warn};

use crate::dto::{CreateGuildRequest, GuildResponse, UpdateGuildRequest};

use super::authority::AuthorityService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::{parse_snowflake, validated};

/// Guild service
pub struct GuildService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GuildService<'a> {
    /// Create a new GuildService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new guild with the caller as MASTER
    ///
    /// Creating counts as joining: the creator's category exclusivity is
    /// checked the same way an admission would check it.
    #[instrument(skip(self, request))]
    pub async fn create_guild(
        &self,
        master_id: UserId,
        request: CreateGuildRequest,
    ) -> ServiceResult<GuildResponse> {
        let request = validated(request)?;
        let category_id = parse_snowflake(&request.category_id, "category_id")?;

        // Serialize against other admissions of the same user
        let _user_guard = self.ctx.locks().lock_user(&master_id).await;

        let category = self
            .ctx
            .category_directory()
            .get(category_id)
            .await?
            .filter(|category| category.is_active)
            .ok_or(DomainError::CategoryNotFound(category_id))?;

        if self
            .ctx
            .membership_repo()
            .find_active_in_category(&master_id, category_id)
            .await?
            .is_some()
        {
            return Err(DomainError::CategoryExclusivity { category_id }.into());
        }

        let ladder = self.ctx.ladder_repo().load().await?;

        let mut guild = Guild::new(
            self.ctx.generate_id(),
            request.name,
            master_id.clone(),
            category_id,
        );
        guild.override_capacity(ladder.capacity_for(guild.current_level));
        if let Some(visibility) = request.visibility {
            guild.set_visibility(visibility);
        }
        if let Some(policy) = request.join_policy {
            guild.set_join_policy(policy);
        }
        if let Some(description) = request.description {
            guild.set_description(Some(description));
        }
        if let Some(max_members) = request.max_members {
            guild.override_capacity(max_members);
        }

        // Name uniqueness is enforced by the repository under its own guard
        self.ctx.guild_repo().create(&guild).await?;

        let master_row = GuildMembership::new_master(guild.id, master_id.clone());
        self.ctx.membership_repo().create(&master_row).await?;

        info!(
            guild_id = %guild.id,
            master_id = %master_id,
            category = %category.name,
            "Guild created"
        );

        self.publish(GuildCreatedEvent::new(guild.id, master_id, category_id))
            .await;

        Ok(GuildResponse::from(&guild))
    }

    /// Get a guild by ID
    #[instrument(skip(self))]
    pub async fn get_guild(&self, guild_id: Snowflake) -> ServiceResult<GuildResponse> {
        let guild = self
            .ctx
            .guild_repo()
            .find_active_by_id(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;

        Ok(GuildResponse::from(&guild))
    }

    /// Update guild settings (MASTER only)
    #[instrument(skip(self, request))]
    pub async fn update_guild(
        &self,
        guild_id: Snowflake,
        master_id: &UserId,
        request: UpdateGuildRequest,
    ) -> ServiceResult<GuildResponse> {
        let request = validated(request)?;

        let mut guild = self
            .ctx
            .guild_repo()
            .find_active_by_id(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;

        AuthorityService::new(self.ctx)
            .require_master(guild_id, master_id)
            .await?;

        let mut changed = false;

        if let Some(name) = request.name {
            if name != guild.name {
                if self.ctx.guild_repo().name_taken(&name).await? {
                    return Err(DomainError::GuildNameTaken(name).into());
                }
                guild.rename(name);
                changed = true;
            }
        }

        if let Some(description) = request.description {
            // Empty string clears the description
            let description = if description.is_empty() {
                None
            } else {
                Some(description)
            };
            if description != guild.description {
                guild.set_description(description);
                changed = true;
            }
        }

        if let Some(visibility) = request.visibility {
            if visibility != guild.visibility {
                guild.set_visibility(visibility);
                changed = true;
            }
        }

        if let Some(policy) = request.join_policy {
            if policy != guild.join_policy {
                guild.set_join_policy(policy);
                changed = true;
            }
        }

        if let Some(max_members) = request.max_members {
            if max_members != guild.max_members {
                guild.override_capacity(max_members);
                changed = true;
            }
        }

        if changed {
            self.ctx.guild_repo().update(&guild).await?;
            info!(guild_id = %guild_id, "Guild settings updated");
        }

        Ok(GuildResponse::from(&guild))
    }

    /// Disband a guild (MASTER only)
    ///
    /// Soft delete: membership rows stay behind and every live query
    /// excludes them through the guild's active flag, so category slots
    /// free up immediately.
    #[instrument(skip(self))]
    pub async fn disband_guild(&self, guild_id: Snowflake, master_id: &UserId) -> ServiceResult<()> {
        // Hold the guild lock so no admission lands in a disbanding guild
        let _guild_guard = self.ctx.locks().lock_guild(guild_id).await;

        let mut guild = self
            .ctx
            .guild_repo()
            .find_active_by_id(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;

        AuthorityService::new(self.ctx)
            .require_master(guild_id, master_id)
            .await?;

        guild.deactivate();
        self.ctx.guild_repo().update(&guild).await?;

        info!(guild_id = %guild_id, master_id = %master_id, "Guild disbanded");

        self.publish(GuildDisbandedEvent::new(guild_id)).await;

        Ok(())
    }

    async fn publish(&self, event: GuildEvent) {
        if let Err(error) = self.ctx.event_sink().emit(event).await {
            warn!(%error, "event emission failed");
        }
    }
}
