//! Progression service
//!
//! Experience accounting, level recomputation, capacity scaling, and the
//! append-only experience ledger. All writes serialize on the guild lock;
//! the membership engine reads capacity through here so admissions always
//! see the post-level-change value.

use guild_core::events::LevelChangedEvent;
use guild_core::{
    DomainError, ExpHistory, Guild, GuildEvent, HistoryQuery, LevelLadder, Snowflake, UserId,
};
use tracing::{info, instrument, warn};

use crate::dto::{
    AddExperienceRequest, ExpHistoryResponse, GuildProgressResponse, HistoryQueryRequest,
    LadderResponse, PaginatedResponse, ProgressionOutcome, ReplaceLadderRequest,
    SubtractExperienceRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::{parse_snowflake, validated};

/// Default ledger page size
const DEFAULT_HISTORY_LIMIT: i64 = 50;
/// Largest ledger page a caller may request
const MAX_HISTORY_LIMIT: i64 = 100;

/// Progression service
pub struct ProgressionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProgressionService<'a> {
    /// Create a new ProgressionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Experience writes
    // ========================================================================

    /// Add experience to a guild
    ///
    /// Carries the guild over as many level thresholds as the amount covers
    /// in one call. At the ladder cap the excess keeps accumulating in
    /// `current_exp` with no further threshold checks.
    #[instrument(skip(self, request))]
    pub async fn add_experience(
        &self,
        guild_id: Snowflake,
        request: AddExperienceRequest,
    ) -> ServiceResult<ProgressionOutcome> {
        let request = validated(request)?;
        if request.amount < 1 {
            return Err(DomainError::InvalidExpAmount(request.amount).into());
        }

        let _guild_guard = self.ctx.locks().lock_guild(guild_id).await;

        let mut guild = self
            .ctx
            .guild_repo()
            .find_active_by_id(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;
        Self::check_integrity(&guild)?;

        let ladder = self.ctx.ladder_repo().load().await?;
        let level_before = guild.current_level;

        guild.current_exp = guild.current_exp.saturating_add(request.amount);
        guild.total_exp = guild.total_exp.saturating_add(request.amount);

        while !ladder.is_max_level(guild.current_level)
            && guild.current_exp >= ladder.required_exp(guild.current_level)
        {
            guild.current_exp -= ladder.required_exp(guild.current_level);
            guild.current_level += 1;
        }

        if guild.current_level != level_before {
            guild.max_members = ladder.capacity_for(guild.current_level);
        }
        guild.touch();

        self.ctx.guild_repo().update(&guild).await?;

        let mut entry = ExpHistory::new(
            self.ctx.generate_id(),
            guild_id,
            request.amount,
            request.source,
            level_before,
            guild.current_level,
        );
        entry.source_ref = request.source_ref;
        entry.contributor_id = request.contributor_id.map(UserId::from);
        entry.note = request.note;
        self.ctx.exp_history_repo().append(&entry).await?;

        info!(
            guild_id = %guild_id,
            amount = request.amount,
            level_before,
            level_after = guild.current_level,
            "Experience added"
        );

        if guild.current_level != level_before {
            self.publish(LevelChangedEvent::new(
                guild_id,
                level_before,
                guild.current_level,
                guild.max_members,
            ))
            .await;
        }

        Ok(Self::outcome(&guild, level_before))
    }

    /// Remove experience from a guild
    ///
    /// Compensation path for erroneous grants. The lifetime total floors at
    /// zero; when the removal undercuts the current level the position is
    /// recomputed from the total. Members above a shrunken capacity are not
    /// evicted; the guild just cannot admit until it is back under.
    #[instrument(skip(self, request))]
    pub async fn subtract_experience(
        &self,
        guild_id: Snowflake,
        request: SubtractExperienceRequest,
    ) -> ServiceResult<ProgressionOutcome> {
        let request = validated(request)?;
        if request.amount < 1 {
            return Err(DomainError::InvalidExpAmount(request.amount).into());
        }

        let _guild_guard = self.ctx.locks().lock_guild(guild_id).await;

        let mut guild = self
            .ctx
            .guild_repo()
            .find_active_by_id(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;
        Self::check_integrity(&guild)?;

        let ladder = self.ctx.ladder_repo().load().await?;
        let level_before = guild.current_level;

        guild.total_exp = (guild.total_exp - request.amount).max(0);

        if guild.current_exp - request.amount >= 0 {
            // Still inside the same level
            guild.current_exp -= request.amount;
        } else {
            let (level, current_exp) = ladder.level_for_total_exp(guild.total_exp);
            guild.current_level = level.max(1);
            guild.current_exp = current_exp.max(0);
            if guild.current_level < level_before {
                guild.max_members = ladder.capacity_for(guild.current_level);
            }
        }
        guild.touch();

        self.ctx.guild_repo().update(&guild).await?;

        // The ledger records the requested amount, negated
        let mut entry = ExpHistory::new(
            self.ctx.generate_id(),
            guild_id,
            -request.amount,
            request.source,
            level_before,
            guild.current_level,
        );
        entry.source_ref = request.source_ref;
        entry.note = request.note;
        self.ctx.exp_history_repo().append(&entry).await?;

        info!(
            guild_id = %guild_id,
            amount = request.amount,
            level_before,
            level_after = guild.current_level,
            "Experience removed"
        );

        if guild.current_level != level_before {
            self.publish(LevelChangedEvent::new(
                guild_id,
                level_before,
                guild.current_level,
                guild.max_members,
            ))
            .await;
        }

        Ok(Self::outcome(&guild, level_before))
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Progression snapshot: level, exps, capacity, and head count
    #[instrument(skip(self))]
    pub async fn get_progress(&self, guild_id: Snowflake) -> ServiceResult<GuildProgressResponse> {
        let guild = self
            .ctx
            .guild_repo()
            .find_active_by_id(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;

        let ladder = self.ctx.ladder_repo().load().await?;
        let member_count = self.ctx.membership_repo().count_active(guild_id).await?;

        let exp_to_next_level = if ladder.is_max_level(guild.current_level) {
            None
        } else {
            Some((ladder.required_exp(guild.current_level) - guild.current_exp).max(0))
        };

        Ok(GuildProgressResponse {
            guild_id: guild_id.to_string(),
            level: guild.current_level,
            current_exp: guild.current_exp,
            total_exp: guild.total_exp,
            exp_to_next_level,
            max_members: guild.max_members,
            member_count,
        })
    }

    /// Page through the experience ledger, newest first
    #[instrument(skip(self, query))]
    pub async fn history(
        &self,
        guild_id: Snowflake,
        query: HistoryQueryRequest,
    ) -> ServiceResult<PaginatedResponse<ExpHistoryResponse>> {
        // Ledger reads follow the same soft-delete visibility as everything else
        self.ctx
            .guild_repo()
            .find_active_by_id(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;

        let before = match query.before.as_deref() {
            Some(raw) => Some(parse_snowflake(raw, "before")?),
            None => None,
        };
        let limit = query
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);

        // Fetch one extra row to learn whether another page exists
        let mut entries = self
            .ctx
            .exp_history_repo()
            .list_by_guild(
                guild_id,
                HistoryQuery {
                    before,
                    limit: limit + 1,
                },
            )
            .await?;

        let has_more = entries.len() as i64 > limit;
        entries.truncate(limit as usize);

        let next_cursor = if has_more {
            entries.last().map(|entry| entry.id.to_string())
        } else {
            None
        };
        let data = entries.iter().map(ExpHistoryResponse::from).collect();

        Ok(PaginatedResponse::new(data, next_cursor, has_more, limit))
    }

    /// The live capacity contract consumed by admission checks
    ///
    /// Always the active guild row's `max_members`; never cached across an
    /// await point that leaves the guild lock.
    #[instrument(skip(self))]
    pub async fn current_capacity(&self, guild_id: Snowflake) -> ServiceResult<i32> {
        let guild = self
            .ctx
            .guild_repo()
            .find_active_by_id(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;

        Ok(guild.max_members)
    }

    // ========================================================================
    // Ladder administration
    // ========================================================================

    /// The platform level ladder
    #[instrument(skip(self))]
    pub async fn get_ladder(&self) -> ServiceResult<LadderResponse> {
        let ladder = self.ctx.ladder_repo().load().await?;
        Ok(LadderResponse::from(ladder))
    }

    /// Replace the platform level ladder
    ///
    /// Existing guilds are not recomputed retroactively; each converges on
    /// its next progression write.
    #[instrument(skip(self, request))]
    pub async fn replace_ladder(
        &self,
        request: ReplaceLadderRequest,
    ) -> ServiceResult<LadderResponse> {
        let ladder = LevelLadder::new(request.levels, request.max_level)?;
        self.ctx.ladder_repo().replace(&ladder).await?;

        info!(
            configured_levels = ladder.entries().len(),
            "Level ladder replaced"
        );

        Ok(LadderResponse::from(ladder))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Refuse to compound on top of corrupt persisted state
    fn check_integrity(guild: &Guild) -> ServiceResult<()> {
        if guild.current_level < 1 || guild.current_exp < 0 || guild.total_exp < 0 {
            return Err(DomainError::CorruptProgressState(format!(
                "guild {} has level {}, current_exp {}, total_exp {}",
                guild.id, guild.current_level, guild.current_exp, guild.total_exp
            ))
            .into());
        }
        Ok(())
    }

    fn outcome(guild: &Guild, level_before: i32) -> ProgressionOutcome {
        ProgressionOutcome {
            guild_id: guild.id.to_string(),
            level_before,
            level_after: guild.current_level,
            current_exp: guild.current_exp,
            total_exp: guild.total_exp,
            max_members: guild.max_members,
            leveled: guild.current_level != level_before,
        }
    }

    async fn publish(&self, event: GuildEvent) {
        if let Err(error) = self.ctx.event_sink().emit(event).await {
            warn!(%error, "event emission failed");
        }
    }
}
