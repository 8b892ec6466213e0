//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use guild_core::entities::{
    ExpHistory, Guild, GuildInvitation, GuildJoinRequest, GuildMembership, LevelLadder,
};

use super::responses::{
    ExpHistoryResponse, GuildResponse, InvitationResponse, JoinRequestResponse,
    LadderLevelResponse, LadderResponse, MembershipResponse,
};

// ============================================================================
// Guild Mappers
// ============================================================================

impl From<&Guild> for GuildResponse {
    fn from(guild: &Guild) -> Self {
        Self {
            id: guild.id.to_string(),
            name: guild.name.clone(),
            description: guild.description.clone(),
            visibility: guild.visibility,
            join_policy: guild.join_policy,
            master_id: guild.master_id.to_string(),
            category_id: guild.category_id.to_string(),
            max_members: guild.max_members,
            current_level: guild.current_level,
            current_exp: guild.current_exp,
            total_exp: guild.total_exp,
            is_active: guild.is_active,
            created_at: guild.created_at,
            updated_at: guild.updated_at,
        }
    }
}

impl From<Guild> for GuildResponse {
    fn from(guild: Guild) -> Self {
        Self::from(&guild)
    }
}

// ============================================================================
// Membership Mappers
// ============================================================================

impl From<&GuildMembership> for MembershipResponse {
    fn from(membership: &GuildMembership) -> Self {
        Self {
            guild_id: membership.guild_id.to_string(),
            user_id: membership.user_id.to_string(),
            role: membership.role,
            status: membership.status,
            joined_at: membership.joined_at,
            left_at: membership.left_at,
        }
    }
}

impl From<GuildMembership> for MembershipResponse {
    fn from(membership: GuildMembership) -> Self {
        Self::from(&membership)
    }
}

impl From<&GuildJoinRequest> for JoinRequestResponse {
    fn from(request: &GuildJoinRequest) -> Self {
        Self {
            id: request.id.to_string(),
            guild_id: request.guild_id.to_string(),
            user_id: request.user_id.to_string(),
            status: request.status,
            message: request.message.clone(),
            decided_by: request.decided_by.as_ref().map(ToString::to_string),
            decision_reason: request.decision_reason.clone(),
            created_at: request.created_at,
            decided_at: request.decided_at,
            expires_at: request.expires_at,
        }
    }
}

impl From<GuildJoinRequest> for JoinRequestResponse {
    fn from(request: GuildJoinRequest) -> Self {
        Self::from(&request)
    }
}

impl From<&GuildInvitation> for InvitationResponse {
    fn from(invitation: &GuildInvitation) -> Self {
        Self {
            id: invitation.id.to_string(),
            guild_id: invitation.guild_id.to_string(),
            user_id: invitation.user_id.to_string(),
            invited_by: invitation.invited_by.to_string(),
            status: invitation.status,
            message: invitation.message.clone(),
            decided_by: invitation.decided_by.as_ref().map(ToString::to_string),
            decision_reason: invitation.decision_reason.clone(),
            created_at: invitation.created_at,
            decided_at: invitation.decided_at,
            expires_at: invitation.expires_at,
        }
    }
}

impl From<GuildInvitation> for InvitationResponse {
    fn from(invitation: GuildInvitation) -> Self {
        Self::from(&invitation)
    }
}

// ============================================================================
// Progression Mappers
// ============================================================================

impl From<&ExpHistory> for ExpHistoryResponse {
    fn from(entry: &ExpHistory) -> Self {
        Self {
            id: entry.id.to_string(),
            guild_id: entry.guild_id.to_string(),
            exp_delta: entry.exp_delta,
            source: entry.source,
            source_ref: entry.source_ref.clone(),
            contributor_id: entry.contributor_id.as_ref().map(ToString::to_string),
            note: entry.note.clone(),
            level_before: entry.level_before,
            level_after: entry.level_after,
            created_at: entry.created_at,
        }
    }
}

impl From<ExpHistory> for ExpHistoryResponse {
    fn from(entry: ExpHistory) -> Self {
        Self::from(&entry)
    }
}

impl From<&LevelLadder> for LadderResponse {
    fn from(ladder: &LevelLadder) -> Self {
        Self {
            levels: ladder
                .entries()
                .iter()
                .map(|entry| LadderLevelResponse {
                    level: entry.level,
                    required_exp: entry.required_exp,
                    cumulative_exp: entry.cumulative_exp,
                    max_members: entry.max_members,
                })
                .collect(),
            max_level: ladder.max_level(),
        }
    }
}

impl From<LevelLadder> for LadderResponse {
    fn from(ladder: LevelLadder) -> Self {
        Self::from(&ladder)
    }
}
