//! Membership service
//!
//! Admission pipeline, invitation and join-request queues, departures, and
//! role management. Every path that can create an ACTIVE membership funnels
//! through the same check/commit pair so the capacity and category rules
//! hold no matter how a user gets in.

use chrono::Utc;
use guild_core::events::{
    InvitationIssuedEvent, JoinRequestDecidedEvent, MasterTransferredEvent, MemberJoinedEvent,
    MemberKickedEvent, MemberLeftEvent, MemberRoleChangedEvent,
};
use guild_core::{
    DomainError, Guild, GuildEvent, GuildInvitation, GuildJoinRequest, GuildMembership, GuildRole,
    GuildVisibility, JoinPolicy, Snowflake, UserId,
};
use tracing::{info, instrument, warn};

use crate::dto::{
    DecideRequest, InvitationResponse, InviteMemberRequest, JoinGuildRequest, JoinOutcomeResponse,
    JoinRequestResponse, MembershipResponse,
};

use super::authority::AuthorityService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::progression::ProgressionService;
use super::validated;

/// Membership service
pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    /// Create a new MembershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Joining
    // ========================================================================

    /// Ask to join a guild
    ///
    /// PUBLIC + OPEN admits immediately; PUBLIC + APPROVAL_REQUIRED queues a
    /// pending request; PRIVATE guilds turn every self-serve join away.
    #[instrument(skip(self, request))]
    pub async fn request_join(
        &self,
        guild_id: Snowflake,
        user_id: UserId,
        request: JoinGuildRequest,
    ) -> ServiceResult<JoinOutcomeResponse> {
        let request = validated(request)?;

        let (_user_guard, _guild_guard) = self.ctx.locks().lock_admission(&user_id, guild_id).await;

        let guild = self.check_admission(guild_id, &user_id).await?;

        // Invitations are the only way into a PRIVATE guild
        if guild.visibility == GuildVisibility::Private {
            return Err(DomainError::PrivateGuild.into());
        }

        match guild.join_policy {
            JoinPolicy::Open => {
                let membership = self.commit_admission(guild_id, &user_id).await?;
                // A queue entry left over from an APPROVAL_REQUIRED era is moot now
                self.retire_moot_request(guild_id, &user_id, &user_id).await?;
                self.retire_moot_invitation(guild_id, &user_id, &user_id)
                    .await?;

                info!(guild_id = %guild_id, user_id = %user_id, "Member joined via open admission");

                self.publish(MemberJoinedEvent::new(guild_id, user_id))
                    .await;

                Ok(JoinOutcomeResponse::Joined {
                    membership: MembershipResponse::from(membership),
                })
            }
            JoinPolicy::ApprovalRequired => {
                if let Some(existing) = self
                    .ctx
                    .join_request_repo()
                    .find_pending(guild_id, &user_id)
                    .await?
                {
                    if existing.is_actionable() {
                        return Err(DomainError::RequestAlreadyPending.into());
                    }
                    // An expired row stays PENDING forever; a fresh request
                    // simply supersedes it
                }

                let expires_at = self
                    .ctx
                    .pending()
                    .join_request_ttl()
                    .map(|ttl| Utc::now() + ttl);
                let join_request = GuildJoinRequest::new(
                    self.ctx.generate_id(),
                    guild_id,
                    user_id.clone(),
                    request.message,
                    expires_at,
                );
                self.ctx.join_request_repo().create(&join_request).await?;

                info!(
                    guild_id = %guild_id,
                    user_id = %user_id,
                    request_id = %join_request.id,
                    "Join request queued"
                );

                Ok(JoinOutcomeResponse::Pending {
                    request: JoinRequestResponse::from(join_request),
                })
            }
        }
    }

    // ========================================================================
    // Invitations
    // ========================================================================

    /// Invite a user into the guild (officer only)
    ///
    /// Visibility is deliberately not consulted: inviting into a PRIVATE
    /// guild is the point of invitations.
    #[instrument(skip(self, request))]
    pub async fn invite(
        &self,
        guild_id: Snowflake,
        operator_id: &UserId,
        request: InviteMemberRequest,
    ) -> ServiceResult<InvitationResponse> {
        let request = validated(request)?;
        let target = UserId::from(request.user_id);

        AuthorityService::new(self.ctx)
            .require_officer(guild_id, operator_id)
            .await?;

        // Serialize with other invitations and admissions of the target
        let _target_guard = self.ctx.locks().lock_user(&target).await;

        // Fail-fast screen; the binding run happens again at accept time
        self.check_admission(guild_id, &target).await?;

        if let Some(existing) = self
            .ctx
            .invitation_repo()
            .find_pending(guild_id, &target)
            .await?
        {
            if existing.is_actionable() {
                return Err(DomainError::InvitationAlreadyPending.into());
            }
        }

        let expires_at = self
            .ctx
            .pending()
            .invitation_ttl()
            .map(|ttl| Utc::now() + ttl);
        let invitation = GuildInvitation::new(
            self.ctx.generate_id(),
            guild_id,
            target.clone(),
            operator_id.clone(),
            request.message,
            expires_at,
        );
        self.ctx.invitation_repo().create(&invitation).await?;

        info!(
            guild_id = %guild_id,
            invitation_id = %invitation.id,
            user_id = %target,
            invited_by = %operator_id,
            "Invitation issued"
        );

        self.publish(InvitationIssuedEvent::new(
            guild_id,
            invitation.id,
            target,
            operator_id.clone(),
        ))
        .await;

        Ok(InvitationResponse::from(invitation))
    }

    /// Accept an invitation addressed to the caller
    ///
    /// An invitation is the approval: the join policy is not re-checked, so
    /// APPROVAL_REQUIRED guilds admit directly. The admission rules do run
    /// again, binding this time.
    #[instrument(skip(self))]
    pub async fn accept_invitation(
        &self,
        invitation_id: Snowflake,
        user_id: UserId,
    ) -> ServiceResult<MembershipResponse> {
        // First fetch only locates the guild; the checks run on a fresh row
        // once the locks are held
        let stub = self
            .ctx
            .invitation_repo()
            .find_by_id(invitation_id)
            .await?
            .ok_or(DomainError::InvitationNotFound(invitation_id))?;

        let (_user_guard, _guild_guard) = self
            .ctx
            .locks()
            .lock_admission(&user_id, stub.guild_id)
            .await;

        let mut invitation = self
            .ctx
            .invitation_repo()
            .find_by_id(invitation_id)
            .await?
            .ok_or(DomainError::InvitationNotFound(invitation_id))?;

        if !invitation.is_for(&user_id) {
            return Err(DomainError::InvitationNotAddressed.into());
        }
        if !invitation.is_pending() {
            return Err(DomainError::AlreadyDecided.into());
        }
        if invitation.is_expired() {
            // The row keeps its PENDING status; listings hide it
            return Err(DomainError::PendingExpired.into());
        }

        let guild_id = invitation.guild_id;
        self.check_admission(guild_id, &user_id).await?;

        let membership = self.commit_admission(guild_id, &user_id).await?;

        invitation.accept();
        self.ctx.invitation_repo().update(&invitation).await?;

        // A pending join request for the same guild is moot now
        self.retire_moot_request(guild_id, &user_id, &user_id).await?;

        info!(
            guild_id = %guild_id,
            invitation_id = %invitation_id,
            user_id = %user_id,
            "Invitation accepted"
        );

        self.publish(MemberJoinedEvent::new(guild_id, user_id)).await;

        Ok(MembershipResponse::from(membership))
    }

    /// Decline an invitation addressed to the caller
    ///
    /// Allowed even when the invitation has expired; it just records the
    /// outcome.
    #[instrument(skip(self))]
    pub async fn decline_invitation(
        &self,
        invitation_id: Snowflake,
        user_id: &UserId,
    ) -> ServiceResult<InvitationResponse> {
        let _user_guard = self.ctx.locks().lock_user(user_id).await;

        let mut invitation = self
            .ctx
            .invitation_repo()
            .find_by_id(invitation_id)
            .await?
            .ok_or(DomainError::InvitationNotFound(invitation_id))?;

        if !invitation.is_for(user_id) {
            return Err(DomainError::InvitationNotAddressed.into());
        }
        if !invitation.is_pending() {
            return Err(DomainError::AlreadyDecided.into());
        }

        invitation.decline();
        self.ctx.invitation_repo().update(&invitation).await?;

        info!(
            guild_id = %invitation.guild_id,
            invitation_id = %invitation_id,
            user_id = %user_id,
            "Invitation declined"
        );

        Ok(InvitationResponse::from(invitation))
    }

    /// Withdraw a pending invitation (officer only)
    #[instrument(skip(self, request))]
    pub async fn cancel_invitation(
        &self,
        invitation_id: Snowflake,
        operator_id: &UserId,
        request: DecideRequest,
    ) -> ServiceResult<InvitationResponse> {
        let request = validated(request)?;

        let stub = self
            .ctx
            .invitation_repo()
            .find_by_id(invitation_id)
            .await?
            .ok_or(DomainError::InvitationNotFound(invitation_id))?;

        AuthorityService::new(self.ctx)
            .require_officer(stub.guild_id, operator_id)
            .await?;

        // Hold the invitee's lock so a concurrent accept cannot interleave
        let _user_guard = self.ctx.locks().lock_user(&stub.user_id).await;

        let mut invitation = self
            .ctx
            .invitation_repo()
            .find_by_id(invitation_id)
            .await?
            .ok_or(DomainError::InvitationNotFound(invitation_id))?;

        if !invitation.is_pending() {
            return Err(DomainError::AlreadyDecided.into());
        }

        invitation.cancel(operator_id.clone(), request.reason);
        self.ctx.invitation_repo().update(&invitation).await?;

        info!(
            guild_id = %invitation.guild_id,
            invitation_id = %invitation_id,
            cancelled_by = %operator_id,
            "Invitation cancelled"
        );

        Ok(InvitationResponse::from(invitation))
    }

    // ========================================================================
    // Join-request decisions
    // ========================================================================

    /// Approve a pending join request (officer only)
    ///
    /// The admission rules run again at decision time. A category conflict
    /// acquired while the request waited commits the request REJECTED before
    /// the error surfaces, so the queue is not wedged by a moot entry. A
    /// full guild leaves the request PENDING; it may succeed later.
    #[instrument(skip(self))]
    pub async fn approve_join_request(
        &self,
        request_id: Snowflake,
        operator_id: &UserId,
    ) -> ServiceResult<MembershipResponse> {
        let stub = self
            .ctx
            .join_request_repo()
            .find_by_id(request_id)
            .await?
            .ok_or(DomainError::JoinRequestNotFound(request_id))?;
        let guild_id = stub.guild_id;

        AuthorityService::new(self.ctx)
            .require_officer(guild_id, operator_id)
            .await?;

        let (_user_guard, _guild_guard) = self
            .ctx
            .locks()
            .lock_admission(&stub.user_id, guild_id)
            .await;

        let mut request = self
            .ctx
            .join_request_repo()
            .find_by_id(request_id)
            .await?
            .ok_or(DomainError::JoinRequestNotFound(request_id))?;

        if !request.is_pending() {
            return Err(DomainError::AlreadyDecided.into());
        }
        if request.is_expired() {
            return Err(DomainError::PendingExpired.into());
        }

        let applicant = request.user_id.clone();

        if let Err(error) = self.check_admission(guild_id, &applicant).await {
            if matches!(
                error.as_domain(),
                Some(DomainError::CategoryExclusivity { .. })
            ) {
                // The applicant joined a same-category guild while waiting;
                // the request can never succeed, so close it out
                request.reject(
                    operator_id.clone(),
                    Some("applicant already belongs to a guild in this category".to_string()),
                );
                self.ctx.join_request_repo().update(&request).await?;

                info!(
                    guild_id = %guild_id,
                    request_id = %request_id,
                    user_id = %applicant,
                    "Join request auto-rejected on category conflict"
                );

                self.publish(JoinRequestDecidedEvent::new(
                    guild_id,
                    request.id,
                    applicant,
                    request.status,
                    operator_id.clone(),
                ))
                .await;
            }
            return Err(error);
        }

        let membership = self.commit_admission(guild_id, &applicant).await?;

        request.approve(operator_id.clone());
        self.ctx.join_request_repo().update(&request).await?;

        // A pending invitation for the same pair is moot now
        self.retire_moot_invitation(guild_id, &applicant, operator_id)
            .await?;

        info!(
            guild_id = %guild_id,
            request_id = %request_id,
            user_id = %applicant,
            approved_by = %operator_id,
            "Join request approved"
        );

        self.publish(MemberJoinedEvent::new(guild_id, applicant.clone()))
            .await;
        self.publish(JoinRequestDecidedEvent::new(
            guild_id,
            request.id,
            applicant,
            request.status,
            operator_id.clone(),
        ))
        .await;

        Ok(MembershipResponse::from(membership))
    }

    /// Reject a pending join request (officer only)
    ///
    /// Works on expired rows too; rejection is how stale entries get a
    /// terminal status.
    #[instrument(skip(self, request))]
    pub async fn reject_join_request(
        &self,
        request_id: Snowflake,
        operator_id: &UserId,
        request: DecideRequest,
    ) -> ServiceResult<JoinRequestResponse> {
        let request = validated(request)?;

        let stub = self
            .ctx
            .join_request_repo()
            .find_by_id(request_id)
            .await?
            .ok_or(DomainError::JoinRequestNotFound(request_id))?;

        AuthorityService::new(self.ctx)
            .require_officer(stub.guild_id, operator_id)
            .await?;

        let _user_guard = self.ctx.locks().lock_user(&stub.user_id).await;

        let mut join_request = self
            .ctx
            .join_request_repo()
            .find_by_id(request_id)
            .await?
            .ok_or(DomainError::JoinRequestNotFound(request_id))?;

        if !join_request.is_pending() {
            return Err(DomainError::AlreadyDecided.into());
        }

        join_request.reject(operator_id.clone(), request.reason);
        self.ctx.join_request_repo().update(&join_request).await?;

        info!(
            guild_id = %join_request.guild_id,
            request_id = %request_id,
            rejected_by = %operator_id,
            "Join request rejected"
        );

        self.publish(JoinRequestDecidedEvent::new(
            join_request.guild_id,
            join_request.id,
            join_request.user_id.clone(),
            join_request.status,
            operator_id.clone(),
        ))
        .await;

        Ok(JoinRequestResponse::from(join_request))
    }

    /// Withdraw the caller's own pending join request
    #[instrument(skip(self))]
    pub async fn cancel_join_request(
        &self,
        request_id: Snowflake,
        user_id: &UserId,
    ) -> ServiceResult<JoinRequestResponse> {
        let _user_guard = self.ctx.locks().lock_user(user_id).await;

        let mut request = self
            .ctx
            .join_request_repo()
            .find_by_id(request_id)
            .await?
            .ok_or(DomainError::JoinRequestNotFound(request_id))?;

        // Someone else's request is indistinguishable from a missing one
        if request.user_id != *user_id {
            return Err(DomainError::JoinRequestNotFound(request_id).into());
        }
        if !request.is_pending() {
            return Err(DomainError::AlreadyDecided.into());
        }

        request.cancel(user_id.clone(), None);
        self.ctx.join_request_repo().update(&request).await?;

        info!(
            guild_id = %request.guild_id,
            request_id = %request_id,
            user_id = %user_id,
            "Join request withdrawn"
        );

        self.publish(JoinRequestDecidedEvent::new(
            request.guild_id,
            request.id,
            request.user_id.clone(),
            request.status,
            user_id.clone(),
        ))
        .await;

        Ok(JoinRequestResponse::from(request))
    }

    // ========================================================================
    // Departure
    // ========================================================================

    /// Leave a guild voluntarily
    ///
    /// The MASTER can never leave; transfer the seat first.
    #[instrument(skip(self))]
    pub async fn leave(&self, guild_id: Snowflake, user_id: &UserId) -> ServiceResult<()> {
        let (_user_guard, _guild_guard) = self.ctx.locks().lock_admission(user_id, guild_id).await;

        self.require_live_guild(guild_id).await?;

        let mut membership = AuthorityService::new(self.ctx)
            .active_membership(guild_id, user_id)
            .await?;

        if membership.role == GuildRole::Master {
            return Err(DomainError::MasterCannotLeave.into());
        }

        membership.mark_left();
        self.ctx.membership_repo().update(&membership).await?;

        info!(guild_id = %guild_id, user_id = %user_id, "Member left");

        self.publish(MemberLeftEvent::new(guild_id, user_id.clone()))
            .await;

        Ok(())
    }

    /// Remove a member (officer only)
    ///
    /// The operator must strictly outrank the target: a SUB_MASTER removes
    /// only MEMBERs, the MASTER removes anyone else, and nobody removes the
    /// MASTER.
    #[instrument(skip(self))]
    pub async fn kick(
        &self,
        guild_id: Snowflake,
        operator_id: &UserId,
        target_user: &UserId,
    ) -> ServiceResult<()> {
        if operator_id == target_user {
            return Err(DomainError::CannotTargetSelf.into());
        }

        let (_user_guard, _guild_guard) = self
            .ctx
            .locks()
            .lock_admission(target_user, guild_id)
            .await;

        self.require_live_guild(guild_id).await?;

        let authority = AuthorityService::new(self.ctx);
        let operator = authority.require_officer(guild_id, operator_id).await?;
        let mut target = authority.active_membership(guild_id, target_user).await?;

        if !operator.role.outranks(target.role) {
            return Err(DomainError::CannotKickPeer.into());
        }

        target.mark_kicked();
        self.ctx.membership_repo().update(&target).await?;

        info!(
            guild_id = %guild_id,
            user_id = %target_user,
            kicked_by = %operator_id,
            "Member kicked"
        );

        self.publish(MemberKickedEvent::new(
            guild_id,
            target_user.clone(),
            operator_id.clone(),
        ))
        .await;

        Ok(())
    }

    // ========================================================================
    // Role management
    // ========================================================================

    /// Promote an active MEMBER to SUB_MASTER (MASTER only)
    #[instrument(skip(self))]
    pub async fn promote(
        &self,
        guild_id: Snowflake,
        master_id: &UserId,
        target_user: &UserId,
    ) -> ServiceResult<MembershipResponse> {
        let _guild_guard = self.ctx.locks().lock_guild(guild_id).await;

        self.require_live_guild(guild_id).await?;

        let authority = AuthorityService::new(self.ctx);
        authority.require_master(guild_id, master_id).await?;
        let mut target = authority.active_membership(guild_id, target_user).await?;

        // Covers promoting a SUB_MASTER and the MASTER promoting themself
        if target.role != GuildRole::Member {
            return Err(DomainError::RoleUnchanged.into());
        }

        let role_before = target.role;
        target.change_role(GuildRole::SubMaster);
        self.ctx.membership_repo().update(&target).await?;

        info!(
            guild_id = %guild_id,
            user_id = %target_user,
            changed_by = %master_id,
            "Member promoted to SUB_MASTER"
        );

        self.publish(MemberRoleChangedEvent::new(
            guild_id,
            target_user.clone(),
            master_id.clone(),
            role_before,
            target.role,
        ))
        .await;

        Ok(MembershipResponse::from(target))
    }

    /// Demote an active SUB_MASTER back to MEMBER (MASTER only)
    #[instrument(skip(self))]
    pub async fn demote(
        &self,
        guild_id: Snowflake,
        master_id: &UserId,
        target_user: &UserId,
    ) -> ServiceResult<MembershipResponse> {
        let _guild_guard = self.ctx.locks().lock_guild(guild_id).await;

        self.require_live_guild(guild_id).await?;

        let authority = AuthorityService::new(self.ctx);
        authority.require_master(guild_id, master_id).await?;
        let mut target = authority.active_membership(guild_id, target_user).await?;

        if target.role != GuildRole::SubMaster {
            return Err(DomainError::RoleUnchanged.into());
        }

        let role_before = target.role;
        target.change_role(GuildRole::Member);
        self.ctx.membership_repo().update(&target).await?;

        info!(
            guild_id = %guild_id,
            user_id = %target_user,
            changed_by = %master_id,
            "Member demoted to MEMBER"
        );

        self.publish(MemberRoleChangedEvent::new(
            guild_id,
            target_user.clone(),
            master_id.clone(),
            role_before,
            target.role,
        ))
        .await;

        Ok(MembershipResponse::from(target))
    }

    /// Hand the MASTER seat to another active member
    ///
    /// The guild row and both membership rows move in one repository commit,
    /// so no reader ever observes a masterless guild.
    #[instrument(skip(self))]
    pub async fn transfer_master(
        &self,
        guild_id: Snowflake,
        master_id: &UserId,
        target_user: &UserId,
    ) -> ServiceResult<()> {
        if master_id == target_user {
            return Err(DomainError::CannotTargetSelf.into());
        }

        let _guild_guard = self.ctx.locks().lock_guild(guild_id).await;

        let mut guild = self.require_live_guild(guild_id).await?;

        let authority = AuthorityService::new(self.ctx);
        let mut outgoing = authority.require_master(guild_id, master_id).await?;
        let mut incoming = authority.active_membership(guild_id, target_user).await?;

        outgoing.change_role(GuildRole::Member);
        incoming.change_role(GuildRole::Master);
        guild.transfer_master(target_user.clone());

        self.ctx
            .guild_repo()
            .commit_master_transfer(&guild, &outgoing, &incoming)
            .await?;

        info!(
            guild_id = %guild_id,
            previous_master = %master_id,
            new_master = %target_user,
            "Master seat transferred"
        );

        self.publish(MasterTransferredEvent::new(
            guild_id,
            master_id.clone(),
            target_user.clone(),
        ))
        .await;

        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Get a user's active membership in a guild
    #[instrument(skip(self))]
    pub async fn get_membership(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> ServiceResult<MembershipResponse> {
        self.require_live_guild(guild_id).await?;

        let membership = AuthorityService::new(self.ctx)
            .active_membership(guild_id, user_id)
            .await?;

        Ok(MembershipResponse::from(membership))
    }

    /// List a guild's active members, oldest joiner first
    #[instrument(skip(self))]
    pub async fn list_members(&self, guild_id: Snowflake) -> ServiceResult<Vec<MembershipResponse>> {
        self.require_live_guild(guild_id).await?;

        let members = self.ctx.membership_repo().list_active(guild_id).await?;
        Ok(members.iter().map(MembershipResponse::from).collect())
    }

    /// List a user's active memberships across guilds
    #[instrument(skip(self))]
    pub async fn list_user_memberships(
        &self,
        user_id: &UserId,
    ) -> ServiceResult<Vec<MembershipResponse>> {
        let memberships = self
            .ctx
            .membership_repo()
            .list_active_by_user(user_id)
            .await?;
        Ok(memberships.iter().map(MembershipResponse::from).collect())
    }

    /// List a guild's actionable join requests, oldest first (officer only)
    #[instrument(skip(self))]
    pub async fn list_pending_requests(
        &self,
        guild_id: Snowflake,
        operator_id: &UserId,
    ) -> ServiceResult<Vec<JoinRequestResponse>> {
        self.require_live_guild(guild_id).await?;

        AuthorityService::new(self.ctx)
            .require_officer(guild_id, operator_id)
            .await?;

        let requests = self
            .ctx
            .join_request_repo()
            .list_pending_by_guild(guild_id)
            .await?;
        Ok(requests
            .iter()
            .filter(|request| request.is_actionable())
            .map(JoinRequestResponse::from)
            .collect())
    }

    /// List the caller's join requests, newest first
    ///
    /// Expired rows that never got a decision are hidden.
    #[instrument(skip(self))]
    pub async fn list_my_requests(
        &self,
        user_id: &UserId,
    ) -> ServiceResult<Vec<JoinRequestResponse>> {
        let requests = self.ctx.join_request_repo().list_by_user(user_id).await?;
        Ok(requests
            .iter()
            .filter(|request| !(request.is_pending() && request.is_expired()))
            .map(JoinRequestResponse::from)
            .collect())
    }

    /// List unexpired invitations addressed to the caller, oldest first
    #[instrument(skip(self))]
    pub async fn list_my_invitations(
        &self,
        user_id: &UserId,
    ) -> ServiceResult<Vec<InvitationResponse>> {
        let invitations = self
            .ctx
            .invitation_repo()
            .list_pending_by_user(user_id)
            .await?;
        Ok(invitations
            .iter()
            .filter(|invitation| invitation.is_actionable())
            .map(InvitationResponse::from)
            .collect())
    }

    /// List a guild's outstanding invitations (officer only)
    #[instrument(skip(self))]
    pub async fn list_guild_invitations(
        &self,
        guild_id: Snowflake,
        operator_id: &UserId,
    ) -> ServiceResult<Vec<InvitationResponse>> {
        self.require_live_guild(guild_id).await?;

        AuthorityService::new(self.ctx)
            .require_officer(guild_id, operator_id)
            .await?;

        let invitations = self
            .ctx
            .invitation_repo()
            .list_pending_by_guild(guild_id)
            .await?;
        Ok(invitations
            .iter()
            .filter(|invitation| invitation.is_actionable())
            .map(InvitationResponse::from)
            .collect())
    }

    // ========================================================================
    // Admission pipeline
    // ========================================================================

    /// The rules every admission path runs before committing
    ///
    /// Order matters: category exclusivity exempts the candidate's own row
    /// in this guild so the already-member case reports precisely, and the
    /// capacity read goes through the progression engine so a level change
    /// is reflected immediately.
    async fn check_admission(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> ServiceResult<Guild> {
        // 1. live guild
        let guild = self
            .ctx
            .guild_repo()
            .find_active_by_id(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;

        // 2. one guild per category
        if let Some(existing) = self
            .ctx
            .membership_repo()
            .find_active_in_category(user_id, guild.category_id)
            .await?
        {
            if existing.guild_id != guild_id {
                return Err(DomainError::CategoryExclusivity {
                    category_id: guild.category_id,
                }
                .into());
            }
        }

        // 3. not already in
        if self
            .ctx
            .membership_repo()
            .find_active(guild_id, user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyMember.into());
        }

        // 4. capacity, through the live accessor
        let capacity = ProgressionService::new(self.ctx)
            .current_capacity(guild_id)
            .await?;
        let occupied = self.ctx.membership_repo().count_active(guild_id).await?;
        if occupied >= i64::from(capacity) {
            return Err(DomainError::GuildFull { capacity }.into());
        }

        Ok(guild)
    }

    /// Reactivate the pair's LEFT/KICKED row or insert a fresh MEMBER row
    async fn commit_admission(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
    ) -> ServiceResult<GuildMembership> {
        let membership = match self.ctx.membership_repo().find(guild_id, user_id).await? {
            Some(mut row) => {
                row.reactivate();
                self.ctx.membership_repo().update(&row).await?;
                row
            }
            None => {
                let row = GuildMembership::new_member(guild_id, user_id.clone());
                self.ctx.membership_repo().create(&row).await?;
                row
            }
        };
        Ok(membership)
    }

    /// Cancel a leftover PENDING join request made moot by an admission
    async fn retire_moot_request(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
        decided_by: &UserId,
    ) -> ServiceResult<()> {
        if let Some(mut request) = self
            .ctx
            .join_request_repo()
            .find_pending(guild_id, user_id)
            .await?
        {
            request.cancel(
                decided_by.clone(),
                Some("superseded by admission".to_string()),
            );
            self.ctx.join_request_repo().update(&request).await?;

            self.publish(JoinRequestDecidedEvent::new(
                guild_id,
                request.id,
                user_id.clone(),
                request.status,
                decided_by.clone(),
            ))
            .await;
        }
        Ok(())
    }

    /// Cancel a leftover PENDING invitation made moot by an admission
    async fn retire_moot_invitation(
        &self,
        guild_id: Snowflake,
        user_id: &UserId,
        cancelled_by: &UserId,
    ) -> ServiceResult<()> {
        if let Some(mut invitation) = self
            .ctx
            .invitation_repo()
            .find_pending(guild_id, user_id)
            .await?
        {
            invitation.cancel(
                cancelled_by.clone(),
                Some("superseded by admission".to_string()),
            );
            self.ctx.invitation_repo().update(&invitation).await?;
        }
        Ok(())
    }

    /// Fetch the guild or fail; soft-deleted guilds look absent
    async fn require_live_guild(&self, guild_id: Snowflake) -> ServiceResult<Guild> {
        let guild = self
            .ctx
            .guild_repo()
            .find_active_by_id(guild_id)
            .await?
            .ok_or(DomainError::GuildNotFound(guild_id))?;
        Ok(guild)
    }

    async fn publish(&self, event: GuildEvent) {
        if let Err(error) = self.ctx.event_sink().emit(event).await {
            warn!(%error, "event emission failed");
        }
    }
}
