//! Membership lifecycle tests
//!
//! Admission through all three channels (open join, approval queue,
//! invitation), decision handling, supersession, expiry, departure, and
//! role management, exercised end to end against the in-memory environment.

use guild_core::{
    DomainError, GuildRole, InvitationStatus, JoinPolicy, JoinRequestStatus, MembershipStatus,
    Snowflake, UserId,
};
use guild_service::dto::{
    DecideRequest, JoinOutcomeResponse, JoinRequestResponse, MembershipResponse,
    UpdateGuildRequest,
};
use integration_tests::{
    admit_members, approval_guild_request, domain_error, expire_invitation, expire_join_request,
    guild_request, invite_request, join_request, parse_id, setup_approval_guild, setup_guild,
    setup_guild_in, setup_private_guild, unique_user, TestEnv,
};
use pretty_assertions::{assert_eq, assert_ne};

fn joined(outcome: JoinOutcomeResponse) -> MembershipResponse {
    match outcome {
        JoinOutcomeResponse::Joined { membership } => membership,
        other => panic!("expected an immediate admission, got {other:?}"),
    }
}

fn queued(outcome: JoinOutcomeResponse) -> JoinRequestResponse {
    match outcome {
        JoinOutcomeResponse::Pending { request } => request,
        other => panic!("expected a queued request, got {other:?}"),
    }
}

// ============================================================================
// Open Admission Tests
// ============================================================================

#[tokio::test]
async fn test_open_join_admits_immediately() {
    let env = TestEnv::new();
    let (guild, _) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    env.drain_events();

    let user = UserId::new(unique_user("joiner"));
    let outcome = env
        .members()
        .request_join(guild_id, user.clone(), join_request("let me in"))
        .await
        .unwrap();

    let membership = joined(outcome);
    assert_eq!(membership.guild_id, guild.id);
    assert_eq!(membership.user_id, user.to_string());
    assert_eq!(membership.role, GuildRole::Member);
    assert_eq!(membership.status, MembershipStatus::Active);

    let members = env.members().list_members(guild_id).await.unwrap();
    assert_eq!(members.len(), 2);

    assert_eq!(env.drain_event_types(), vec!["MEMBER_JOINED"]);
}

#[tokio::test]
async fn test_join_unknown_guild() {
    let env = TestEnv::new();

    let err = env
        .members()
        .request_join(
            Snowflake::new(31_337),
            UserId::new(unique_user("ghost")),
            join_request("anyone home"),
        )
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::GuildNotFound(_)));
}

#[tokio::test]
async fn test_join_twice_rejected() {
    let env = TestEnv::new();
    let (guild, _) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let user = UserId::new(unique_user("joiner"));

    env.members()
        .request_join(guild_id, user.clone(), join_request("first"))
        .await
        .unwrap();

    let err = env
        .members()
        .request_join(guild_id, user, join_request("again"))
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::AlreadyMember));
}

#[tokio::test]
async fn test_private_guild_rejects_direct_join() {
    let env = TestEnv::new();
    let (guild, _) = setup_private_guild(&env).await.unwrap();

    let err = env
        .members()
        .request_join(
            parse_id(&guild.id),
            UserId::new(unique_user("outsider")),
            join_request("knock knock"),
        )
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::PrivateGuild));
}

#[tokio::test]
async fn test_join_full_guild() {
    let env = TestEnv::new();
    let category_id = env.seed_category("raiding");
    let mut request = guild_request(category_id);
    request.max_members = Some(2);
    let guild = env
        .guilds()
        .create_guild(UserId::new(unique_user("master")), request)
        .await
        .unwrap();
    let guild_id = parse_id(&guild.id);
    admit_members(&env, guild_id, 1).await.unwrap();

    let err = env
        .members()
        .request_join(
            guild_id,
            UserId::new(unique_user("late")),
            join_request("too late"),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::GuildFull { capacity: 2 }
    ));
}

#[tokio::test]
async fn test_category_exclusivity_across_guilds() {
    let env = TestEnv::new();
    let category_id = env.seed_category("pvp");
    let (first, _) = setup_guild_in(&env, category_id).await.unwrap();
    let (second, _) = setup_guild_in(&env, category_id).await.unwrap();
    let user = UserId::new(unique_user("joiner"));

    env.members()
        .request_join(parse_id(&first.id), user.clone(), join_request("one"))
        .await
        .unwrap();

    let err = env
        .members()
        .request_join(parse_id(&second.id), user.clone(), join_request("two"))
        .await
        .unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::CategoryExclusivity { category_id: conflict } if *conflict == category_id
    ));

    // A guild in another category is unaffected
    let elsewhere = env.seed_category("crafting");
    let (third, _) = setup_guild_in(&env, elsewhere).await.unwrap();
    env.members()
        .request_join(parse_id(&third.id), user, join_request("three"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rejoin_after_leaving_reuses_row() {
    let env = TestEnv::new();
    let (guild, _) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let user = UserId::new(unique_user("rejoiner"));

    env.members()
        .request_join(guild_id, user.clone(), join_request("first run"))
        .await
        .unwrap();
    env.members().leave(guild_id, &user).await.unwrap();

    let outcome = env
        .members()
        .request_join(guild_id, user.clone(), join_request("second run"))
        .await
        .unwrap();

    let membership = joined(outcome);
    assert_eq!(membership.status, MembershipStatus::Active);
    assert_eq!(membership.role, GuildRole::Member);
    assert!(membership.left_at.is_none());
}

// ============================================================================
// Approval Queue Tests
// ============================================================================

#[tokio::test]
async fn test_approval_join_queues_request() {
    let env = TestEnv::new();
    let (guild, master) = setup_approval_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    env.drain_events();

    let user = UserId::new(unique_user("applicant"));
    let outcome = env
        .members()
        .request_join(guild_id, user.clone(), join_request("please"))
        .await
        .unwrap();

    let request = queued(outcome);
    assert_eq!(request.guild_id, guild.id);
    assert_eq!(request.user_id, user.to_string());
    assert_eq!(request.status, JoinRequestStatus::Pending);
    assert_eq!(request.message.as_deref(), Some("please"));
    assert!(request.expires_at.is_some());

    // Not a member yet, and nothing was announced
    assert_eq!(env.members().list_members(guild_id).await.unwrap().len(), 1);
    assert!(env.drain_event_types().is_empty());

    let pending = env
        .members()
        .list_pending_requests(guild_id, &master)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, request.id);
}

#[tokio::test]
async fn test_duplicate_pending_request_rejected() {
    let env = TestEnv::new();
    let (guild, _) = setup_approval_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let user = UserId::new(unique_user("applicant"));

    env.members()
        .request_join(guild_id, user.clone(), join_request("first"))
        .await
        .unwrap();

    let err = env
        .members()
        .request_join(guild_id, user, join_request("second"))
        .await
        .unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::RequestAlreadyPending
    ));
}

#[tokio::test]
async fn test_approve_join_request_admits() {
    let env = TestEnv::new();
    let (guild, master) = setup_approval_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let user = UserId::new(unique_user("applicant"));
    let request = queued(
        env.members()
            .request_join(guild_id, user.clone(), join_request("please"))
            .await
            .unwrap(),
    );
    env.drain_events();

    let membership = env
        .members()
        .approve_join_request(parse_id(&request.id), &master)
        .await
        .unwrap();
    assert_eq!(membership.user_id, user.to_string());
    assert_eq!(membership.role, GuildRole::Member);
    assert_eq!(membership.status, MembershipStatus::Active);

    assert_eq!(
        env.drain_event_types(),
        vec!["MEMBER_JOINED", "JOIN_REQUEST_DECIDED"]
    );

    let mine = env.members().list_my_requests(&user).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, JoinRequestStatus::Approved);
    assert_eq!(mine[0].decided_by, Some(master.to_string()));
}

#[tokio::test]
async fn test_reject_join_request() {
    let env = TestEnv::new();
    let (guild, master) = setup_approval_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let user = UserId::new(unique_user("applicant"));
    let request = queued(
        env.members()
            .request_join(guild_id, user.clone(), join_request("please"))
            .await
            .unwrap(),
    );
    env.drain_events();

    let decided = env
        .members()
        .reject_join_request(
            parse_id(&request.id),
            &master,
            DecideRequest {
                reason: Some("not a fit".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(decided.status, JoinRequestStatus::Rejected);
    assert_eq!(decided.decided_by, Some(master.to_string()));
    assert_eq!(decided.decision_reason.as_deref(), Some("not a fit"));
    assert!(decided.decided_at.is_some());

    // The applicant stayed outside
    let err = env.members().get_membership(guild_id, &user).await.unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::MembershipNotFound));

    assert_eq!(env.drain_event_types(), vec!["JOIN_REQUEST_DECIDED"]);
}

#[tokio::test]
async fn test_cancel_own_join_request() {
    let env = TestEnv::new();
    let (guild, master) = setup_approval_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let user = UserId::new(unique_user("applicant"));
    let request = queued(
        env.members()
            .request_join(guild_id, user.clone(), join_request("please"))
            .await
            .unwrap(),
    );

    let decided = env
        .members()
        .cancel_join_request(parse_id(&request.id), &user)
        .await
        .unwrap();
    assert_eq!(decided.status, JoinRequestStatus::Cancelled);
    assert_eq!(decided.decided_by, Some(user.to_string()));

    let pending = env
        .members()
        .list_pending_requests(guild_id, &master)
        .await
        .unwrap();
    assert!(pending.is_empty());
}

#[tokio::test]
async fn test_cancel_foreign_join_request_masked() {
    let env = TestEnv::new();
    let (guild, _) = setup_approval_guild(&env).await.unwrap();
    let request = queued(
        env.members()
            .request_join(
                parse_id(&guild.id),
                UserId::new(unique_user("applicant")),
                join_request("please"),
            )
            .await
            .unwrap(),
    );

    // Someone else's request looks like a missing one
    let err = env
        .members()
        .cancel_join_request(parse_id(&request.id), &UserId::new(unique_user("stranger")))
        .await
        .unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::JoinRequestNotFound(_)
    ));
}

#[tokio::test]
async fn test_approve_requires_officer() {
    let env = TestEnv::new();
    let (guild, master) = setup_approval_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);

    // Seat a plain member through an invitation
    let helper = UserId::new(unique_user("helper"));
    let invitation = env
        .members()
        .invite(guild_id, &master, invite_request(helper.as_str()))
        .await
        .unwrap();
    env.members()
        .accept_invitation(parse_id(&invitation.id), helper.clone())
        .await
        .unwrap();

    let request = queued(
        env.members()
            .request_join(
                guild_id,
                UserId::new(unique_user("applicant")),
                join_request("please"),
            )
            .await
            .unwrap(),
    );

    let err = env
        .members()
        .approve_join_request(parse_id(&request.id), &helper)
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::NotOfficer));

    // A SUB_MASTER may decide the queue
    env.members().promote(guild_id, &master, &helper).await.unwrap();
    env.members()
        .approve_join_request(parse_id(&request.id), &helper)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_approve_full_guild_leaves_request_pending() {
    let env = TestEnv::new();
    let category_id = env.seed_category("raiding");
    let master = UserId::new(unique_user("master"));
    let mut create = approval_guild_request(category_id);
    create.max_members = Some(2);
    let guild = env.guilds().create_guild(master.clone(), create).await.unwrap();
    let guild_id = parse_id(&guild.id);

    // Fill the roster through an invitation
    let filler = UserId::new(unique_user("filler"));
    let invitation = env
        .members()
        .invite(guild_id, &master, invite_request(filler.as_str()))
        .await
        .unwrap();
    env.members()
        .accept_invitation(parse_id(&invitation.id), filler)
        .await
        .unwrap();

    let request = queued(
        env.members()
            .request_join(
                guild_id,
                UserId::new(unique_user("applicant")),
                join_request("please"),
            )
            .await
            .unwrap(),
    );

    let err = env
        .members()
        .approve_join_request(parse_id(&request.id), &master)
        .await
        .unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::GuildFull { capacity: 2 }
    ));

    // The request stays in the queue; a freed slot can still admit it
    let pending = env
        .members()
        .list_pending_requests(guild_id, &master)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, request.id);
}

#[tokio::test]
async fn test_approve_after_category_conflict_rejects_request() {
    let env = TestEnv::new();
    let category_id = env.seed_category("pvp");
    let gatekeeper = UserId::new(unique_user("master"));
    let gated = env
        .guilds()
        .create_guild(gatekeeper.clone(), approval_guild_request(category_id))
        .await
        .unwrap();
    let (open, _) = setup_guild_in(&env, category_id).await.unwrap();

    let user = UserId::new(unique_user("applicant"));
    let request = queued(
        env.members()
            .request_join(parse_id(&gated.id), user.clone(), join_request("waiting"))
            .await
            .unwrap(),
    );

    // The applicant joins a same-category guild while the request waits
    env.members()
        .request_join(parse_id(&open.id), user.clone(), join_request("impatient"))
        .await
        .unwrap();
    env.drain_events();

    let err = env
        .members()
        .approve_join_request(parse_id(&request.id), &gatekeeper)
        .await
        .unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::CategoryExclusivity { .. }
    ));

    // The moot request was closed out rather than left to wedge the queue
    let mine = env.members().list_my_requests(&user).await.unwrap();
    let row = mine.iter().find(|r| r.id == request.id).unwrap();
    assert_eq!(row.status, JoinRequestStatus::Rejected);
    assert_eq!(
        row.decision_reason.as_deref(),
        Some("applicant already belongs to a guild in this category")
    );
    assert_eq!(env.drain_event_types(), vec!["JOIN_REQUEST_DECIDED"]);
}

// ============================================================================
// Invitation Tests
// ============================================================================

#[tokio::test]
async fn test_invite_and_accept() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    env.drain_events();

    let invitee = UserId::new(unique_user("invitee"));
    let invitation = env
        .members()
        .invite(guild_id, &master, invite_request(invitee.as_str()))
        .await
        .unwrap();
    assert_eq!(invitation.guild_id, guild.id);
    assert_eq!(invitation.user_id, invitee.to_string());
    assert_eq!(invitation.invited_by, master.to_string());
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(env.drain_event_types(), vec!["INVITATION_ISSUED"]);

    let listed = env.members().list_my_invitations(&invitee).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, invitation.id);

    let membership = env
        .members()
        .accept_invitation(parse_id(&invitation.id), invitee.clone())
        .await
        .unwrap();
    assert_eq!(membership.role, GuildRole::Member);
    assert_eq!(membership.status, MembershipStatus::Active);
    assert_eq!(env.drain_event_types(), vec!["MEMBER_JOINED"]);

    assert!(env.members().list_my_invitations(&invitee).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invite_requires_officer() {
    let env = TestEnv::new();
    let (guild, _) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let member = admit_members(&env, guild_id, 1).await.unwrap().remove(0);

    let err = env
        .members()
        .invite(guild_id, &member, invite_request(&unique_user("friend")))
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::NotOfficer));
}

#[tokio::test]
async fn test_invite_guards() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let member = admit_members(&env, guild_id, 1).await.unwrap().remove(0);

    // An active member needs no invitation
    let err = env
        .members()
        .invite(guild_id, &master, invite_request(member.as_str()))
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::AlreadyMember));

    // One standing offer per user
    let invitee = unique_user("invitee");
    env.members()
        .invite(guild_id, &master, invite_request(&invitee))
        .await
        .unwrap();
    let err = env
        .members()
        .invite(guild_id, &master, invite_request(&invitee))
        .await
        .unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::InvitationAlreadyPending
    ));
}

#[tokio::test]
async fn test_accept_foreign_invitation_rejected() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let invitation = env
        .members()
        .invite(
            parse_id(&guild.id),
            &master,
            invite_request(&unique_user("addressee")),
        )
        .await
        .unwrap();

    let err = env
        .members()
        .accept_invitation(parse_id(&invitation.id), UserId::new(unique_user("thief")))
        .await
        .unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::InvitationNotAddressed
    ));

    let err = env
        .members()
        .accept_invitation(Snowflake::new(555_555), UserId::new(unique_user("lost")))
        .await
        .unwrap_err();
    assert!(matches!(
        domain_error(&err),
        DomainError::InvitationNotFound(_)
    ));
}

#[tokio::test]
async fn test_decline_invitation() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let invitee = UserId::new(unique_user("invitee"));
    let invitation = env
        .members()
        .invite(parse_id(&guild.id), &master, invite_request(invitee.as_str()))
        .await
        .unwrap();
    env.drain_events();

    let decided = env
        .members()
        .decline_invitation(parse_id(&invitation.id), &invitee)
        .await
        .unwrap();
    assert_eq!(decided.status, InvitationStatus::Declined);
    assert_eq!(decided.decided_by, Some(invitee.to_string()));

    // Declining announces nothing
    assert!(env.drain_event_types().is_empty());

    // And the offer cannot be taken afterwards
    let err = env
        .members()
        .accept_invitation(parse_id(&invitation.id), invitee)
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::AlreadyDecided));
}

#[tokio::test]
async fn test_cancel_invitation_officer_only() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let member = admit_members(&env, guild_id, 1).await.unwrap().remove(0);
    let invitation = env
        .members()
        .invite(guild_id, &master, invite_request(&unique_user("invitee")))
        .await
        .unwrap();

    let err = env
        .members()
        .cancel_invitation(
            parse_id(&invitation.id),
            &member,
            DecideRequest { reason: None },
        )
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::NotOfficer));

    let decided = env
        .members()
        .cancel_invitation(
            parse_id(&invitation.id),
            &master,
            DecideRequest {
                reason: Some("filled the roster".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(decided.status, InvitationStatus::Cancelled);
    assert_eq!(decided.decided_by, Some(master.to_string()));
    assert_eq!(decided.decision_reason.as_deref(), Some("filled the roster"));
}

#[tokio::test]
async fn test_private_guild_admits_by_invitation() {
    let env = TestEnv::new();
    let (guild, master) = setup_private_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);

    let invitee = UserId::new(unique_user("invitee"));
    let invitation = env
        .members()
        .invite(guild_id, &master, invite_request(invitee.as_str()))
        .await
        .unwrap();
    let membership = env
        .members()
        .accept_invitation(parse_id(&invitation.id), invitee)
        .await
        .unwrap();

    assert_eq!(membership.status, MembershipStatus::Active);
    assert_eq!(env.members().list_members(guild_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_invitation_skips_approval_queue() {
    let env = TestEnv::new();
    let (guild, master) = setup_approval_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);

    let invitee = UserId::new(unique_user("invitee"));
    let invitation = env
        .members()
        .invite(guild_id, &master, invite_request(invitee.as_str()))
        .await
        .unwrap();

    // The invitation is the approval; no request is queued
    let membership = env
        .members()
        .accept_invitation(parse_id(&invitation.id), invitee)
        .await
        .unwrap();
    assert_eq!(membership.status, MembershipStatus::Active);
    assert!(env
        .members()
        .list_pending_requests(guild_id, &master)
        .await
        .unwrap()
        .is_empty());
}

// ============================================================================
// Supersession Tests
// ============================================================================

#[tokio::test]
async fn test_open_join_retires_stale_request() {
    let env = TestEnv::new();
    let (guild, master) = setup_approval_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let user = UserId::new(unique_user("applicant"));
    let request = queued(
        env.members()
            .request_join(guild_id, user.clone(), join_request("waiting"))
            .await
            .unwrap(),
    );

    // The guild opens up while the request waits
    env.guilds()
        .update_guild(
            guild_id,
            &master,
            UpdateGuildRequest {
                name: None,
                description: None,
                visibility: None,
                join_policy: Some(JoinPolicy::Open),
                max_members: None,
            },
        )
        .await
        .unwrap();
    env.drain_events();

    let outcome = env
        .members()
        .request_join(guild_id, user.clone(), join_request("walking in"))
        .await
        .unwrap();
    joined(outcome);

    assert_eq!(
        env.drain_event_types(),
        vec!["JOIN_REQUEST_DECIDED", "MEMBER_JOINED"]
    );

    let mine = env.members().list_my_requests(&user).await.unwrap();
    let row = mine.iter().find(|r| r.id == request.id).unwrap();
    assert_eq!(row.status, JoinRequestStatus::Cancelled);
    assert_eq!(row.decision_reason.as_deref(), Some("superseded by admission"));
    assert_eq!(row.decided_by, Some(user.to_string()));
}

#[tokio::test]
async fn test_open_join_retires_stale_invitation() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let user = UserId::new(unique_user("invitee"));
    let invitation = env
        .members()
        .invite(guild_id, &master, invite_request(user.as_str()))
        .await
        .unwrap();
    env.drain_events();

    joined(
        env.members()
            .request_join(guild_id, user, join_request("never mind the letter"))
            .await
            .unwrap(),
    );

    // The standing offer was quietly withdrawn
    assert_eq!(env.drain_event_types(), vec!["MEMBER_JOINED"]);
    let row = env
        .ctx()
        .invitation_repo()
        .find_by_id(parse_id(&invitation.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, InvitationStatus::Cancelled);
    assert_eq!(row.decision_reason.as_deref(), Some("superseded by admission"));
}

#[tokio::test]
async fn test_accept_invitation_retires_pending_request() {
    let env = TestEnv::new();
    let (guild, master) = setup_approval_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let user = UserId::new(unique_user("applicant"));

    let request = queued(
        env.members()
            .request_join(guild_id, user.clone(), join_request("waiting"))
            .await
            .unwrap(),
    );
    let invitation = env
        .members()
        .invite(guild_id, &master, invite_request(user.as_str()))
        .await
        .unwrap();
    env.drain_events();

    env.members()
        .accept_invitation(parse_id(&invitation.id), user.clone())
        .await
        .unwrap();

    assert_eq!(
        env.drain_event_types(),
        vec!["JOIN_REQUEST_DECIDED", "MEMBER_JOINED"]
    );

    let mine = env.members().list_my_requests(&user).await.unwrap();
    let row = mine.iter().find(|r| r.id == request.id).unwrap();
    assert_eq!(row.status, JoinRequestStatus::Cancelled);
    assert_eq!(row.decision_reason.as_deref(), Some("superseded by admission"));
}

// ============================================================================
// Expiry Tests
// ============================================================================

#[tokio::test]
async fn test_expired_request_cannot_be_approved() {
    let env = TestEnv::new();
    let (guild, master) = setup_approval_guild(&env).await.unwrap();
    let request = queued(
        env.members()
            .request_join(
                parse_id(&guild.id),
                UserId::new(unique_user("applicant")),
                join_request("please"),
            )
            .await
            .unwrap(),
    );
    expire_join_request(&env, parse_id(&request.id)).await.unwrap();

    let err = env
        .members()
        .approve_join_request(parse_id(&request.id), &master)
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::PendingExpired));

    // Rejection still lands; that is how stale rows get a terminal status
    let decided = env
        .members()
        .reject_join_request(parse_id(&request.id), &master, DecideRequest { reason: None })
        .await
        .unwrap();
    assert_eq!(decided.status, JoinRequestStatus::Rejected);
}

#[tokio::test]
async fn test_fresh_request_supersedes_expired() {
    let env = TestEnv::new();
    let (guild, master) = setup_approval_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let user = UserId::new(unique_user("applicant"));
    let request = queued(
        env.members()
            .request_join(guild_id, user.clone(), join_request("first try"))
            .await
            .unwrap(),
    );
    expire_join_request(&env, parse_id(&request.id)).await.unwrap();

    // Hidden from every listing while it idles
    assert!(env
        .members()
        .list_pending_requests(guild_id, &master)
        .await
        .unwrap()
        .is_empty());
    assert!(env.members().list_my_requests(&user).await.unwrap().is_empty());

    let fresh = queued(
        env.members()
            .request_join(guild_id, user.clone(), join_request("try again"))
            .await
            .unwrap(),
    );
    assert_ne!(fresh.id, request.id);

    let pending = env
        .members()
        .list_pending_requests(guild_id, &master)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, fresh.id);
}

#[tokio::test]
async fn test_expired_invitation() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let invitee = UserId::new(unique_user("invitee"));
    let invitation = env
        .members()
        .invite(parse_id(&guild.id), &master, invite_request(invitee.as_str()))
        .await
        .unwrap();
    expire_invitation(&env, parse_id(&invitation.id)).await.unwrap();

    let err = env
        .members()
        .accept_invitation(parse_id(&invitation.id), invitee.clone())
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::PendingExpired));

    assert!(env.members().list_my_invitations(&invitee).await.unwrap().is_empty());

    // Decline still lands
    let decided = env
        .members()
        .decline_invitation(parse_id(&invitation.id), &invitee)
        .await
        .unwrap();
    assert_eq!(decided.status, InvitationStatus::Declined);
}

// ============================================================================
// Departure Tests
// ============================================================================

#[tokio::test]
async fn test_member_leaves() {
    let env = TestEnv::new();
    let (guild, _) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let member = admit_members(&env, guild_id, 1).await.unwrap().remove(0);
    env.drain_events();

    env.members().leave(guild_id, &member).await.unwrap();
    assert_eq!(env.drain_event_types(), vec!["MEMBER_LEFT"]);

    let err = env.members().get_membership(guild_id, &member).await.unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::MembershipNotFound));
    assert_eq!(env.members().list_members(guild_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_master_cannot_leave() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();

    let err = env
        .members()
        .leave(parse_id(&guild.id), &master)
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::MasterCannotLeave));
}

#[tokio::test]
async fn test_kick_respects_rank() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let members = admit_members(&env, guild_id, 3).await.unwrap();
    let first_officer = &members[0];
    let second_officer = &members[1];
    let grunt = &members[2];
    env.members().promote(guild_id, &master, first_officer).await.unwrap();
    env.members().promote(guild_id, &master, second_officer).await.unwrap();
    env.drain_events();

    // Equal rank cannot kick
    let err = env
        .members()
        .kick(guild_id, first_officer, second_officer)
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::CannotKickPeer));

    // Nobody kicks the MASTER
    let err = env
        .members()
        .kick(guild_id, first_officer, &master)
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::CannotKickPeer));

    // A SUB_MASTER removes a MEMBER, the MASTER removes a SUB_MASTER
    env.members().kick(guild_id, first_officer, grunt).await.unwrap();
    env.members().kick(guild_id, &master, second_officer).await.unwrap();

    assert_eq!(
        env.drain_event_types(),
        vec!["MEMBER_KICKED", "MEMBER_KICKED"]
    );
    assert_eq!(env.members().list_members(guild_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_kick_guards() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let members = admit_members(&env, guild_id, 2).await.unwrap();

    let err = env.members().kick(guild_id, &master, &master).await.unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::CannotTargetSelf));

    let err = env
        .members()
        .kick(guild_id, &members[0], &members[1])
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::NotOfficer));

    let err = env
        .members()
        .kick(guild_id, &master, &UserId::new(unique_user("ghost")))
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::MembershipNotFound));
}

// ============================================================================
// Role Management Tests
// ============================================================================

#[tokio::test]
async fn test_promote_and_demote_round_trip() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let member = admit_members(&env, guild_id, 1).await.unwrap().remove(0);
    env.drain_events();

    let promoted = env.members().promote(guild_id, &master, &member).await.unwrap();
    assert_eq!(promoted.role, GuildRole::SubMaster);

    let err = env.members().promote(guild_id, &master, &member).await.unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::RoleUnchanged));

    let demoted = env.members().demote(guild_id, &master, &member).await.unwrap();
    assert_eq!(demoted.role, GuildRole::Member);

    let err = env.members().demote(guild_id, &master, &member).await.unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::RoleUnchanged));

    assert_eq!(
        env.drain_event_types(),
        vec!["MEMBER_ROLE_CHANGED", "MEMBER_ROLE_CHANGED"]
    );
}

#[tokio::test]
async fn test_role_changes_require_master() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let members = admit_members(&env, guild_id, 2).await.unwrap();
    env.members().promote(guild_id, &master, &members[0]).await.unwrap();

    // A SUB_MASTER cannot change roles
    let err = env
        .members()
        .promote(guild_id, &members[0], &members[1])
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::NotMaster));

    let err = env
        .members()
        .demote(guild_id, &members[1], &members[0])
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::NotMaster));
}

#[tokio::test]
async fn test_transfer_master() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    let member = admit_members(&env, guild_id, 1).await.unwrap().remove(0);
    env.drain_events();

    // Cannot hand the seat to yourself
    let err = env
        .members()
        .transfer_master(guild_id, &master, &master)
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::CannotTargetSelf));

    env.members().transfer_master(guild_id, &master, &member).await.unwrap();
    assert_eq!(env.drain_event_types(), vec!["MASTER_TRANSFERRED"]);

    let guild = env.guilds().get_guild(guild_id).await.unwrap();
    assert_eq!(guild.master_id, member.to_string());

    let incoming = env.members().get_membership(guild_id, &member).await.unwrap();
    assert_eq!(incoming.role, GuildRole::Master);
    let outgoing = env.members().get_membership(guild_id, &master).await.unwrap();
    assert_eq!(outgoing.role, GuildRole::Member);

    // A non-member cannot take the seat
    let err = env
        .members()
        .transfer_master(guild_id, &member, &UserId::new(unique_user("ghost")))
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::MembershipNotFound));

    // The previous master is free to go now
    env.members().leave(guild_id, &master).await.unwrap();
}

// ============================================================================
// Disbanded Guild Tests
// ============================================================================

#[tokio::test]
async fn test_disbanded_guild_hides_membership_surface() {
    let env = TestEnv::new();
    let (guild, master) = setup_guild(&env).await.unwrap();
    let guild_id = parse_id(&guild.id);
    env.guilds().disband_guild(guild_id, &master).await.unwrap();

    let err = env
        .members()
        .request_join(guild_id, UserId::new(unique_user("late")), join_request("hm"))
        .await
        .unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::GuildNotFound(_)));

    let err = env.members().list_members(guild_id).await.unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::GuildNotFound(_)));

    let err = env.members().get_membership(guild_id, &master).await.unwrap_err();
    assert!(matches!(domain_error(&err), DomainError::GuildNotFound(_)));
}

// ============================================================================
// Concurrency Tests
// ============================================================================

#[tokio::test]
async fn test_last_slot_single_winner() {
    let env = TestEnv::new();
    let category_id = env.seed_category("raiding");
    let mut request = guild_request(category_id);
    request.max_members = Some(2);
    let guild = env
        .guilds()
        .create_guild(UserId::new(unique_user("master")), request)
        .await
        .unwrap();
    let guild_id = parse_id(&guild.id);

    let members = env.members();
    let (first, second) = tokio::join!(
        members.request_join(guild_id, UserId::new(unique_user("racer")), join_request("slot")),
        members.request_join(guild_id, UserId::new(unique_user("racer")), join_request("slot")),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    let loser = outcomes.iter().find_map(|outcome| outcome.as_ref().err()).unwrap();
    assert!(matches!(
        domain_error(loser),
        DomainError::GuildFull { capacity: 2 }
    ));
    assert_eq!(env.members().list_members(guild_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_concurrent_joins_single_category_winner() {
    let env = TestEnv::new();
    let category_id = env.seed_category("pvp");
    let (first_guild, _) = setup_guild_in(&env, category_id).await.unwrap();
    let (second_guild, _) = setup_guild_in(&env, category_id).await.unwrap();
    let user = UserId::new(unique_user("torn"));

    let members = env.members();
    let (first, second) = tokio::join!(
        members.request_join(parse_id(&first_guild.id), user.clone(), join_request("here")),
        members.request_join(parse_id(&second_guild.id), user.clone(), join_request("there")),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_ok()).count(), 1);
    let loser = outcomes.iter().find_map(|outcome| outcome.as_ref().err()).unwrap();
    assert!(matches!(
        domain_error(loser),
        DomainError::CategoryExclusivity { .. }
    ));
    assert_eq!(env.members().list_user_memberships(&user).await.unwrap().len(), 1);
}
