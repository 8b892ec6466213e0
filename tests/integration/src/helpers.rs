//! Test helpers for integration tests
//!
//! Scenario builders on top of the fixtures: create guilds, admit members,
//! and poke at pending records the way only tests need to.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};

use guild_core::{DomainError, Snowflake, UserId};
use guild_service::dto::{GuildResponse, JoinOutcomeResponse};
use guild_service::ServiceError;

use crate::fixtures::{
    approval_guild_request, guild_request, join_request, private_guild_request, unique_user,
    TestEnv,
};

/// Unwrap the domain error behind a service error
///
/// Panics with the full error when the service failed some other way, so a
/// wrong failure mode shows up in the assertion message.
pub fn domain_error(error: &ServiceError) -> &DomainError {
    match error.as_domain() {
        Some(domain) => domain,
        None => panic!("expected a domain error, got: {error}"),
    }
}

/// Create an OPEN guild in a fresh category and return it with its master
pub async fn setup_guild(env: &TestEnv) -> Result<(GuildResponse, UserId)> {
    let category_id = env.seed_category(&unique_user("category"));
    setup_guild_in(env, category_id).await
}

/// Create an OPEN guild in the given category
pub async fn setup_guild_in(env: &TestEnv, category_id: Snowflake) -> Result<(GuildResponse, UserId)> {
    let master = UserId::new(unique_user("master"));
    let guild = env
        .guilds()
        .create_guild(master.clone(), guild_request(category_id))
        .await?;
    Ok((guild, master))
}

/// Create an APPROVAL_REQUIRED guild in a fresh category
pub async fn setup_approval_guild(env: &TestEnv) -> Result<(GuildResponse, UserId)> {
    let category_id = env.seed_category(&unique_user("category"));
    let master = UserId::new(unique_user("master"));
    let guild = env
        .guilds()
        .create_guild(master.clone(), approval_guild_request(category_id))
        .await?;
    Ok((guild, master))
}

/// Create a PRIVATE guild in a fresh category
pub async fn setup_private_guild(env: &TestEnv) -> Result<(GuildResponse, UserId)> {
    let category_id = env.seed_category(&unique_user("category"));
    let master = UserId::new(unique_user("master"));
    let guild = env
        .guilds()
        .create_guild(master.clone(), private_guild_request(category_id))
        .await?;
    Ok((guild, master))
}

/// Admit `count` fresh users into an OPEN guild and return them
pub async fn admit_members(env: &TestEnv, guild_id: Snowflake, count: usize) -> Result<Vec<UserId>> {
    let mut admitted = Vec::with_capacity(count);
    for _ in 0..count {
        let user = UserId::new(unique_user("member"));
        let outcome = env
            .members()
            .request_join(guild_id, user.clone(), join_request("joining for tests"))
            .await?;
        anyhow::ensure!(
            matches!(outcome, JoinOutcomeResponse::Joined { .. }),
            "expected an immediate admission"
        );
        admitted.push(user);
    }
    Ok(admitted)
}

/// Backdate a pending join request so it reads as expired
pub async fn expire_join_request(env: &TestEnv, request_id: Snowflake) -> Result<()> {
    let repo = env.ctx().join_request_repo();
    let mut row = repo
        .find_by_id(request_id)
        .await?
        .context("join request missing")?;
    row.expires_at = Some(Utc::now() - Duration::minutes(5));
    repo.update(&row).await?;
    Ok(())
}

/// Backdate a pending invitation so it reads as expired
pub async fn expire_invitation(env: &TestEnv, invitation_id: Snowflake) -> Result<()> {
    let repo = env.ctx().invitation_repo();
    let mut row = repo
        .find_by_id(invitation_id)
        .await?
        .context("invitation missing")?;
    row.expires_at = Some(Utc::now() - Duration::minutes(5));
    repo.update(&row).await?;
    Ok(())
}

/// Parse a response ID back into a Snowflake
pub fn parse_id(id: &str) -> Snowflake {
    id.parse().unwrap_or_else(|_| panic!("bad snowflake in response: {id}"))
}
