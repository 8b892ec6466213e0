//! Invitations - the officer-initiated admission channel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Snowflake, UserId};

/// Invitation lifecycle; PENDING is the only non-terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Cancelled,
}

/// An officer's standing offer of membership to a specific user
///
/// Accepting admits the invitee regardless of the guild's join policy (the
/// invitation is the approval) and is the only admission path into PRIVATE
/// guilds. Same lazy-expiry rules as join requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildInvitation {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub user_id: UserId,
    pub invited_by: UserId,
    pub status: InvitationStatus,
    pub message: Option<String>,
    pub decided_by: Option<UserId>,
    pub decision_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl GuildInvitation {
    pub fn new(
        id: Snowflake,
        guild_id: Snowflake,
        user_id: UserId,
        invited_by: UserId,
        message: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            guild_id,
            user_id,
            invited_by,
            status: InvitationStatus::Pending,
            message,
            decided_by: None,
            decision_reason: None,
            created_at: Utc::now(),
            decided_at: None,
            expires_at,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Whether this invitation is addressed to `user_id`
    #[inline]
    pub fn is_for(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }

    /// Whether the TTL has lapsed (always false without one)
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// Pending and not expired: accepting may act on it
    pub fn is_actionable(&self) -> bool {
        self.is_pending() && !self.is_expired()
    }

    /// Invitee takes the offer
    pub fn accept(&mut self) {
        let invitee = self.user_id.clone();
        self.decide(InvitationStatus::Accepted, invitee, None);
    }

    /// Invitee turns the offer down
    pub fn decline(&mut self) {
        let invitee = self.user_id.clone();
        self.decide(InvitationStatus::Declined, invitee, None);
    }

    /// An officer withdraws the offer
    pub fn cancel(&mut self, cancelled_by: UserId, reason: Option<String>) {
        self.decide(InvitationStatus::Cancelled, cancelled_by, reason);
    }

    fn decide(&mut self, status: InvitationStatus, decided_by: UserId, reason: Option<String>) {
        self.status = status;
        self.decided_by = Some(decided_by);
        self.decision_reason = reason;
        self.decided_at = Some(Utc::now());
    }
}
