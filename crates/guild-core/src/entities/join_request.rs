//! Join requests - the approval-queue admission channel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Snowflake, UserId};

/// Join request lifecycle; PENDING is the only non-terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinRequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// A user's pending application to join an approval-gated guild
///
/// At most one PENDING row per `(guild, user)` pair exists at a time. Expiry
/// is lazy: nothing sweeps expired rows, they are filtered on read and
/// refused on decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildJoinRequest {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub user_id: UserId,
    pub status: JoinRequestStatus,
    pub message: Option<String>,
    pub decided_by: Option<UserId>,
    pub decision_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl GuildJoinRequest {
    pub fn new(
        id: Snowflake,
        guild_id: Snowflake,
        user_id: UserId,
        message: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            guild_id,
            user_id,
            status: JoinRequestStatus::Pending,
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
        self.status == JoinRequestStatus::Pending
    }

    /// Whether the TTL has lapsed (always false without one)
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// Pending and not expired: a decision may act on it
    pub fn is_actionable(&self) -> bool {
        self.is_pending() && !self.is_expired()
    }

    pub fn approve(&mut self, decided_by: UserId) {
        self.decide(JoinRequestStatus::Approved, decided_by, None);
    }

    pub fn reject(&mut self, decided_by: UserId, reason: Option<String>) {
        self.decide(JoinRequestStatus::Rejected, decided_by, reason);
    }

    pub fn cancel(&mut self, decided_by: UserId, reason: Option<String>) {
        self.decide(JoinRequestStatus::Cancelled, decided_by, reason);
    }

    fn decide(&mut self, status: JoinRequestStatus, decided_by: UserId, reason: Option<String>) {
        self.status = status;
        self.decided_by = Some(decided_by);
        self.decision_reason = reason;
        self.decided_at = Some(Utc::now());
    }
}
