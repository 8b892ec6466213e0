//! Experience ledger entries - the append-only progression audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Snowflake, UserId};

/// Where an experience delta came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpSource {
    Quest,
    Raid,
    Attendance,
    Event,
    Adjustment,
}

/// One ledger row; never updated or deleted after append
///
/// `exp_delta` is signed: removals record the negated requested amount even
/// when the guild's lifetime total clamps at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpHistory {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub exp_delta: i64,
    pub source: ExpSource,
    pub source_ref: Option<String>,
    pub contributor_id: Option<UserId>,
    pub note: Option<String>,
    pub level_before: i32,
    pub level_after: i32,
    pub created_at: DateTime<Utc>,
}

impl ExpHistory {
    pub fn new(
        id: Snowflake,
        guild_id: Snowflake,
        exp_delta: i64,
        source: ExpSource,
        level_before: i32,
        level_after: i32,
    ) -> Self {
        Self {
            id,
            guild_id,
            exp_delta,
            source,
            source_ref: None,
            contributor_id: None,
            note: None,
            level_before,
            level_after,
            created_at: Utc::now(),
        }
    }

    /// Whether this entry moved the guild's level either direction
    #[inline]
    pub fn changed_level(&self) -> bool {
        self.level_before != self.level_after
    }
}
