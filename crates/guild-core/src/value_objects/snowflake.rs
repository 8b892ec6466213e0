//! Snowflake IDs - time-ordered 64-bit identifiers
//!
//! Layout (most significant first): 41 bits of milliseconds since the service
//! epoch, 10 bits of node id, 12 bits of per-millisecond sequence. IDs sort by
//! creation time, which the experience ledger relies on for cursor pagination.
//!
//! JSON representation is a string: i64 values above 2^53 lose precision in
//! JavaScript consumers. Deserialization accepts either a string or an integer.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Service epoch: 2025-01-01T00:00:00Z in Unix milliseconds
pub const EPOCH_MILLIS: i64 = 1_735_689_600_000;

const NODE_BITS: u8 = 10;
const SEQUENCE_BITS: u8 = 12;
const NODE_MAX: i64 = (1 << NODE_BITS) - 1;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;

/// A time-ordered unique identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Wrap a raw i64 value
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw i64 value
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Extract the creation timestamp encoded in the ID
    pub fn timestamp(self) -> DateTime<Utc> {
        let millis = (self.0 >> (NODE_BITS + SEQUENCE_BITS)) + EPOCH_MILLIS;
        DateTime::from_timestamp_millis(millis).unwrap_or_default()
    }

    /// Extract the node id encoded in the ID
    pub const fn node(self) -> i64 {
        (self.0 >> SEQUENCE_BITS) & NODE_MAX
    }

    /// Extract the per-millisecond sequence number encoded in the ID
    pub const fn sequence(self) -> i64 {
        self.0 & SEQUENCE_MASK
    }

    fn from_parts(millis: i64, node: i64, sequence: i64) -> Self {
        Self((millis << (NODE_BITS + SEQUENCE_BITS)) | (node << SEQUENCE_BITS) | sequence)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Error returned when parsing a snowflake from a string fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid snowflake id: {0:?}")]
pub struct SnowflakeParseError(String);

impl FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| SnowflakeParseError(s.to_string()))
    }
}

impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a snowflake id as a string or integer")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Snowflake::new(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                i64::try_from(v).map(Snowflake::new).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

/// Lock-free snowflake generator
///
/// Timestamp and sequence are packed into a single atomic so generation is a
/// load + CAS with no mutex. When a millisecond's 4096 sequence slots run out
/// the generator borrows the next millisecond instead of parking the thread;
/// a clock that steps backwards is ignored until real time catches up, so
/// generated IDs never regress.
#[derive(Debug)]
pub struct SnowflakeGenerator {
    node_id: i64,
    // (millis since epoch) << SEQUENCE_BITS | sequence
    state: AtomicI64,
}

impl SnowflakeGenerator {
    /// Create a generator for the given node id (masked to 10 bits)
    pub fn new(node_id: i64) -> Self {
        Self {
            node_id: node_id & NODE_MAX,
            state: AtomicI64::new(0),
        }
    }

    /// Generate the next unique ID
    pub fn generate(&self) -> Snowflake {
        loop {
            let prev = self.state.load(Ordering::Acquire);
            let prev_millis = prev >> SEQUENCE_BITS;
            let prev_seq = prev & SEQUENCE_MASK;

            let now = Utc::now().timestamp_millis() - EPOCH_MILLIS;
            let (millis, seq) = if now > prev_millis {
                (now, 0)
            } else if prev_seq < SEQUENCE_MASK {
                (prev_millis, prev_seq + 1)
            } else {
                (prev_millis + 1, 0)
            };

            let next = (millis << SEQUENCE_BITS) | seq;
            if self
                .state
                .compare_exchange(prev, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Snowflake::from_parts(millis, self.node_id, seq);
            }
        }
    }

    /// The node id this generator stamps into IDs
    pub const fn node_id(&self) -> i64 {
        self.node_id
    }
}
