//! Value objects - immutable types that represent domain concepts

mod snowflake;
mod user_id;

pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use user_id::UserId;
