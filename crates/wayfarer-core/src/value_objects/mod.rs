//! Value objects - immutable types that represent domain concepts

mod capabilities;
mod counter;
mod page;
mod snowflake;

pub use capabilities::Capabilities;
pub use counter::{CounterDelta, CounterField};
pub use page::{PageMeta, PageRequest};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
