//! Credit card reward aggregation.
//!
//! Loads a table of reward rates per card and category, then answers two questions over it:
//! which of a handful of selected cards wins each category, and how much every card returns
//! for a given monthly spending profile.

pub mod config;
pub mod error;
pub mod rewards;
pub mod telemetry;
