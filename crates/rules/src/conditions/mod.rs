//! Built-in condition sources.
//!
//! Each condition type owns its own retrieval: first-seen activity comes from
//! the group catalog, regression and reappearance from event rows. The
//! `every_event` condition exists in the registry but has no historical
//! backend and reports itself unsupported.

mod every_event;
mod first_seen;
mod reappeared;
mod regression;

pub use every_event::EveryEventCondition;
pub use first_seen::FirstSeenEventCondition;
pub use reappeared::ReappearedEventCondition;
pub use regression::RegressionEventCondition;
