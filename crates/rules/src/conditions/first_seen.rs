//! Condition: a group is seen for the first time.
//!
//! First-seen activity is synthesized from the log's group catalog rather
//! than stored as event rows — each group contributes at most one record, at
//! the instant it first appeared.

use std::sync::Arc;

use vigil_core::{ActivityRecord, TimeWindow};

use crate::capability::{ActivitySource, CapabilityResult};
use crate::store::ActivityLog;

pub struct FirstSeenEventCondition {
    log: Arc<ActivityLog>,
}

impl FirstSeenEventCondition {
    pub const ID: &'static str = "first_seen_event";

    pub fn new(log: Arc<ActivityLog>) -> Self {
        Self { log }
    }
}

impl ActivitySource for FirstSeenEventCondition {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn get_activity(
        &self,
        window: &TimeWindow,
        limit: usize,
    ) -> CapabilityResult<Vec<ActivityRecord>> {
        Ok(self.log.first_seen_in(window, limit))
    }
}
