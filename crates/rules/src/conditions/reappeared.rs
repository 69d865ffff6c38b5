//! Condition: an ignored group reappears.

use std::sync::Arc;

use vigil_core::{ActivityKind, ActivityRecord, TimeWindow};

use crate::capability::{ActivitySource, CapabilityResult};
use crate::store::ActivityLog;

pub struct ReappearedEventCondition {
    log: Arc<ActivityLog>,
}

impl ReappearedEventCondition {
    pub const ID: &'static str = "reappeared_event";

    pub fn new(log: Arc<ActivityLog>) -> Self {
        Self { log }
    }
}

impl ActivitySource for ReappearedEventCondition {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn get_activity(
        &self,
        window: &TimeWindow,
        limit: usize,
    ) -> CapabilityResult<Vec<ActivityRecord>> {
        Ok(self.log.rows_in(ActivityKind::Reappeared, window, limit))
    }
}
