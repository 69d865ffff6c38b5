//! Condition: a resolved group regresses back to unresolved.

use std::sync::Arc;

use vigil_core::{ActivityKind, ActivityRecord, TimeWindow};

use crate::capability::{ActivitySource, CapabilityResult};
use crate::store::ActivityLog;

pub struct RegressionEventCondition {
    log: Arc<ActivityLog>,
}

impl RegressionEventCondition {
    pub const ID: &'static str = "regression_event";

    pub fn new(log: Arc<ActivityLog>) -> Self {
        Self { log }
    }
}

impl ActivitySource for RegressionEventCondition {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn get_activity(
        &self,
        window: &TimeWindow,
        limit: usize,
    ) -> CapabilityResult<Vec<ActivityRecord>> {
        Ok(self.log.rows_in(ActivityKind::Regression, window, limit))
    }
}
