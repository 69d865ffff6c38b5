//! Condition: every event on a group.
//!
//! Live evaluation fires this on each incoming event, but raw event history
//! is not retained per group, so there is no historical activity to replay.
//! The condition stays registered and reports itself unsupported, which
//! surfaces the whole preview as unavailable.

use vigil_core::{ActivityRecord, TimeWindow};

use crate::capability::{ActivitySource, CapabilityError, CapabilityResult};

pub struct EveryEventCondition;

impl EveryEventCondition {
    pub const ID: &'static str = "every_event";
}

impl ActivitySource for EveryEventCondition {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn get_activity(
        &self,
        _window: &TimeWindow,
        _limit: usize,
    ) -> CapabilityResult<Vec<ActivityRecord>> {
        Err(CapabilityError::Unsupported(
            "every_event has no historical activity backend".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn activity_retrieval_is_unsupported() {
        let t0 = Utc.timestamp_opt(0, 0).unwrap();
        let window = TimeWindow::new(t0, t0);
        let result = EveryEventCondition.get_activity(&window, 100);
        assert!(matches!(result, Err(CapabilityError::Unsupported(_))));
    }
}
