//! Filter: the group has been seen at least N times.
//!
//! Needs `times_seen` in the record payload.

use serde::Deserialize;
use vigil_core::ActivityRecord;

use crate::capability::{CapabilityError, CapabilityResult, RecordFilter};
use crate::schema::FilterSpec;

#[derive(Debug, Deserialize)]
struct IssueOccurrencesParams {
    value: u64,
}

pub struct IssueOccurrencesFilter {
    value: u64,
}

impl IssueOccurrencesFilter {
    pub const ID: &'static str = "issue_occurrences";

    pub fn from_spec(spec: &FilterSpec) -> CapabilityResult<Self> {
        let params: IssueOccurrencesParams = super::parse_params(&spec.params)?;
        Ok(Self {
            value: params.value,
        })
    }
}

impl RecordFilter for IssueOccurrencesFilter {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn passes_activity(&self, record: &ActivityRecord) -> CapabilityResult<bool> {
        match record.payload.get("times_seen").and_then(|v| v.as_u64()) {
            Some(times_seen) => Ok(times_seen >= self.value),
            None => Err(CapabilityError::Unsupported(
                "record payload carries no times_seen".to_string(),
            )),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
