//! Filter: group age at the time of the record.
//!
//! Compares how old the group was when the activity occurred (record
//! timestamp minus the group's first-seen instant) against a configured
//! span. Needs `first_seen` in the record payload.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use vigil_core::ActivityRecord;

use crate::capability::{CapabilityError, CapabilityResult, RecordFilter};
use crate::schema::FilterSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonType {
    Older,
    Newer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl TimeUnit {
    fn span(&self, value: i64) -> Duration {
        match self {
            TimeUnit::Minute => Duration::minutes(value),
            TimeUnit::Hour => Duration::hours(value),
            TimeUnit::Day => Duration::days(value),
            TimeUnit::Week => Duration::weeks(value),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AgeComparisonParams {
    comparison_type: ComparisonType,
    value: i64,
    time: TimeUnit,
}

pub struct AgeComparisonFilter {
    comparison: ComparisonType,
    span: Duration,
}

impl AgeComparisonFilter {
    pub const ID: &'static str = "age_comparison";

    pub fn from_spec(spec: &FilterSpec) -> CapabilityResult<Self> {
        let params: AgeComparisonParams = super::parse_params(&spec.params)?;
        Ok(Self {
            comparison: params.comparison_type,
            span: params.time.span(params.value),
        })
    }
}

impl RecordFilter for AgeComparisonFilter {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn passes_activity(&self, record: &ActivityRecord) -> CapabilityResult<bool> {
        let raw = record.payload.get("first_seen").and_then(|v| v.as_str());
        let first_seen = match raw {
            Some(s) => s
                .parse::<DateTime<Utc>>()
                .map_err(|e| CapabilityError::Unsupported(format!("unparseable first_seen: {e}")))?,
            None => {
                return Err(CapabilityError::Unsupported(
                    "record payload carries no first_seen".to_string(),
                ))
            }
        };

        let age = record.timestamp - first_seen;
        Ok(match self.comparison {
            ComparisonType::Older => age > self.span,
            ComparisonType::Newer => age < self.span,
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────────
