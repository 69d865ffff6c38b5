//! Filter: event severity level.
//!
//! Levels are the numeric severity scale carried in event payloads
//! (debug=10 … fatal=50). Needs `level` in the record payload.

use serde::Deserialize;
use vigil_core::ActivityRecord;

use crate::capability::{CapabilityError, CapabilityResult, RecordFilter};
use crate::schema::FilterSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelMatch {
    Eq,
    Gte,
    Lte,
}

#[derive(Debug, Deserialize)]
struct LevelParams {
    #[serde(rename = "match")]
    match_type: LevelMatch,
    level: u64,
}

pub struct LevelFilter {
    match_type: LevelMatch,
    level: u64,
}

impl LevelFilter {
    pub const ID: &'static str = "level";

    pub fn from_spec(spec: &FilterSpec) -> CapabilityResult<Self> {
        let params: LevelParams = super::parse_params(&spec.params)?;
        Ok(Self {
            match_type: params.match_type,
            level: params.level,
        })
    }
}

impl RecordFilter for LevelFilter {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn passes_activity(&self, record: &ActivityRecord) -> CapabilityResult<bool> {
        let level = match record.payload.get("level").and_then(|v| v.as_u64()) {
            Some(level) => level,
            None => {
                return Err(CapabilityError::Unsupported(
                    "record payload carries no level".to_string(),
                ))
            }
        };

        Ok(match self.match_type {
            LevelMatch::Eq => level == self.level,
            LevelMatch::Gte => level >= self.level,
            LevelMatch::Lte => level <= self.level,
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vigil_core::ActivityKind;

    fn leveled(level: u64) -> ActivityRecord {
        ActivityRecord::new(
            1,
            Utc.timestamp_opt(0, 0).unwrap(),
            ActivityKind::Regression,
        )
        .with_payload(serde_json::json!({"level": level}))
    }

    fn filter(match_type: &str, level: u64) -> LevelFilter {
        let spec = FilterSpec::new(LevelFilter::ID)
            .with_params(serde_json::json!({"match": match_type, "level": level}));
        LevelFilter::from_spec(&spec).unwrap()
    }

    #[test]
    fn comparison_modes() {
        assert!(filter("eq", 30).passes_activity(&leveled(30)).unwrap());
        assert!(!filter("eq", 30).passes_activity(&leveled(40)).unwrap());
        assert!(filter("gte", 30).passes_activity(&leveled(40)).unwrap());
        assert!(!filter("gte", 30).passes_activity(&leveled(20)).unwrap());
        assert!(filter("lte", 30).passes_activity(&leveled(20)).unwrap());
        assert!(!filter("lte", 30).passes_activity(&leveled(40)).unwrap());
    }

    #[test]
    fn missing_level_is_unsupported() {
        let record =
            ActivityRecord::new(1, Utc.timestamp_opt(0, 0).unwrap(), ActivityKind::FirstSeen);
        assert!(matches!(
            filter("eq", 30).passes_activity(&record),
            Err(CapabilityError::Unsupported(_))
        ));
    }
}
