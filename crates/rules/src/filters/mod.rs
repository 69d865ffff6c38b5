//! Built-in record filters.
//!
//! Filters read condition-specific payload fields; a record whose payload
//! lacks the field a filter needs is reported unsupported rather than
//! defaulted, so the preview never silently miscounts.

mod age_comparison;
mod issue_occurrences;
mod level;

pub use age_comparison::AgeComparisonFilter;
pub use issue_occurrences::IssueOccurrencesFilter;
pub use level::LevelFilter;

use serde::de::DeserializeOwned;

use crate::capability::{CapabilityError, CapabilityResult};

/// Deserialize a spec's free-form params into a filter's config type.
pub(crate) fn parse_params<T: DeserializeOwned>(params: &serde_json::Value) -> CapabilityResult<T> {
    serde_json::from_value(params.clone())
        .map_err(|e| CapabilityError::InvalidParams(e.to_string()))
}
