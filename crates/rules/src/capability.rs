//! Capability contracts for condition sources and record filters.
//!
//! Both capabilities may refuse: a source that cannot compute historical
//! activity for its configuration, or a filter asked about a record that does
//! not carry the data it needs, returns [`CapabilityError::Unsupported`]
//! instead of guessing. The preview engine converts every capability error
//! into an unavailable preview at the point of use — nothing unwinds across
//! abstraction boundaries.

use thiserror::Error;
use vigil_core::{ActivityRecord, TimeWindow};

/// Why a capability call did not produce a value.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The capability cannot compute this. Expected and non-fatal — e.g. a
    /// condition type with no historical-activity backend yet.
    #[error("not supported: {0}")]
    Unsupported(String),

    /// The spec's free-form parameters did not deserialize into the
    /// capability's configuration.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

pub type CapabilityResult<T> = Result<T, CapabilityError>;

// ── Condition source ────────────────────────────────────────────────

/// Produces historical trigger-worthy activity for one condition type.
pub trait ActivitySource: Send + Sync {
    /// Identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Historical activity within `window`, capped at `limit` records.
    ///
    /// Must be deterministic for a fixed window. When more than `limit`
    /// records exist, implementations keep the *latest* ones — the debounce
    /// scan needs the most temporally relevant tail — and return them in
    /// ascending timestamp order.
    fn get_activity(
        &self,
        window: &TimeWindow,
        limit: usize,
    ) -> CapabilityResult<Vec<ActivityRecord>>;
}

// ── Record filter ───────────────────────────────────────────────────

/// Secondary predicate narrowing which activity records count toward firing.
pub trait RecordFilter: Send + Sync {
    /// Identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Whether `record` should count. Returns `Unsupported` when the record's
    /// kind does not carry the data this filter needs.
    fn passes_activity(&self, record: &ActivityRecord) -> CapabilityResult<bool>;
}
