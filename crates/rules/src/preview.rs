//! Historical alert-rule preview: which groups would have fired.
//!
//! Replays the semantics of the live firing pipeline — condition evaluation,
//! match-policy combination, per-group re-fire debouncing — over a merged,
//! time-ordered stream of historical activity, without dispatching anything.
//!
//! One invocation is a single synchronous computation: resolve capabilities,
//! fetch and merge activity, then one forward scan with an invocation-scoped
//! debounce gate. Nothing partial is ever returned; if any capability signals
//! unsupported mid-scan the whole preview is unavailable.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::debug;

use vigil_core::{ActivityRecord, EntityId, PreviewConfig, TimeWindow};

use crate::capability::{ActivitySource, CapabilityError, RecordFilter};
use crate::matcher::{self, MatchFn};
use crate::registry::CapabilityRegistry;
use crate::schema::RuleDefinition;

/// Groups that would have fired at least once in the window.
pub type MatchedSet = HashSet<EntityId>;

// ── Outcome ─────────────────────────────────────────────────────────

/// Result of a preview that ran to a decision.
///
/// An empty [`Matched`](PreviewOutcome::Matched) set is a computed answer
/// ("no group would have fired"); [`Unavailable`](PreviewOutcome::Unavailable)
/// means the preview could not be evaluated at all. The two are never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    Matched(MatchedSet),
    Unavailable(UnavailableReason),
}

impl PreviewOutcome {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PreviewOutcome::Unavailable(_))
    }

    pub fn matched(&self) -> Option<&MatchedSet> {
        match self {
            PreviewOutcome::Matched(set) => Some(set),
            PreviewOutcome::Unavailable(_) => None,
        }
    }
}

/// Why a preview could not be computed. Expected, non-fatal outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// A preview without at least one condition cannot be evaluated.
    NoConditions,
    UnknownCondition(String),
    UnknownFilter(String),
    UnknownMatchPolicy(String),
    /// A condition source cannot compute historical activity.
    ActivityUnsupported { condition: String },
    /// A filter cannot evaluate one of the merged records.
    FilterUnsupported { filter: String },
    /// A capability rejected its spec parameters.
    CapabilityFailed { id: String, message: String },
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::NoConditions => {
                write!(f, "a preview needs at least one condition")
            }
            UnavailableReason::UnknownCondition(id) => {
                write!(f, "unknown condition '{id}'")
            }
            UnavailableReason::UnknownFilter(id) => write!(f, "unknown filter '{id}'"),
            UnavailableReason::UnknownMatchPolicy(name) => {
                write!(f, "unknown match policy '{name}'")
            }
            UnavailableReason::ActivityUnsupported { condition } => {
                write!(f, "condition '{condition}' does not support historical activity")
            }
            UnavailableReason::FilterUnsupported { filter } => {
                write!(f, "filter '{filter}' cannot evaluate historical activity")
            }
            UnavailableReason::CapabilityFailed { id, message } => {
                write!(f, "capability '{id}' failed: {message}")
            }
        }
    }
}

/// Fatal misuse of the engine; rejected instead of misbehaving.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreviewError {
    #[error("frequency must be non-negative, got {0} minutes")]
    NegativeFrequency(i64),
}

// ── Debounce gate ───────────────────────────────────────────────────

/// Per-group re-fire gate, scoped to one preview invocation.
///
/// A group that has never fired is eligible immediately. A passing record
/// counts as a firing iff at least `frequency` has elapsed since the group's
/// last counted firing — spacing exactly equal to `frequency` fires (the
/// comparison is boundary-inclusive). Suppressed records do not move the
/// last-fire mark.
#[derive(Debug)]
pub struct DebounceGate {
    frequency: Duration,
    last_fire: HashMap<EntityId, DateTime<Utc>>,
}

impl DebounceGate {
    pub fn new(frequency: Duration) -> Self {
        Self {
            frequency,
            last_fire: HashMap::new(),
        }
    }

    /// Whether a passing record at `timestamp` counts as a firing for
    /// `entity`. Advances the last-fire mark when it does.
    pub fn try_fire(&mut self, entity: EntityId, timestamp: DateTime<Utc>) -> bool {
        let eligible_after = timestamp - self.frequency;
        let last = self
            .last_fire
            .get(&entity)
            .copied()
            .unwrap_or(eligible_after);
        if last <= eligible_after {
            self.last_fire.insert(entity, timestamp);
            true
        } else {
            false
        }
    }
}

// ── Preview engine ──────────────────────────────────────────────────

/// Orchestrates one preview: validate rule shape, resolve capabilities,
/// fetch and merge activity, run the filter-and-fire scan.
pub struct PreviewEngine {
    registry: CapabilityRegistry,
    config: PreviewConfig,
}

impl PreviewEngine {
    pub fn new(registry: CapabilityRegistry, config: PreviewConfig) -> Self {
        Self { registry, config }
    }

    /// Simulate `rule` over the look-back window ending at `now`.
    pub fn preview(
        &self,
        rule: &RuleDefinition,
        now: DateTime<Utc>,
    ) -> Result<PreviewOutcome, PreviewError> {
        if rule.frequency_minutes < 0 {
            return Err(PreviewError::NegativeFrequency(rule.frequency_minutes));
        }

        if rule.conditions.is_empty() {
            return Ok(PreviewOutcome::Unavailable(UnavailableReason::NoConditions));
        }

        // The supported condition kinds are mutually exclusive instants of
        // group history, so requiring all of several to hold at once is
        // unsatisfiable: a deterministic empty answer, not a capability gap.
        if rule.conditions.len() > 1 && rule.condition_match == matcher::MATCH_ALL {
            debug!(
                conditions = rule.conditions.len(),
                "mutually exclusive conditions under 'all' can never fire together"
            );
            return Ok(PreviewOutcome::Matched(MatchedSet::new()));
        }

        // Resolve every capability before fetching any activity.
        let sources = match self.resolve_conditions(rule) {
            Ok(sources) => sources,
            Err(reason) => return Ok(PreviewOutcome::Unavailable(reason)),
        };
        let filters = match self.resolve_filters(rule) {
            Ok(filters) => filters,
            Err(reason) => return Ok(PreviewOutcome::Unavailable(reason)),
        };
        let Some(filter_match) = matcher::get_match_function(&rule.filter_match) else {
            debug!(filter_match = %rule.filter_match, "unresolvable filter match policy");
            return Ok(PreviewOutcome::Unavailable(UnavailableReason::UnknownMatchPolicy(
                rule.filter_match.clone(),
            )));
        };

        let window = TimeWindow::ending_at(now, self.config.look_back());
        let activity = match self.fetch_activity(&sources, &window) {
            Ok(activity) => activity,
            Err(reason) => return Ok(PreviewOutcome::Unavailable(reason)),
        };

        match scan(
            &activity,
            &filters,
            filter_match,
            Duration::minutes(rule.frequency_minutes),
        ) {
            Ok(matched) => Ok(PreviewOutcome::Matched(matched)),
            Err(reason) => Ok(PreviewOutcome::Unavailable(reason)),
        }
    }

    fn resolve_conditions(
        &self,
        rule: &RuleDefinition,
    ) -> Result<Vec<(String, Box<dyn ActivitySource>)>, UnavailableReason> {
        let mut sources = Vec::with_capacity(rule.conditions.len());
        for spec in &rule.conditions {
            match self.registry.condition(spec) {
                None => {
                    debug!(condition = %spec.id, "unknown condition id");
                    return Err(UnavailableReason::UnknownCondition(spec.id.clone()));
                }
                Some(Err(err)) => return Err(capability_failure(&spec.id, err)),
                Some(Ok(source)) => sources.push((spec.id.clone(), source)),
            }
        }
        Ok(sources)
    }

    fn resolve_filters(
        &self,
        rule: &RuleDefinition,
    ) -> Result<Vec<(String, Box<dyn RecordFilter>)>, UnavailableReason> {
        let mut filters = Vec::with_capacity(rule.filters.len());
        for spec in &rule.filters {
            match self.registry.filter(spec) {
                None => {
                    debug!(filter = %spec.id, "unknown filter id");
                    return Err(UnavailableReason::UnknownFilter(spec.id.clone()));
                }
                Some(Err(err)) => return Err(capability_failure(&spec.id, err)),
                Some(Ok(filter)) => filters.push((spec.id.clone(), filter)),
            }
        }
        Ok(filters)
    }

    /// Pull activity from every source and merge into one ascending,
    /// stably-ordered sequence — the backbone for the debounce scan.
    fn fetch_activity(
        &self,
        sources: &[(String, Box<dyn ActivitySource>)],
        window: &TimeWindow,
    ) -> Result<Vec<ActivityRecord>, UnavailableReason> {
        let mut activity: Vec<ActivityRecord> = Vec::new();
        for (id, source) in sources {
            match source.get_activity(window, self.config.activity_limit) {
                Ok(records) => activity.extend(records),
                Err(CapabilityError::Unsupported(detail)) => {
                    debug!(condition = %id, %detail, "activity retrieval unsupported");
                    return Err(UnavailableReason::ActivityUnsupported {
                        condition: id.clone(),
                    });
                }
                Err(err @ CapabilityError::InvalidParams(_)) => {
                    return Err(capability_failure(id, err))
                }
            }
        }

        // Stable: records at the same instant keep per-source arrival order.
        activity.sort_by_key(|record| record.timestamp);
        Ok(activity)
    }
}

fn capability_failure(id: &str, err: CapabilityError) -> UnavailableReason {
    debug!(capability = %id, error = %err, "capability failed to build");
    UnavailableReason::CapabilityFailed {
        id: id.to_string(),
        message: err.to_string(),
    }
}

/// Single forward pass over the merged activity: reduce filters per record,
/// gate per group, collect groups that fired at least once.
fn scan(
    activity: &[ActivityRecord],
    filters: &[(String, Box<dyn RecordFilter>)],
    filter_match: MatchFn,
    frequency: Duration,
) -> Result<MatchedSet, UnavailableReason> {
    let mut gate = DebounceGate::new(frequency);
    let mut matched = MatchedSet::new();
    let mut results = Vec::with_capacity(filters.len());

    for record in activity {
        results.clear();
        for (id, filter) in filters {
            match filter.passes_activity(record) {
                Ok(passes) => results.push(passes),
                Err(CapabilityError::Unsupported(detail)) => {
                    debug!(filter = %id, %detail, "filter cannot evaluate record");
                    return Err(UnavailableReason::FilterUnsupported { filter: id.clone() });
                }
                Err(err @ CapabilityError::InvalidParams(_)) => {
                    return Err(capability_failure(id, err))
                }
            }
        }

        // An empty filter list passes every record, whatever the combinator.
        let passes = filters.is_empty() || filter_match(&results);
        if !passes {
            continue;
        }

        if gate.try_fire(record.entity_id, record.timestamp) {
            matched.insert(record.entity_id);
        } else {
            debug!(
                entity_id = record.entity_id,
                timestamp = %record.timestamp,
                "firing suppressed inside re-fire interval"
            );
        }
    }

    Ok(matched)
}

// ── Tests ───────────────────────────────────────────────────────────
