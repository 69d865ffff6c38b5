//! String-keyed capability registry.
//!
//! Maps condition and filter identifiers to factory closures that build a
//! capability instance from a spec's free-form parameters. Lookup of an
//! unknown identifier returns `None`; the engine surfaces that as an
//! unavailable preview rather than an error. Registration and discovery
//! beyond [`with_builtins`](CapabilityRegistry::with_builtins) are the
//! caller's concern.

use std::collections::HashMap;
use std::sync::Arc;

use crate::capability::{ActivitySource, CapabilityResult, RecordFilter};
use crate::conditions::{
    EveryEventCondition, FirstSeenEventCondition, ReappearedEventCondition,
    RegressionEventCondition,
};
use crate::filters::{AgeComparisonFilter, IssueOccurrencesFilter, LevelFilter};
use crate::schema::{ConditionSpec, FilterSpec};
use crate::store::ActivityLog;

pub type ConditionFactory =
    Box<dyn Fn(&ConditionSpec) -> CapabilityResult<Box<dyn ActivitySource>> + Send + Sync>;
pub type FilterFactory =
    Box<dyn Fn(&FilterSpec) -> CapabilityResult<Box<dyn RecordFilter>> + Send + Sync>;

#[derive(Default)]
pub struct CapabilityRegistry {
    conditions: HashMap<String, ConditionFactory>,
    filters: HashMap<String, FilterFactory>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in condition and filter set, backed by `log`.
    pub fn with_builtins(log: Arc<ActivityLog>) -> Self {
        let mut registry = Self::new();

        let first_seen = log.clone();
        registry.register_condition(
            FirstSeenEventCondition::ID,
            Box::new(move |_spec| {
                let source: Box<dyn ActivitySource> =
                    Box::new(FirstSeenEventCondition::new(first_seen.clone()));
                Ok(source)
            }),
        );

        let regression = log.clone();
        registry.register_condition(
            RegressionEventCondition::ID,
            Box::new(move |_spec| {
                let source: Box<dyn ActivitySource> =
                    Box::new(RegressionEventCondition::new(regression.clone()));
                Ok(source)
            }),
        );

        let reappeared = log;
        registry.register_condition(
            ReappearedEventCondition::ID,
            Box::new(move |_spec| {
                let source: Box<dyn ActivitySource> =
                    Box::new(ReappearedEventCondition::new(reappeared.clone()));
                Ok(source)
            }),
        );

        registry.register_condition(
            EveryEventCondition::ID,
            Box::new(|_spec| {
                let source: Box<dyn ActivitySource> = Box::new(EveryEventCondition);
                Ok(source)
            }),
        );

        registry.register_filter(
            AgeComparisonFilter::ID,
            Box::new(|spec| {
                let filter: Box<dyn RecordFilter> = Box::new(AgeComparisonFilter::from_spec(spec)?);
                Ok(filter)
            }),
        );

        registry.register_filter(
            IssueOccurrencesFilter::ID,
            Box::new(|spec| {
                let filter: Box<dyn RecordFilter> =
                    Box::new(IssueOccurrencesFilter::from_spec(spec)?);
                Ok(filter)
            }),
        );

        registry.register_filter(
            LevelFilter::ID,
            Box::new(|spec| {
                let filter: Box<dyn RecordFilter> = Box::new(LevelFilter::from_spec(spec)?);
                Ok(filter)
            }),
        );

        registry
    }

    pub fn register_condition(&mut self, id: impl Into<String>, factory: ConditionFactory) {
        self.conditions.insert(id.into(), factory);
    }

    pub fn register_filter(&mut self, id: impl Into<String>, factory: FilterFactory) {
        self.filters.insert(id.into(), factory);
    }

    /// Build the condition source a spec references. `None` for unknown ids.
    pub fn condition(&self, spec: &ConditionSpec) -> Option<CapabilityResult<Box<dyn ActivitySource>>> {
        self.conditions.get(&spec.id).map(|factory| factory(spec))
    }

    /// Build the filter a spec references. `None` for unknown ids.
    pub fn filter(&self, spec: &FilterSpec) -> Option<CapabilityResult<Box<dyn RecordFilter>>> {
        self.filters.get(&spec.id).map(|factory| factory(spec))
    }
}

// ── Tests ───────────────────────────────────────────────────────────
