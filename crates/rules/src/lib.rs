//! Historical alert-rule preview engine.
//!
//! Given a candidate alert rule (trigger conditions, filters, match modes,
//! minimum re-fire interval), simulates over a fixed look-back window which
//! monitored groups would have fired — without dispatching any notification.
//!
//! This crate provides:
//! - serde rule definition schema with YAML document loading
//! - boundary validation with structured errors and suggestions
//! - `ActivitySource` / `RecordFilter` capability traits with a string-keyed
//!   registry and the built-in condition/filter set
//! - the merge + debounce [`preview::PreviewEngine`]

pub mod capability;
pub mod conditions;
pub mod filters;
pub mod matcher;
pub mod preview;
pub mod registry;
pub mod schema;
pub mod store;
pub mod validation;
