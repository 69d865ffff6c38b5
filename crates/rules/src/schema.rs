//! Rule definition schema with serde deserialization.
//!
//! A rule definition arrives as a list of condition specs and filter specs
//! (each an identifier plus free-form parameters), one match mode for each
//! list, and a minimum re-fire interval. Definitions are loadable from YAML
//! documents; the free-form parameters stay opaque JSON until a capability
//! factory deserializes them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vigil_core::VigilError;

// ── Condition / filter specs ────────────────────────────────────────

/// Reference to a condition capability: identifier plus free-form params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub id: String,
    /// Everything except `id`, captured for the capability factory.
    #[serde(flatten)]
    pub params: serde_json::Value,
}

impl ConditionSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: serde_json::json!({}),
        }
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }
}

/// Reference to a filter capability: identifier plus free-form params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub id: String,
    #[serde(flatten)]
    pub params: serde_json::Value,
}

impl FilterSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: serde_json::json!({}),
        }
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }
}

// ── Rule definition ─────────────────────────────────────────────────

/// A candidate alert rule to preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Trigger conditions. A preview needs at least one.
    pub conditions: Vec<ConditionSpec>,

    /// Secondary predicates narrowing which records count toward firing.
    #[serde(default)]
    pub filters: Vec<FilterSpec>,

    /// Combinator across condition presences ("all"/"any"/"none").
    #[serde(default = "default_match")]
    pub condition_match: String,

    /// Combinator across per-record filter results.
    #[serde(default = "default_match")]
    pub filter_match: String,

    /// Minimum minutes between two counted firings for the same group.
    #[serde(default = "default_frequency")]
    pub frequency_minutes: i64,
}

fn default_match() -> String {
    crate::matcher::MATCH_ALL.to_string()
}

fn default_frequency() -> i64 {
    30
}

impl RuleDefinition {
    /// Parse a rule definition from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, VigilError> {
        serde_yaml::from_str(yaml).map_err(|e| VigilError::Serialize(e.to_string()))
    }

    /// Load a rule definition from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VigilError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
