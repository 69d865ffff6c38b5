//! Boundary validation for rule definitions with structured errors.
//!
//! Callers validate before invoking the engine: blocking errors (malformed
//! values the engine refuses to guess about) are separated from advisory
//! warnings (shapes that evaluate to a deterministic but probably unintended
//! answer).

use serde::{Deserialize, Serialize};

use crate::matcher;
use crate::schema::RuleDefinition;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"filters[0].id"`.
    pub path: String,
    pub message: String,
    /// Optional "did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a parsed [`RuleDefinition`].
pub fn validate_rule(rule: &RuleDefinition) -> ValidationResult {
    let mut result = ValidationResult::new();
    validate_shape(rule, &mut result);
    validate_match_policies(rule, &mut result);
    result
}

/// Parse raw YAML and validate. Parse failures become a blocking error.
pub fn validate_yaml(yaml: &str) -> ValidationResult {
    match RuleDefinition::from_yaml_str(yaml) {
        Ok(rule) => validate_rule(&rule),
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error("", format!("YAML parse error: {e}"));
            result
        }
    }
}

// ── Shape validation ────────────────────────────────────────────────

fn validate_shape(rule: &RuleDefinition, result: &mut ValidationResult) {
    if rule.conditions.is_empty() {
        result.error(
            "conditions",
            "a rule needs at least one condition to preview",
        );
    }

    for (i, spec) in rule.conditions.iter().enumerate() {
        if spec.id.is_empty() {
            result.error(format!("conditions[{i}].id"), "condition id must not be empty");
        }
    }

    for (i, spec) in rule.filters.iter().enumerate() {
        if spec.id.is_empty() {
            result.error(format!("filters[{i}].id"), "filter id must not be empty");
        }
    }

    if rule.frequency_minutes < 0 {
        result.error(
            "frequency_minutes",
            format!(
                "frequency must be non-negative, got {}",
                rule.frequency_minutes
            ),
        );
    }
}

// ── Match-policy validation ─────────────────────────────────────────

fn validate_match_policies(rule: &RuleDefinition, result: &mut ValidationResult) {
    check_match_name("condition_match", &rule.condition_match, result);
    check_match_name("filter_match", &rule.filter_match, result);

    if rule.conditions.len() > 1 && rule.condition_match == matcher::MATCH_ALL {
        result.warn(
            "condition_match",
            "condition kinds are mutually exclusive; requiring all of several \
             conditions previews to an empty set",
        );
    }
}

fn check_match_name(path: &str, name: &str, result: &mut ValidationResult) {
    if matcher::get_match_function(name).is_some() {
        return;
    }

    let lowered = name.to_lowercase();
    if matcher::VALID_MATCHES.contains(&lowered.as_str()) {
        result.error_with_suggestion(
            path,
            format!("unknown match policy '{name}'"),
            format!("did you mean '{lowered}'?"),
        );
    } else {
        result.error_with_suggestion(
            path,
            format!("unknown match policy '{name}'"),
            format!("valid values: {}", matcher::VALID_MATCHES.join(", ")),
        );
    }
}

// ── Tests ───────────────────────────────────────────────────────────
