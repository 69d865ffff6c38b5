//! End-to-end preview scenarios over the built-in registry and an in-memory
//! activity log.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use vigil_core::{ActivityKind, ActivityRecord, EntityId, PreviewConfig};
use vigil_rules::preview::{MatchedSet, PreviewEngine, PreviewOutcome, UnavailableReason};
use vigil_rules::registry::CapabilityRegistry;
use vigil_rules::schema::RuleDefinition;
use vigil_rules::store::{ActivityFixture, ActivityLog};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

fn minutes(m: i64) -> DateTime<Utc> {
    base() + Duration::minutes(m)
}

fn engine_over(log: ActivityLog) -> PreviewEngine {
    PreviewEngine::new(
        CapabilityRegistry::with_builtins(Arc::new(log)),
        PreviewConfig::default(),
    )
}

fn rule_yaml(yaml: &str) -> RuleDefinition {
    RuleDefinition::from_yaml_str(yaml).unwrap()
}

fn matched(outcome: PreviewOutcome) -> MatchedSet {
    match outcome {
        PreviewOutcome::Matched(set) => set,
        PreviewOutcome::Unavailable(reason) => panic!("unexpectedly unavailable: {reason}"),
    }
}

// ── Canonical scenarios ─────────────────────────────────────────────

#[test]
fn first_seen_twice_within_frequency_fires_once() {
    // Entity 1 appears at t=0; a regression for the same entity lands at
    // t=30min. With frequency=60 only the first occurrence counts, but the
    // entity is still in the matched set.
    let log = ActivityLog::new();
    log.record_first_seen(1, minutes(0), serde_json::Value::Null);
    log.record(ActivityRecord::new(1, minutes(30), ActivityKind::Regression));

    let rule = rule_yaml(
        r#"
conditions:
  - id: first_seen_event
  - id: regression_event
condition_match: any
filter_match: any
frequency_minutes: 60
"#,
    );

    let set = matched(engine_over(log).preview(&rule, minutes(45)).unwrap());
    assert_eq!(set, MatchedSet::from([1]));
}

#[test]
fn all_of_two_mutually_exclusive_conditions_is_empty() {
    let log = ActivityLog::new();
    log.record_first_seen(1, minutes(0), serde_json::Value::Null);
    log.record(ActivityRecord::new(1, minutes(0), ActivityKind::Regression));

    let rule = rule_yaml(
        r#"
conditions:
  - id: first_seen_event
  - id: regression_event
condition_match: all
frequency_minutes: 60
"#,
    );

    let outcome = engine_over(log).preview(&rule, minutes(45)).unwrap();
    assert_eq!(outcome, PreviewOutcome::Matched(MatchedSet::new()));
}

#[test]
fn zero_conditions_is_unavailable() {
    let rule = rule_yaml("conditions: []");
    let outcome = engine_over(ActivityLog::new()).preview(&rule, base()).unwrap();
    assert_eq!(
        outcome,
        PreviewOutcome::Unavailable(UnavailableReason::NoConditions)
    );
}

#[test]
fn unknown_filter_id_is_unavailable_despite_matching_conditions() {
    let log = ActivityLog::new();
    log.record_first_seen(1, minutes(0), serde_json::Value::Null);

    let rule = rule_yaml(
        r#"
conditions:
  - id: first_seen_event
filters:
  - id: assigned_to
    value: nobody
"#,
    );

    let outcome = engine_over(log).preview(&rule, minutes(10)).unwrap();
    assert_eq!(
        outcome,
        PreviewOutcome::Unavailable(UnavailableReason::UnknownFilter("assigned_to".to_string()))
    );
}

#[test]
fn every_event_condition_is_unavailable_despite_other_sources() {
    let log = ActivityLog::new();
    log.record_first_seen(1, minutes(0), serde_json::Value::Null);

    let rule = rule_yaml(
        r#"
conditions:
  - id: first_seen_event
  - id: every_event
condition_match: any
"#,
    );

    let outcome = engine_over(log).preview(&rule, minutes(10)).unwrap();
    assert_eq!(
        outcome,
        PreviewOutcome::Unavailable(UnavailableReason::ActivityUnsupported {
            condition: "every_event".to_string()
        })
    );
}

// ── Filters end to end ──────────────────────────────────────────────

#[test]
fn occurrences_filter_narrows_matches() {
    let log = ActivityLog::new();
    log.record(
        ActivityRecord::new(1, minutes(0), ActivityKind::Regression)
            .with_payload(serde_json::json!({"times_seen": 50})),
    );
    log.record(
        ActivityRecord::new(2, minutes(1), ActivityKind::Regression)
            .with_payload(serde_json::json!({"times_seen": 3})),
    );

    let rule = rule_yaml(
        r#"
conditions:
  - id: regression_event
filters:
  - id: issue_occurrences
    value: 10
filter_match: all
"#,
    );

    let set = matched(engine_over(log).preview(&rule, minutes(10)).unwrap());
    assert_eq!(set, MatchedSet::from([1]));
}

#[test]
fn filter_unsupported_for_one_record_aborts_everything() {
    // The second record carries no times_seen; the whole preview must come
    // back unavailable rather than a partial set containing entity 1.
    let log = ActivityLog::new();
    log.record(
        ActivityRecord::new(1, minutes(0), ActivityKind::Regression)
            .with_payload(serde_json::json!({"times_seen": 50})),
    );
    log.record(ActivityRecord::new(2, minutes(1), ActivityKind::Regression));

    let rule = rule_yaml(
        r#"
conditions:
  - id: regression_event
filters:
  - id: issue_occurrences
    value: 10
"#,
    );

    let outcome = engine_over(log).preview(&rule, minutes(10)).unwrap();
    assert_eq!(
        outcome,
        PreviewOutcome::Unavailable(UnavailableReason::FilterUnsupported {
            filter: "issue_occurrences".to_string()
        })
    );
}

#[test]
fn age_and_level_filters_combine_under_all() {
    let first_seen = minutes(-60 * 24 * 3); // three days before base
    let log = ActivityLog::new();
    log.record(
        ActivityRecord::new(1, minutes(0), ActivityKind::Regression).with_payload(
            serde_json::json!({"first_seen": first_seen.to_rfc3339(), "level": 40}),
        ),
    );
    log.record(
        ActivityRecord::new(2, minutes(1), ActivityKind::Regression).with_payload(
            serde_json::json!({"first_seen": first_seen.to_rfc3339(), "level": 10}),
        ),
    );

    let rule = rule_yaml(
        r#"
conditions:
  - id: regression_event
filters:
  - id: age_comparison
    comparison_type: older
    value: 1
    time: day
  - id: level
    match: gte
    level: 30
filter_match: all
"#,
    );

    let set = matched(engine_over(log).preview(&rule, minutes(10)).unwrap());
    assert_eq!(set, MatchedSet::from([1]));
}

// ── Window, truncation, determinism ─────────────────────────────────

#[test]
fn activity_older_than_the_window_is_invisible() {
    let log = ActivityLog::new();
    log.record_first_seen(1, base() - Duration::days(15), serde_json::Value::Null);
    log.record_first_seen(2, base() - Duration::days(3), serde_json::Value::Null);

    let rule = rule_yaml("conditions:\n  - id: first_seen_event\n");
    let set = matched(engine_over(log).preview(&rule, base()).unwrap());
    assert_eq!(set, MatchedSet::from([2]));
}

#[test]
fn small_activity_cap_keeps_the_latest_records() {
    let log = ActivityLog::new();
    for entity in 1..=5u64 {
        log.record(ActivityRecord::new(
            entity,
            minutes(entity as i64),
            ActivityKind::Regression,
        ));
    }

    let engine = PreviewEngine::new(
        CapabilityRegistry::with_builtins(Arc::new(log)),
        PreviewConfig {
            look_back_days: 14,
            activity_limit: 2,
        },
    );

    let rule = rule_yaml("conditions:\n  - id: regression_event\n");
    let set = matched(engine.preview(&rule, minutes(10)).unwrap());
    assert_eq!(set, MatchedSet::from([4, 5]));
}

#[test]
fn preview_is_idempotent_for_a_fixed_now() {
    let fixture: ActivityFixture = serde_json::from_str(
        r#"{
            "first_seen": [
                {"entity_id": 1, "timestamp": "2026-06-01T10:00:00Z"},
                {"entity_id": 2, "timestamp": "2026-06-01T11:00:00Z"}
            ],
            "events": [
                {"entity_id": 1, "timestamp": "2026-06-01T11:30:00Z", "kind": "regression"}
            ]
        }"#,
    )
    .unwrap();

    let engine = engine_over(ActivityLog::from_fixture(fixture));
    let rule = rule_yaml(
        r#"
conditions:
  - id: first_seen_event
  - id: regression_event
condition_match: any
frequency_minutes: 60
"#,
    );

    let first = engine.preview(&rule, base()).unwrap();
    let second = engine.preview(&rule, base()).unwrap();
    assert_eq!(first, second);
    assert_eq!(matched(first), MatchedSet::from([1, 2]));
}

#[test]
fn debounce_spans_activity_from_different_sources() {
    // first_seen at t=0 fires; a regression 30 minutes later for the same
    // entity is suppressed; another at t=60 fires again (same set either way,
    // but a third entity proves the scan kept going).
    let log = ActivityLog::new();
    log.record_first_seen(1, minutes(0), serde_json::Value::Null);
    log.record(ActivityRecord::new(1, minutes(30), ActivityKind::Regression));
    log.record(ActivityRecord::new(1, minutes(60), ActivityKind::Regression));
    log.record(ActivityRecord::new(3, minutes(61), ActivityKind::Regression));

    let rule = rule_yaml(
        r#"
conditions:
  - id: first_seen_event
  - id: regression_event
condition_match: any
frequency_minutes: 60
"#,
    );

    let set = matched(engine_over(log).preview(&rule, minutes(90)).unwrap());
    assert_eq!(set, MatchedSet::from([1, 3]));
}

#[test]
fn rule_and_fixture_files_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    let rule_path = dir.path().join("rule.yml");
    std::fs::write(
        &rule_path,
        "conditions:\n  - id: first_seen_event\nfrequency_minutes: 60\n",
    )
    .unwrap();

    let fixture_path = dir.path().join("activity.json");
    std::fs::write(
        &fixture_path,
        r#"{"first_seen": [{"entity_id": 8, "timestamp": "2026-06-01T11:00:00Z"}]}"#,
    )
    .unwrap();

    let rule = RuleDefinition::load(&rule_path).unwrap();
    let log = ActivityLog::load_fixture(&fixture_path).unwrap();

    let set = matched(engine_over(log).preview(&rule, base()).unwrap());
    assert_eq!(set, MatchedSet::from([8]));
}

#[test]
fn matched_set_entities_are_unique() {
    let log = ActivityLog::new();
    for i in 0..4 {
        log.record(ActivityRecord::new(
            9,
            minutes(i * 120),
            ActivityKind::Regression,
        ));
    }

    let rule = rule_yaml("conditions:\n  - id: regression_event\nfrequency_minutes: 60\n");
    let set = matched(engine_over(log).preview(&rule, minutes(600)).unwrap());
    assert_eq!(set.len(), 1);
    assert_eq!(set, MatchedSet::from([9 as EntityId]));
}
