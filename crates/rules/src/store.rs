//! In-memory historical activity backend for the built-in condition sources.
//!
//! Holds two shapes of history: a first-seen catalog (one entry per group,
//! recorded when the group first appears) and append-ordered event rows
//! (regressions, reappearances). Thread-safe via `std::sync::RwLock` so the
//! same log can back sources resolved on different threads.
//!
//! Reads are window-filtered and capped: when more rows match than the cap
//! allows, the *latest* rows are kept, in ascending timestamp order.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::{ActivityKind, ActivityRecord, EntityId, TimeWindow, VigilError};

// ── Fixture documents ───────────────────────────────────────────────

/// First-seen catalog entry for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstSeenEntry {
    pub entity_id: EntityId,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// JSON document describing a log's full contents, for the CLI and tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityFixture {
    #[serde(default)]
    pub first_seen: Vec<FirstSeenEntry>,
    #[serde(default)]
    pub events: Vec<ActivityRecord>,
}

// ── Activity log ────────────────────────────────────────────────────

#[derive(Default)]
struct LogInner {
    first_seen: HashMap<EntityId, FirstSeenEntry>,
    /// Event rows in insertion order. Queries sort stably, so rows recorded
    /// at the same instant keep this order.
    rows: Vec<ActivityRecord>,
}

/// In-memory activity log backing the built-in condition sources.
#[derive(Default)]
pub struct ActivityLog {
    inner: RwLock<LogInner>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from a fixture document.
    pub fn from_fixture(fixture: ActivityFixture) -> Self {
        let log = Self::new();
        for entry in fixture.first_seen {
            log.record_first_seen(entry.entity_id, entry.timestamp, entry.payload);
        }
        for record in fixture.events {
            log.record(record);
        }
        log
    }

    /// Load a JSON fixture file into a fresh log.
    pub fn load_fixture(path: impl AsRef<Path>) -> Result<Self, VigilError> {
        let json = fs::read_to_string(path)?;
        let fixture: ActivityFixture =
            serde_json::from_str(&json).map_err(|e| VigilError::Serialize(e.to_string()))?;
        Ok(Self::from_fixture(fixture))
    }

    /// Record when a group was first seen. Later calls for the same group
    /// overwrite the entry.
    pub fn record_first_seen(
        &self,
        entity_id: EntityId,
        timestamp: DateTime<Utc>,
        payload: serde_json::Value,
    ) {
        let mut guard = self.inner.write().expect("activity log lock poisoned");
        guard.first_seen.insert(
            entity_id,
            FirstSeenEntry {
                entity_id,
                timestamp,
                payload,
            },
        );
    }

    /// Append an event row.
    pub fn record(&self, record: ActivityRecord) {
        let mut guard = self.inner.write().expect("activity log lock poisoned");
        guard.rows.push(record);
    }

    /// Event rows of `kind` within `window`, ascending by timestamp, keeping
    /// the latest `limit` when more match.
    pub fn rows_in(
        &self,
        kind: ActivityKind,
        window: &TimeWindow,
        limit: usize,
    ) -> Vec<ActivityRecord> {
        let guard = self.inner.read().expect("activity log lock poisoned");
        let mut matching: Vec<ActivityRecord> = guard
            .rows
            .iter()
            .filter(|r| r.kind == kind && window.contains(r.timestamp))
            .cloned()
            .collect();
        drop(guard);

        matching.sort_by_key(|r| r.timestamp);
        truncate_to_latest(matching, limit)
    }

    /// First-seen activity within `window`, synthesized from the catalog as
    /// [`ActivityKind::FirstSeen`] records. Same ordering and truncation
    /// contract as [`rows_in`](Self::rows_in).
    pub fn first_seen_in(&self, window: &TimeWindow, limit: usize) -> Vec<ActivityRecord> {
        let guard = self.inner.read().expect("activity log lock poisoned");
        let mut matching: Vec<ActivityRecord> = guard
            .first_seen
            .values()
            .filter(|e| window.contains(e.timestamp))
            .map(|e| {
                ActivityRecord::new(e.entity_id, e.timestamp, ActivityKind::FirstSeen)
                    .with_payload(e.payload.clone())
            })
            .collect();
        drop(guard);

        // Catalog iteration order is arbitrary; entity id breaks timestamp
        // ties so reads stay deterministic.
        matching.sort_by_key(|r| (r.timestamp, r.entity_id));
        truncate_to_latest(matching, limit)
    }
}

/// Keep the last `limit` elements of an ascending-sorted vec.
fn truncate_to_latest(mut records: Vec<ActivityRecord>, limit: usize) -> Vec<ActivityRecord> {
    if records.len() > limit {
        records.split_off(records.len() - limit)
    } else {
        records
    }
}

// ── Tests ───────────────────────────────────────────────────────────
