//! Historical activity primitives shared across the workspace.
//!
//! An [`ActivityRecord`] is the atomic unit of historical signal: one
//! monitored entity (a group) did something trigger-worthy at some instant.
//! Records are immutable once produced — the preview engine only reorders
//! and filters them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a monitored entity (group).
pub type EntityId = u64;

// ── Activity kind ───────────────────────────────────────────────────

/// Discriminator identifying which condition kind produced a record.
///
/// Diagnostic only; matching never consults it. The supported kinds are
/// mutually exclusive: a single instant of group history is exactly one of
/// these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// The group was seen for the first time.
    FirstSeen,
    /// A resolved group regressed back to unresolved.
    Regression,
    /// An ignored group reappeared.
    Reappeared,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::FirstSeen => write!(f, "first_seen"),
            ActivityKind::Regression => write!(f, "regression"),
            ActivityKind::Reappeared => write!(f, "reappeared"),
        }
    }
}

// ── Activity record ─────────────────────────────────────────────────

/// One unit of historical activity for a monitored entity.
///
/// Total order is by `timestamp`; ties keep insertion order (callers sort
/// with a stable sort). `payload` is condition-specific data consumed only
/// by filters that understand it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub entity_id: EntityId,
    pub timestamp: DateTime<Utc>,
    pub kind: ActivityKind,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ActivityRecord {
    pub fn new(entity_id: EntityId, timestamp: DateTime<Utc>, kind: ActivityKind) -> Self {
        Self {
            entity_id,
            timestamp,
            kind,
            payload: serde_json::Value::Null,
        }
    }

    /// Attach a condition-specific payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ── Time window ─────────────────────────────────────────────────────

/// Inclusive `[start, end]` window a preview looks back over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window ending at `end` and reaching `look_back` into the past.
    pub fn ending_at(end: DateTime<Utc>, look_back: chrono::Duration) -> Self {
        Self {
            start: end - look_back,
            end,
        }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

// ── Tests ───────────────────────────────────────────────────────────
