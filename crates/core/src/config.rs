//! Preview engine configuration.
//!
//! The look-back window and per-condition activity cap are explicit
//! configuration handed to the engine constructor, so tests can run with
//! small caps instead of production values.

use std::env;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_i64(key: &str, default: i64) -> i64 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "unparseable env var, using default");
            default
        }),
        Err(_) => default,
    }
}

// ── Preview config ──────────────────────────────────────────────────

/// How far a preview looks back and how many records each condition source
/// may return.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Look-back window length in days, ending at invocation time.
    pub look_back_days: i64,
    /// Cap on records per condition source. Sources keep the latest records
    /// when truncating.
    pub activity_limit: usize,
}

impl PreviewConfig {
    /// Build config from environment variables (call [`load_dotenv`] first).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            look_back_days: env_i64("VIGIL_PREVIEW_LOOKBACK_DAYS", defaults.look_back_days),
            activity_limit: env_i64(
                "VIGIL_PREVIEW_ACTIVITY_LIMIT",
                defaults.activity_limit as i64,
            )
            .max(0) as usize,
        }
    }

    pub fn look_back(&self) -> Duration {
        Duration::days(self.look_back_days)
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            look_back_days: 14,
            activity_limit: 1000,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
