//! vigil-preview — dry-run a candidate alert rule against historical activity.
//!
//! Loads a rule definition YAML and an activity fixture JSON, validates the
//! rule, runs the preview engine over the look-back window, and prints which
//! groups would have fired. Nothing is dispatched.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vigil_core::{config, PreviewConfig};
use vigil_rules::preview::{PreviewEngine, PreviewOutcome};
use vigil_rules::registry::CapabilityRegistry;
use vigil_rules::schema::RuleDefinition;
use vigil_rules::store::ActivityLog;
use vigil_rules::validation;

// ── CLI ─────────────────────────────────────────────────────────────

/// Preview which groups a candidate alert rule would have fired on.
#[derive(Parser, Debug)]
#[command(name = "vigil-preview", version, about)]
struct Cli {
    /// Path to the rule definition YAML.
    #[arg(long)]
    rule: PathBuf,

    /// Path to the activity fixture JSON.
    #[arg(long)]
    activity: PathBuf,

    /// Preview "now" as RFC 3339; defaults to the current time.
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Look-back window length in days.
    #[arg(long, env = "VIGIL_PREVIEW_LOOKBACK_DAYS")]
    lookback_days: Option<i64>,

    /// Cap on records per condition source.
    #[arg(long, env = "VIGIL_PREVIEW_ACTIVITY_LIMIT")]
    limit: Option<usize>,
}

fn main() -> anyhow::Result<ExitCode> {
    config::load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let rule = RuleDefinition::load(&cli.rule)
        .with_context(|| format!("failed to load rule {}", cli.rule.display()))?;

    let report = validation::validate_rule(&rule);
    for warning in &report.warnings {
        eprintln!("warning [{}]: {}", warning.path, warning.message);
    }
    if !report.valid {
        for error in &report.errors {
            match &error.suggestion {
                Some(s) => eprintln!("error [{}]: {} ({})", error.path, error.message, s),
                None => eprintln!("error [{}]: {}", error.path, error.message),
            }
        }
        return Ok(ExitCode::from(2));
    }

    let log = ActivityLog::load_fixture(&cli.activity).with_context(|| {
        format!("failed to load activity fixture {}", cli.activity.display())
    })?;

    let mut preview_config = PreviewConfig::default();
    if let Some(days) = cli.lookback_days {
        preview_config.look_back_days = days;
    }
    if let Some(limit) = cli.limit {
        preview_config.activity_limit = limit;
    }

    let now = cli.now.unwrap_or_else(Utc::now);
    info!(
        %now,
        look_back_days = preview_config.look_back_days,
        activity_limit = preview_config.activity_limit,
        "running preview"
    );

    let registry = CapabilityRegistry::with_builtins(Arc::new(log));
    let engine = PreviewEngine::new(registry, preview_config);

    match engine.preview(&rule, now)? {
        PreviewOutcome::Matched(set) => {
            let mut ids: Vec<_> = set.into_iter().collect();
            ids.sort_unstable();
            println!("{} group(s) would have fired", ids.len());
            for id in ids {
                println!("{id}");
            }
            Ok(ExitCode::SUCCESS)
        }
        PreviewOutcome::Unavailable(reason) => {
            println!("preview unavailable: {reason}");
            Ok(ExitCode::from(3))
        }
    }
}
