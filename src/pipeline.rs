use indicatif::ProgressBar;
use tracing::info;

use crate::consolidate::consolidate;
use crate::error::PipelineError;
use crate::fetch;
use crate::model::LegislativeMatter;
use crate::settings::Settings;

/// fetch (concurrent, per-page isolation) → consolidate (dedup + canonical sort).
pub async fn run(
    client: &reqwest::Client,
    settings: &Settings,
    pb: ProgressBar,
) -> Result<Vec<LegislativeMatter>, PipelineError> {
    let base = settings
        .base()
        .map_err(|e| PipelineError::Internal(format!("{:#}", e)))?;
    let outcome = fetch::fetch_all(client, &settings.sources, &base, pb).await;
    let stats = &outcome.stats;
    info!(
        "Fetched {} pages ({} ok, {} errors, {} records)",
        stats.total, stats.ok, stats.errors, stats.records
    );

    tokio::task::spawn_blocking(move || consolidate(outcome.pages))
        .await
        .map_err(|e| PipelineError::Internal(e.to_string()))?
}

// ── Tests ──
