use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use tracing::{info, warn};
use url::Url;

use crate::model::LegislativeMatter;
use crate::parser;
use crate::settings::Settings;

/// Fetch stats returned after completion.
pub struct FetchStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
    pub records: usize,
}

/// Per-page records in source order, plus stats.
pub struct FetchOutcome {
    pub pages: Vec<Vec<LegislativeMatter>>,
    pub stats: FetchStats,
}

struct PageRow {
    index: usize,
    url: String,
    matters: Vec<LegislativeMatter>,
    error: Option<String>,
    latency_ms: u64,
}

pub fn client(settings: &Settings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch and extract every source page concurrently. A page that fails to
/// download contributes an empty record list; siblings are unaffected.
/// Returns once every page has finished.
pub async fn fetch_all(
    client: &reqwest::Client,
    sources: &[String],
    base: &Url,
    pb: ProgressBar,
) -> FetchOutcome {
    let total = sources.len();
    let base = Arc::new(base.clone());

    // Channel: workers send pages, main loop slots them by index
    let (tx, mut rx) = tokio::sync::mpsc::channel::<PageRow>(total.max(1));

    let mut handles = Vec::with_capacity(total);
    for (index, url) in sources.iter().cloned().enumerate() {
        let client = client.clone();
        let base = Arc::clone(&base);
        let tx = tx.clone();

        handles.push(tokio::spawn(async move {
            let row = fetch_one(&client, index, url, &base).await;
            let _ = tx.send(row).await;
        }));
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut pages: Vec<Vec<LegislativeMatter>> = vec![Vec::new(); total];
    let mut ok = 0usize;
    let mut errors = 0usize;
    let mut records = 0usize;

    while let Some(row) = rx.recv().await {
        match &row.error {
            Some(e) => {
                errors += 1;
                warn!(url = %row.url, latency_ms = row.latency_ms, "Page fetch failed: {}", e);
            }
            None => {
                ok += 1;
                info!(
                    url = %row.url,
                    records = row.matters.len(),
                    latency_ms = row.latency_ms,
                    "Fetched listing page"
                );
            }
        }
        records += row.matters.len();
        pages[row.index] = row.matters;
        pb.inc(1);
    }

    // A task that panicked never sent its row; its page stays empty.
    for handle in handles {
        if let Err(e) = handle.await {
            errors += 1;
            warn!("Page task aborted: {}", e);
        }
    }

    pb.finish_and_clear();

    FetchOutcome {
        pages,
        stats: FetchStats {
            total,
            ok,
            errors,
            records,
        },
    }
}

async fn fetch_one(client: &reqwest::Client, index: usize, url: String, base: &Url) -> PageRow {
    let start = Instant::now();
    let result = fetch_page(client, &url).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(html) => PageRow {
            index,
            matters: parser::process_page(&html, base),
            url,
            error: None,
            latency_ms,
        },
        Err(e) => PageRow {
            index,
            url,
            matters: Vec::new(),
            error: Some(format!("{:#}", e)),
            latency_ms,
        },
    }
}

/// Single GET attempt; non-success statuses are errors.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("Source page returned an error status: {}", url))?;
    response
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", url))
}
