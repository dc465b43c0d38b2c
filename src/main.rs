mod consolidate;
mod error;
mod fetch;
mod model;
mod parser;
mod pipeline;
mod query;
mod server;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::model::{Category, LegislativeMatter};
use crate::query::{CategoryFilter, SortBy, ViewState};
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "legis_scraper",
    about = "Municipal legislative matters scraper and JSON API"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the consolidated dataset over HTTP
    Serve {
        /// Bind host (overrides LEGIS_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides LEGIS_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Scrape all source pages once and print the consolidated JSON
    Fetch {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Scrape, then filter/search/sort and print a table
    List {
        /// Category name or label ("All" clears); repeating a category toggles it off
        #[arg(short, long)]
        category: Vec<String>,
        /// Free-text search over id, summary, address, neighborhood, protocol
        #[arg(short = 'q', long = "query")]
        search: Option<String>,
        /// Sort key: date or id
        #[arg(short, long, default_value = "date")]
        sort: String,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Scrape and show the number of matters per category
    Stats,
    /// Extract records from a saved listing page (no network)
    Parse {
        /// Path to an HTML file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;

    let result = match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                settings.host = host;
            }
            if let Some(port) = port {
                settings.port = port;
            }
            let client = fetch::client(&settings)?;
            server::serve(settings, client).await
        }
        Commands::Fetch { pretty } => {
            let matters = scrape(&settings).await?;
            let json = if pretty {
                serde_json::to_string_pretty(&matters)?
            } else {
                serde_json::to_string(&matters)?
            };
            println!("{}", json);
            Ok(())
        }
        Commands::List {
            category,
            search,
            sort,
            limit,
        } => {
            let mut state = ViewState {
                search: search.unwrap_or_default(),
                sort_by: sort.parse::<SortBy>().map_err(anyhow::Error::msg)?,
                ..Default::default()
            };
            for c in &category {
                state.select(c.parse::<CategoryFilter>().map_err(anyhow::Error::msg)?);
            }
            let matters = scrape(&settings).await?;
            let view = query::view(&matters, &state);
            if view.is_empty() {
                println!("No matters match the current filters.");
                return Ok(());
            }
            print_table(&view, limit);
            println!("\n{} of {} matters", view.len().min(limit), matters.len());
            Ok(())
        }
        Commands::Stats => {
            let matters = scrape(&settings).await?;
            let counts = query::category_counts(&matters);
            for category in Category::ALL {
                println!(
                    "{:<28} {:>5}",
                    category.label(),
                    counts.get(&category).copied().unwrap_or(0)
                );
            }
            println!("{:<28} {:>5}", "Total", matters.len());
            Ok(())
        }
        Commands::Parse { file } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let matters = parser::process_page(&html, &settings.base()?);
            println!("{}", serde_json::to_string_pretty(&matters)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Run the pipeline with a progress bar; errors surface with their message.
async fn scrape(settings: &Settings) -> anyhow::Result<Vec<LegislativeMatter>> {
    let client = fetch::client(settings)?;
    let pb = ProgressBar::new(settings.sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages")?
            .progress_chars("=> "),
    );
    let matters = pipeline::run(&client, settings, pb).await?;
    Ok(matters)
}

fn print_table(view: &[&LegislativeMatter], limit: usize) {
    println!(
        "{:>3} | {:<14} | {:<12} | {:<26} | {:<20} | {:<40}",
        "#", "Id", "Date", "Category", "Neighborhood", "Summary"
    );
    println!("{}", "-".repeat(130));

    for (i, m) in view.iter().take(limit).enumerate() {
        let date = truncate(&m.presentation_date, 12);
        let hood = truncate(m.location.neighborhood.as_deref().unwrap_or("-"), 20);
        let summary = truncate(&m.summary, 40);
        println!(
            "{:>3} | {:<14} | {:<12} | {:<26} | {:<20} | {:<40}",
            i + 1,
            truncate(&m.id, 14),
            date,
            m.category.label(),
            hood,
            summary
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
