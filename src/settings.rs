use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://camara.example.gov.br";
const DEFAULT_LISTING_PATH: &str = "/indicacoes?pagina=";
const DEFAULT_PAGES: u32 = 3;

/// Runtime settings. Defaults, then `LEGIS_*` environment variables
/// (`LEGIS_SOURCES` is a comma-separated list).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub sources: Vec<String>,
    pub host: String,
    pub port: u16,
    /// Shared-cache freshness window for successful responses, in seconds.
    pub cache_max_age: u64,
    pub cache_swr: u64,
    pub user_agent: String,
}

impl Settings {
    pub fn load() -> Result<Settings> {
        Self::from_config(
            Self::builder()?
                .add_source(
                    Environment::with_prefix("LEGIS")
                        .try_parsing(true)
                        .list_separator(",")
                        .with_list_parse_key("sources"),
                )
                .build()
                .context("Failed to read LEGIS_* settings")?,
        )
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let sources: Vec<String> = (1..=DEFAULT_PAGES)
            .map(|n| format!("{}{}{}", DEFAULT_BASE_URL, DEFAULT_LISTING_PATH, n))
            .collect();
        Ok(Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("sources", sources)?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("cache_max_age", 21_600)?
            .set_default("cache_swr", 600)?
            .set_default(
                "user_agent",
                concat!("legis_scraper/", env!("CARGO_PKG_VERSION")),
            )?)
    }

    fn from_config(cfg: Config) -> Result<Settings> {
        let settings: Settings = cfg
            .try_deserialize()
            .context("Invalid legis_scraper settings")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        self.base()?;
        if self.sources.is_empty() {
            anyhow::bail!("At least one source page URL is required");
        }
        for source in &self.sources {
            Url::parse(source).with_context(|| format!("Invalid source URL: {}", source))?;
        }
        Ok(())
    }

    /// Origin used to absolutize relative document links.
    pub fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("Invalid base URL: {}", self.base_url))
    }

    /// `Cache-Control` value for successful dataset responses.
    pub fn cache_control(&self) -> String {
        format!(
            "public, max-age=0, s-maxage={}, stale-while-revalidate={}",
            self.cache_max_age, self.cache_swr
        )
    }
}

// ── Tests ──
