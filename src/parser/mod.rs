pub mod classify;
pub mod dates;
pub mod rows;

use tracing::debug;
use url::Url;

use crate::model::LegislativeMatter;

/// Listing HTML → typed records (classification and location hints included).
pub fn process_page(html: &str, base: &Url) -> Vec<LegislativeMatter> {
    let matters = rows::extract(html, base);
    debug!(records = matters.len(), bytes = html.len(), "extracted listing page");
    matters
}
