use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::model::{LegislativeMatter, PROTOCOL_NOT_AVAILABLE};
use crate::parser::classify::{classify, derive_location};

static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Provenance marker stamped on every extracted record.
pub const STATUS: &str = "Registrada na Câmara Municipal";

const MIN_COLUMNS: usize = 4;

/// Parse one listing page into records. Rows that are not data rows
/// (headers, separators, short rows) are skipped.
pub fn extract(html: &str, base: &Url) -> Vec<LegislativeMatter> {
    let document = Html::parse_document(html);
    let mut matters = Vec::new();

    for row in document.select(&ROW_SEL) {
        let cells: Vec<ElementRef> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "td")
            .collect();
        if cells.len() < MIN_COLUMNS {
            continue;
        }
        if let Some(matter) = extract_row(&cells, base) {
            matters.push(matter);
        }
    }

    matters
}

fn extract_row(cells: &[ElementRef], base: &Url) -> Option<LegislativeMatter> {
    let link = cells[0].select(&LINK_SEL).next()?;
    let id = element_text(&link);
    if id.is_empty() {
        return None;
    }

    let summary = element_text(&cells[1]);
    if summary.is_empty() {
        debug!(id = %id, "skipping row without summary");
        return None;
    }

    let href = link.value().attr("href").unwrap_or("").trim();
    let pdf_link = resolve_link(href, base);
    let protocol = protocol_from_link(&pdf_link);

    Some(LegislativeMatter {
        category: classify(&summary),
        location: derive_location(&summary),
        id,
        summary,
        author: element_text(&cells[2]),
        presentation_date: element_text(&cells[3]),
        status: STATUS.to_string(),
        protocol,
        pdf_link,
    })
}

/// Visible text with whitespace runs collapsed and ends trimmed.
fn element_text(el: &ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_link(href: &str, base: &Url) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match base.join(href) {
        Ok(u) => u.to_string(),
        Err(_) => format!("{}{}", base.as_str().trim_end_matches('/'), href),
    }
}

/// Digits of the `protocolo` query parameter, or the N/A sentinel.
fn protocol_from_link(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|u| {
            u.query_pairs()
                .find(|(k, _)| k == "protocolo")
                .map(|(_, v)| v.chars().take_while(|c| c.is_ascii_digit()).collect::<String>())
        })
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| PROTOCOL_NOT_AVAILABLE.to_string())
}

// ── Tests ──
