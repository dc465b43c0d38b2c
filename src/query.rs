use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::consolidate::sort_by_id_desc;
use crate::model::{Category, LegislativeMatter};
use crate::parser::dates::parse_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("todas") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Date,
    Id,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortBy::Date),
            "id" => Ok(SortBy::Id),
            other => Err(format!("unknown sort key: {other} (expected 'date' or 'id')")),
        }
    }
}

/// Filter/search/sort selection driving [`view`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub category: CategoryFilter,
    pub search: String,
    pub sort_by: SortBy,
}

impl ViewState {
    /// Click-to-toggle: picking the active category again clears the filter.
    pub fn toggle_category(&mut self, category: Category) {
        self.category = match self.category {
            CategoryFilter::Only(current) if current == category => CategoryFilter::All,
            _ => CategoryFilter::Only(category),
        };
    }

    /// Apply one category selection: `All` clears, a category toggles.
    pub fn select(&mut self, filter: CategoryFilter) {
        match filter {
            CategoryFilter::All => self.category = CategoryFilter::All,
            CategoryFilter::Only(category) => self.toggle_category(category),
        }
    }
}

/// Filtered and sorted view over `all`. Never mutates the input.
pub fn view<'a>(all: &'a [LegislativeMatter], state: &ViewState) -> Vec<&'a LegislativeMatter> {
    let needle = state.search.trim().to_lowercase();

    let mut out: Vec<&LegislativeMatter> = all
        .iter()
        .filter(|m| match state.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => m.category == c,
        })
        .filter(|m| needle.is_empty() || matches_search(m, &needle))
        .collect();

    match state.sort_by {
        SortBy::Date => out.sort_by_cached_key(|m| Reverse(parse_date(&m.presentation_date))),
        SortBy::Id => sort_by_id_desc(&mut out),
    }
    out
}

fn matches_search(m: &LegislativeMatter, needle: &str) -> bool {
    [
        Some(m.id.as_str()),
        Some(m.summary.as_str()),
        m.location.address.as_deref(),
        m.location.neighborhood.as_deref(),
        Some(m.protocol.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Number of records per category, for the category picker.
pub fn category_counts(all: &[LegislativeMatter]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for m in all {
        *counts.entry(m.category).or_insert(0) += 1;
    }
    counts
}

// ── Tests ──
