use std::borrow::Borrow;
use std::cmp::Reverse;
use std::collections::HashMap;

use tracing::info;

use crate::error::PipelineError;
use crate::model::LegislativeMatter;

/// Merge per-page results into the served dataset.
///
/// - Flattens pages in the order given.
/// - Deduplicates by `id`: a later occurrence replaces the stored record but
///   keeps the slot of the first occurrence.
/// - Sorts newest first by `(year, sequence)` parsed from `id`; unparseable
///   ids go last.
///
/// An empty flattened input is reported as [`PipelineError::Unavailable`].
pub fn consolidate(
    pages: Vec<Vec<LegislativeMatter>>,
) -> Result<Vec<LegislativeMatter>, PipelineError> {
    let flat: Vec<LegislativeMatter> = pages.into_iter().flatten().collect();
    if flat.is_empty() {
        return Err(PipelineError::Unavailable);
    }
    let total = flat.len();

    let mut unique = dedup_last_wins(flat);
    sort_by_id_desc(&mut unique);

    info!(total, unique = unique.len(), "consolidated legislative matters");
    Ok(unique)
}

fn dedup_last_wins(flat: Vec<LegislativeMatter>) -> Vec<LegislativeMatter> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<LegislativeMatter> = Vec::with_capacity(flat.len());

    for matter in flat {
        match slots.get(&matter.id) {
            Some(&slot) => unique[slot] = matter,
            None => {
                slots.insert(matter.id.clone(), unique.len());
                unique.push(matter);
            }
        }
    }

    unique
}

/// Stable; ties and unparseable ids keep their relative order.
pub fn sort_by_id_desc<T: Borrow<LegislativeMatter>>(items: &mut [T]) {
    items.sort_by_key(|m| Reverse(<T as Borrow<LegislativeMatter>>::borrow(m).id_key()));
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Location};

    fn matter(id: &str, summary: &str) -> LegislativeMatter {
        LegislativeMatter {
            id: id.to_string(),
            summary: summary.to_string(),
            author: "Ver. Teste".to_string(),
            presentation_date: "01/01/2025".to_string(),
            category: Category::UrbanInfrastructure,
            location: Location::default(),
            status: "x".to_string(),
            protocol: "1".to_string(),
            pdf_link: "https://example.org".to_string(),
        }
    }

    fn ids(ms: &[LegislativeMatter]) -> Vec<&str> {
        ms.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn last_occurrence_wins() {
        let pages = vec![
            vec![matter("IND 1/2025", "first"), matter("IND 2/2025", "other")],
            vec![matter("IND 1/2025", "second")],
            vec![matter("IND 1/2025", "third")],
        ];
        let out = consolidate(pages).unwrap();
        assert_eq!(out.len(), 2);
        let one = out.iter().find(|m| m.id == "IND 1/2025").unwrap();
        assert_eq!(one.summary, "third");
    }

    #[test]
    fn newer_year_sorts_first_regardless_of_input_order() {
        for pages in [
            vec![vec![matter("IND 5/2024", "a")], vec![matter("IND 1/2025", "b")]],
            vec![vec![matter("IND 1/2025", "b")], vec![matter("IND 5/2024", "a")]],
        ] {
            let out = consolidate(pages).unwrap();
            assert_eq!(ids(&out), vec!["IND 1/2025", "IND 5/2024"]);
        }
    }

    #[test]
    fn sequence_breaks_year_ties() {
        let pages = vec![vec![
            matter("IND 9/2025", ""),
            matter("IND 120/2025", ""),
            matter("IND 10/2025", ""),
            matter("IND 300/2023", ""),
        ]];
        let out = consolidate(pages).unwrap();
        assert_eq!(
            ids(&out),
            vec!["IND 120/2025", "IND 10/2025", "IND 9/2025", "IND 300/2023"]
        );
    }

    #[test]
    fn unparseable_ids_go_last_in_input_order() {
        let pages = vec![vec![
            matter("sem número", ""),
            matter("IND 1/2020", ""),
            matter("???", ""),
        ]];
        let out = consolidate(pages).unwrap();
        assert_eq!(ids(&out), vec!["IND 1/2020", "sem número", "???"]);
    }

    #[test]
    fn page_order_and_duplication_do_not_change_ids() {
        let a = vec![matter("IND 3/2025", ""), matter("IND 1/2024", "")];
        let b = vec![matter("IND 2/2025", ""), matter("IND 3/2025", "")];
        let forward = consolidate(vec![a.clone(), b.clone()]).unwrap();
        let backward = consolidate(vec![b.clone(), a.clone(), b]).unwrap();
        assert_eq!(ids(&forward), ids(&backward));
        assert_eq!(ids(&forward), vec!["IND 3/2025", "IND 2/2025", "IND 1/2024"]);
    }

    #[test]
    fn empty_input_is_unavailable() {
        assert!(matches!(consolidate(vec![]), Err(PipelineError::Unavailable)));
        assert!(matches!(
            consolidate(vec![vec![], vec![], vec![]]),
            Err(PipelineError::Unavailable)
        ));
    }
}
