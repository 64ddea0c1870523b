use std::collections::BTreeSet;

use super::model::{PanelRow, PanelTable};

// ---------------------------------------------------------------------------
// Filter predicate: selected countries plus an inclusive year range
// ---------------------------------------------------------------------------

/// Caller-supplied filter state: a set of country names and an inclusive
/// year interval. Transient; recomputed per query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Countries to include. An empty set selects nothing, not everything.
    pub countries: BTreeSet<String>,
    /// Inclusive lower year bound.
    pub year_lo: i32,
    /// Inclusive upper year bound. `year_lo > year_hi` selects nothing.
    pub year_hi: i32,
}

impl Selection {
    pub fn new(countries: BTreeSet<String>, year_lo: i32, year_hi: i32) -> Self {
        Selection {
            countries,
            year_lo,
            year_hi,
        }
    }

    /// Initialise a selection covering the whole table: every country, the
    /// full observed year span.
    pub fn all(panel: &PanelTable) -> Self {
        let (year_lo, year_hi) = panel.year_span.unwrap_or((0, -1));
        Selection {
            countries: panel.countries.clone(),
            year_lo,
            year_hi,
        }
    }

    /// Whether a single row passes both predicates.
    pub fn matches(&self, row: &PanelRow) -> bool {
        self.countries.contains(&row.country)
            && self.year_lo <= row.year
            && row.year <= self.year_hi
    }
}

/// Return indices of panel rows passing the selection, in input row order.
///
/// Pure: the table is never mutated and the result is a fresh view. Empty
/// country sets and inverted year ranges yield empty results rather than
/// errors.
pub fn filtered_indices(panel: &PanelTable, selection: &Selection) -> Vec<usize> {
    panel
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| selection.matches(row))
        .map(|(i, _)| i)
        .collect()
}
