use std::collections::BTreeSet;
use std::sync::Arc;

use crate::data::filter::{filtered_indices, Selection};
use crate::data::loader::LoadedTables;
use crate::data::model::{ClimateVariable, CorrelationRow, Metric};
use crate::error::Result;
use crate::query::aggregate::{
    mean_by_country_ranked, mean_by_country_year, CountryMean, CountryYearMean,
};
use crate::query::heatmap::{top_causes_matrix, CorrelationMatrix};
use crate::query::select::{select_top, CorrelationMode};

/// Causes shown in the heatmap, ranked by max |correlation|.
const HEATMAP_CAUSES: usize = 10;
/// Default number of correlations in the ranking view.
const DEFAULT_TOP_N: usize = 20;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The full dashboard session state, independent of rendering.
///
/// Holds the shared immutable tables plus the current widget selections.
/// Each mutator runs one synchronous refilter pass; the accessor methods
/// then shape the filtered view into exactly what each chart consumes.
/// Single-threaded request/response: the last selection wins, and there is
/// no background work to cancel.
pub struct DashboardState {
    /// Loaded tables, shared with every other session.
    tables: Arc<LoadedTables>,

    /// Current country / year-range selection.
    selection: Selection,

    /// Indices of panel rows passing the current selection (cached).
    visible_indices: Vec<usize>,

    /// Climate variable driving the climate trend chart.
    climate_variable: ClimateVariable,

    /// Cause of death driving the mortality charts. `None` only when the
    /// configured cause list is empty.
    cause: Option<String>,

    /// Number of correlations in the ranking view.
    top_n: usize,

    /// Which end of the correlation distribution the ranking shows.
    correlation_mode: CorrelationMode,
}

/// Headline numbers for the overview panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub countries: usize,
    pub year_span: Option<(i32, i32)>,
    pub records: usize,
    pub columns: usize,
}

impl DashboardState {
    /// Start a session over loaded tables: everything selected, first
    /// configured cause active.
    pub fn new(tables: Arc<LoadedTables>) -> Self {
        let selection = Selection::all(&tables.panel);
        let visible_indices = filtered_indices(&tables.panel, &selection);
        let cause = tables.panel.causes.first().cloned();

        DashboardState {
            tables,
            selection,
            visible_indices,
            climate_variable: ClimateVariable::Temperature,
            cause,
            top_n: DEFAULT_TOP_N,
            correlation_mode: CorrelationMode::AbsoluteStrongest,
        }
    }

    pub fn tables(&self) -> &LoadedTables {
        &self.tables
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Panel rows passing the current selection.
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible_indices
    }

    // -- Mutators: each one triggers the synchronous recompute pass --

    pub fn set_countries(&mut self, countries: BTreeSet<String>) {
        self.selection.countries = countries;
        self.refilter();
    }

    /// Add or remove a single country from the selection.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.selection.countries.remove(country) {
            self.selection.countries.insert(country.to_string());
        }
        self.refilter();
    }

    pub fn set_year_range(&mut self, lo: i32, hi: i32) {
        self.selection.year_lo = lo;
        self.selection.year_hi = hi;
        self.refilter();
    }

    pub fn set_climate_variable(&mut self, variable: ClimateVariable) {
        self.climate_variable = variable;
    }

    /// Select the cause of death for the mortality charts. Rejects names
    /// outside the configured schema and reports whether the change took.
    pub fn set_cause(&mut self, cause: &str) -> bool {
        if self.tables.panel.causes.iter().any(|c| c == cause) {
            self.cause = Some(cause.to_string());
            true
        } else {
            false
        }
    }

    pub fn set_top_n(&mut self, n: usize) {
        self.top_n = n;
    }

    pub fn set_correlation_mode(&mut self, mode: CorrelationMode) {
        self.correlation_mode = mode;
    }

    fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.tables.panel, &self.selection);
    }

    // -- Chart queries over the filtered view --

    /// Headline numbers over the whole (unfiltered) dataset.
    pub fn overview(&self) -> Overview {
        let panel = &self.tables.panel;
        Overview {
            countries: panel.countries.len(),
            year_span: panel.year_span,
            records: panel.len(),
            columns: panel.column_count(),
        }
    }

    /// Per-country time series of the selected climate variable.
    pub fn climate_series(&self) -> Vec<CountryYearMean> {
        self.series(&Metric::Climate(self.climate_variable))
    }

    /// Per-country time series of the selected cause's death rate.
    pub fn mortality_series(&self) -> Vec<CountryYearMean> {
        match &self.cause {
            Some(cause) => self.series(&Metric::CauseRate(cause.clone())),
            None => Vec::new(),
        }
    }

    /// Countries ranked by their mean death rate for the selected cause.
    pub fn ranked_rates(&self) -> Vec<CountryMean> {
        match &self.cause {
            Some(cause) => mean_by_country_ranked(
                self.tables.panel.select(&self.visible_indices),
                &Metric::CauseRate(cause.clone()),
            ),
            None => Vec::new(),
        }
    }

    /// The ranking view: top correlations under the current mode and count.
    pub fn top_correlations(&self) -> Result<Vec<CorrelationRow>> {
        select_top(&self.tables.correlations, self.top_n, self.correlation_mode)
    }

    /// The heatmap view: strongest-cause correlation matrix.
    pub fn correlation_heatmap(&self) -> Result<CorrelationMatrix> {
        top_causes_matrix(&self.tables.correlations, HEATMAP_CAUSES)
    }

    fn series(&self, metric: &Metric) -> Vec<CountryYearMean> {
        mean_by_country_year(self.tables.panel.select(&self.visible_indices), metric)
    }
}
