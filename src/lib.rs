//! Query core for a climate & mortality analytics dashboard.
//!
//! Loads two pre-computed tables (a country/year panel of climate and
//! mortality indicators, and a table of climate-variable / cause-of-death
//! correlation coefficients) and serves the filtered, aggregated, and
//! reshaped views the dashboard charts render: per-country time series,
//! descending country rankings, top-K correlation lists, and a dense
//! cause × climate-variable heatmap matrix.
//!
//! The crate knows nothing about rendering. A presentation layer supplies
//! the filter selections (countries, year range, metric, mode, count) and
//! draws whatever ordered sequences or matrices come back.

pub mod config;
pub mod data;
pub mod error;
pub mod query;
pub mod session;

pub use config::DataConfig;
pub use data::filter::{filtered_indices, Selection};
pub use data::loader::{load, load_correlations, load_panel, load_shared, LoadedTables};
pub use data::model::{
    ClimateVariable, Continent, CorrelationRow, CorrelationTable, Metric, PanelRow, PanelTable,
};
pub use error::{DashboardError, Result};
pub use query::aggregate::{
    mean_by_country_ranked, mean_by_country_year, CountryMean, CountryYearMean,
};
pub use query::heatmap::{top_causes_matrix, CorrelationMatrix};
pub use query::select::{select_top, CorrelationMode};
pub use session::{DashboardState, Overview};
