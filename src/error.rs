use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Errors surfaced by the dashboard core.
///
/// Filtering and aggregation are total over their documented domain and never
/// produce an error; empty selections yield empty results.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A source table is missing, unreadable, or violates the column
    /// contract. Fatal at startup; never retried.
    #[error("data unavailable: {}: {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// A caller-supplied query parameter is out of range (e.g. a top-N
    /// count of zero). Surfaced to the UI for correction.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// More than one correlation record shares a (cause, climate variable)
    /// key, so the heatmap pivot has no unique cell value. Surfaced as a
    /// data-quality error rather than resolved by picking a row arbitrarily.
    #[error("ambiguous pivot: duplicate entry for ({cause}, {variable})")]
    AmbiguousPivot { cause: String, variable: String },
}

impl DashboardError {
    /// Wrap any loader-internal failure as `DataUnavailable` for `path`.
    pub(crate) fn unavailable(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        DashboardError::DataUnavailable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DashboardError>;
