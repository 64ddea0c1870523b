use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Data source configuration
// ---------------------------------------------------------------------------

/// Locations of the two source tables plus the cause-of-death schema.
///
/// The cause list is an explicit schema descriptor: the loader checks that
/// every `<cause>_Rate_per_100k` column exists in the panel table and fails
/// with [`DashboardError::DataUnavailable`] when one is missing, so schema
/// drift is caught at startup rather than at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Country/year panel table (`.csv`, `.parquet`, or `.json`).
    pub panel_path: PathBuf,
    /// Cause × climate-variable correlation table.
    pub correlations_path: PathBuf,
    /// Cause-of-death names, without the `_Rate_per_100k` suffix.
    pub causes: Vec<String>,
}

impl DataConfig {
    pub fn new(
        panel_path: impl Into<PathBuf>,
        correlations_path: impl Into<PathBuf>,
        causes: Vec<String>,
    ) -> Self {
        DataConfig {
            panel_path: panel_path.into(),
            correlations_path: correlations_path.into(),
            causes,
        }
    }

    /// Read a configuration from a JSON file:
    ///
    /// ```json
    /// {
    ///   "panel_path": "data/processed/integrated_data_1990_2019.csv",
    ///   "correlations_path": "results/climate_mortality_correlations.csv",
    ///   "causes": ["Cardiovascular Diseases", "Malaria"]
    /// }
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::unavailable(path, e))?;
        serde_json::from_str(&text).map_err(|e| DashboardError::unavailable(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_json() {
        let config = DataConfig::new(
            "panel.csv",
            "corr.csv",
            vec!["Malaria".to_string(), "Tuberculosis".to_string()],
        );
        let text = serde_json::to_string(&config).unwrap();
        let parsed: DataConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.panel_path, PathBuf::from("panel.csv"));
        assert_eq!(parsed.causes, config.causes);
    }

    #[test]
    fn missing_config_file_is_data_unavailable() {
        let err = DataConfig::from_file(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, DashboardError::DataUnavailable { .. }));
    }
}
