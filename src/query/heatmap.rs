use std::collections::BTreeMap;

use crate::data::model::CorrelationTable;
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Heatmap reshaper: top causes → dense cause × climate-variable matrix
// ---------------------------------------------------------------------------

/// A dense correlation matrix for matrix-style rendering.
///
/// Rows are the selected causes in ranked order; columns are the climate
/// variables in the order they are first observed among the selected rows.
/// A cell with no backing record is `None`, never 0.0: zero is a valid
/// stored correlation.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    causes: Vec<String>,
    variables: Vec<String>,
    cells: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    /// Row labels, strongest cause first.
    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    /// Column labels.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Cell by position (row-major).
    pub fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        self.cells[row * self.variables.len() + col]
    }

    /// Cell by label; `None` for unknown labels and for empty cells alike.
    pub fn get(&self, cause: &str, variable: &str) -> Option<f64> {
        let row = self.causes.iter().position(|c| c == cause)?;
        let col = self.variables.iter().position(|v| v == variable)?;
        self.value_at(row, col)
    }
}

/// Build the heatmap matrix for the `k` causes with the strongest
/// correlation to any climate variable.
///
/// Step 1 ranks every distinct cause by its maximum |correlation| across
/// all its rows (stable descending; ties keep first-appearance order) and
/// keeps the top `k`. Step 2 pivots the rows of those causes into a dense
/// matrix.
///
/// Fails with [`DashboardError::InvalidArgument`] when `k == 0`, and with
/// [`DashboardError::AmbiguousPivot`] when two records share a
/// (cause, climate variable) key: the pivot carries no aggregation
/// function, so duplicate keys are a data-quality error.
pub fn top_causes_matrix(table: &CorrelationTable, k: usize) -> Result<CorrelationMatrix> {
    if k == 0 {
        return Err(DashboardError::InvalidArgument(
            "heatmap cause count must be positive".to_string(),
        ));
    }

    // Step 1: per-cause max |correlation|, in first-appearance order.
    let mut order: Vec<&str> = Vec::new();
    let mut max_abs: BTreeMap<&str, f64> = BTreeMap::new();
    for row in &table.rows {
        let cause = row.cause.as_str();
        let strength = row.correlation.abs();
        match max_abs.get_mut(cause) {
            Some(current) => {
                if strength > *current {
                    *current = strength;
                }
            }
            None => {
                order.push(cause);
                max_abs.insert(cause, strength);
            }
        }
    }

    let mut ranked: Vec<&str> = order;
    ranked.sort_by(|a, b| max_abs[b].total_cmp(&max_abs[a]));
    let causes: Vec<String> = ranked.iter().take(k).map(|c| c.to_string()).collect();

    // Step 2: pivot the selected causes' rows into a dense matrix.
    let cause_row: BTreeMap<&str, usize> = causes
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut variables: Vec<String> = Vec::new();
    let mut entries: Vec<(usize, usize, f64)> = Vec::new();
    for row in &table.rows {
        let Some(&r) = cause_row.get(row.cause.as_str()) else {
            continue;
        };
        let c = match variables.iter().position(|v| *v == row.climate_variable) {
            Some(c) => c,
            None => {
                variables.push(row.climate_variable.clone());
                variables.len() - 1
            }
        };
        entries.push((r, c, row.correlation));
    }

    let mut cells = vec![None; causes.len() * variables.len()];
    for (r, c, value) in entries {
        let slot = &mut cells[r * variables.len() + c];
        if slot.is_some() {
            return Err(DashboardError::AmbiguousPivot {
                cause: causes[r].clone(),
                variable: variables[c].clone(),
            });
        }
        *slot = Some(value);
    }

    Ok(CorrelationMatrix {
        causes,
        variables,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CorrelationRow;

    fn row(cause: &str, variable: &str, correlation: f64) -> CorrelationRow {
        CorrelationRow {
            cause: cause.to_string(),
            climate_variable: variable.to_string(),
            correlation,
        }
    }

    #[test]
    fn selects_the_k_causes_with_greatest_max_abs_correlation() {
        let table = CorrelationTable {
            rows: vec![
                row("Flu", "Temperature_C", 0.2),
                row("Flu", "Precipitation_mm", -0.85),
                row("Malaria", "Temperature_C", 0.6),
                row("Cholera", "Precipitation_mm", 0.7),
                row("Measles", "Temperature_C", 0.1),
            ],
        };
        let matrix = top_causes_matrix(&table, 3).unwrap();
        assert_eq!(matrix.causes(), ["Flu", "Cholera", "Malaria"]);
    }

    #[test]
    fn ranking_ties_keep_first_appearance_order() {
        let table = CorrelationTable {
            rows: vec![
                row("B", "Temperature_C", -0.5),
                row("A", "Temperature_C", 0.5),
                row("C", "Temperature_C", 0.9),
            ],
        };
        let matrix = top_causes_matrix(&table, 2).unwrap();
        // B and A tie on |0.5|; B appeared first.
        assert_eq!(matrix.causes(), ["C", "B"]);
    }

    #[test]
    fn absent_cells_are_none_and_distinct_from_zero() {
        let table = CorrelationTable {
            rows: vec![
                row("Flu", "Temperature_C", 0.0),
                row("Flu", "Precipitation_mm", 0.4),
                row("Malaria", "Precipitation_mm", 0.9),
            ],
        };
        let matrix = top_causes_matrix(&table, 2).unwrap();

        // Stored zero is a value...
        assert_eq!(matrix.get("Flu", "Temperature_C"), Some(0.0));
        // ...while a missing (cause, variable) record is no value at all.
        assert_eq!(matrix.get("Malaria", "Temperature_C"), None);
        assert_eq!(matrix.get("Malaria", "Precipitation_mm"), Some(0.9));
    }

    #[test]
    fn duplicate_pivot_key_is_ambiguous() {
        let table = CorrelationTable {
            rows: vec![
                row("Flu", "Temperature_C", 0.3),
                row("Flu", "Temperature_C", 0.4),
            ],
        };
        let err = top_causes_matrix(&table, 1).unwrap_err();
        match err {
            DashboardError::AmbiguousPivot { cause, variable } => {
                assert_eq!(cause, "Flu");
                assert_eq!(variable, "Temperature_C");
            }
            other => panic!("expected AmbiguousPivot, got {other}"),
        }
    }

    #[test]
    fn k_larger_than_cause_count_returns_all_causes() {
        let table = CorrelationTable {
            rows: vec![row("Flu", "Temperature_C", 0.3)],
        };
        let matrix = top_causes_matrix(&table, 10).unwrap();
        assert_eq!(matrix.causes(), ["Flu"]);
        assert_eq!(matrix.variables(), ["Temperature_C"]);
    }

    #[test]
    fn zero_k_is_invalid() {
        let table = CorrelationTable::default();
        let err = top_causes_matrix(&table, 0).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidArgument(_)));
    }

    #[test]
    fn empty_table_pivots_to_an_empty_matrix() {
        let table = CorrelationTable::default();
        let matrix = top_causes_matrix(&table, 5).unwrap();
        assert!(matrix.causes().is_empty());
        assert!(matrix.variables().is_empty());
    }
}
