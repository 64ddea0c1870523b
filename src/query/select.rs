use crate::data::model::{CorrelationRow, CorrelationTable};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Top-K correlation selector
// ---------------------------------------------------------------------------

/// Which end of the correlation distribution a ranking shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationMode {
    /// Largest |correlation| first. Rows tied with the n-th ranked value
    /// are all included, so the result may exceed n.
    AbsoluteStrongest,
    /// Largest signed correlation first, truncated to exactly n.
    Positive,
    /// Smallest (most negative) signed correlation first, truncated to
    /// exactly n.
    Negative,
}

/// Select the top `n` correlation rows under the given mode.
///
/// All sorts are stable, so rows tied on the ranking value keep their
/// input order. The tie-inclusion asymmetry between `AbsoluteStrongest`
/// and the signed modes matches the rankings the dashboard has always
/// displayed and is intentional; do not unify the policies.
///
/// Fails with [`DashboardError::InvalidArgument`] when `n == 0`. The input
/// table is never mutated.
pub fn select_top(
    table: &CorrelationTable,
    n: usize,
    mode: CorrelationMode,
) -> Result<Vec<CorrelationRow>> {
    if n == 0 {
        return Err(DashboardError::InvalidArgument(
            "top-N count must be positive".to_string(),
        ));
    }

    let mut rows = table.rows.clone();
    match mode {
        CorrelationMode::Positive => {
            rows.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
            rows.truncate(n);
        }
        CorrelationMode::Negative => {
            rows.sort_by(|a, b| a.correlation.total_cmp(&b.correlation));
            rows.truncate(n);
        }
        CorrelationMode::AbsoluteStrongest => {
            rows.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));
            if rows.len() > n {
                let cutoff = rows[n - 1].correlation.abs();
                let mut end = n;
                while end < rows.len() && rows[end].correlation.abs() == cutoff {
                    end += 1;
                }
                rows.truncate(end);
            }
        }
    }
    Ok(rows)
}
