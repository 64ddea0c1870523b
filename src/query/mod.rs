/// Query layer: the data-shaping operations behind each chart.
///
/// * `aggregate` – group-by-mean reducers feeding the line and bar charts
/// * `select`    – top-K correlation ranking for the correlation bars
/// * `heatmap`   – top-causes selection + pivot for the matrix view
///
/// Every function here is pure: it reads a table view and returns a fresh
/// ordered sequence or matrix, leaving the loaded tables untouched.

pub mod aggregate;
pub mod heatmap;
pub mod select;
