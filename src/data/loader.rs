use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{bail, Context};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::continent::continent_of;
use super::model::{
    rate_column, ClimateVariable, CorrelationRow, CorrelationTable, PanelRow, PanelTable,
};
use crate::config::DataConfig;
use crate::error::{DashboardError, Result};

/// Panel column contract.
pub const COL_COUNTRY: &str = "Country/Territory";
pub const COL_YEAR: &str = "Year";
/// Correlation-table column contract.
pub const COL_CAUSE: &str = "Cause";
pub const COL_CLIMATE_VARIABLE: &str = "Climate_Variable";
pub const COL_CORRELATION: &str = "Correlation";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Both source tables, loaded and enriched. Treated as immutable for the
/// rest of the session.
#[derive(Debug, Clone)]
pub struct LoadedTables {
    pub panel: PanelTable,
    pub correlations: CorrelationTable,
}

/// Load both tables from their configured locations.
///
/// Any missing file, unreadable file, or contract violation (a required
/// column absent, a key cell unparsable) fails with
/// [`DashboardError::DataUnavailable`]. Data availability is an external
/// precondition, so the error is propagated, never retried.
pub fn load(config: &DataConfig) -> Result<LoadedTables> {
    let panel = load_panel(&config.panel_path, &config.causes)?;
    let correlations = load_correlations(&config.correlations_path)?;
    info!(
        "loaded panel ({} rows, {} countries) and correlations ({} rows)",
        panel.len(),
        panel.countries.len(),
        correlations.len()
    );
    Ok(LoadedTables { panel, correlations })
}

static SHARED: Mutex<Option<Arc<LoadedTables>>> = Mutex::new(None);

/// Process-wide load-once cache around [`load`].
///
/// The first successful call reads the source files and stores the tables;
/// every later call (any thread, any config) receives the same `Arc`. The
/// lock is held across the load, so concurrent first calls resolve to one
/// read serving all callers. A failed load is not cached and the next call
/// retries from scratch.
pub fn load_shared(config: &DataConfig) -> Result<Arc<LoadedTables>> {
    let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(tables) = slot.as_ref() {
        return Ok(Arc::clone(tables));
    }
    let tables = Arc::new(load(config)?);
    *slot = Some(Arc::clone(&tables));
    Ok(tables)
}

/// Load the country/year panel and derive the continent column.
pub fn load_panel(path: &Path, causes: &[String]) -> Result<PanelTable> {
    let raw = read_table(path).map_err(|e| DashboardError::unavailable(path, format!("{e:#}")))?;
    let rows =
        panel_rows(&raw, causes).map_err(|e| DashboardError::unavailable(path, format!("{e:#}")))?;
    Ok(PanelTable::from_rows(rows, causes.to_vec()))
}

/// Load the cause × climate-variable correlation table.
pub fn load_correlations(path: &Path) -> Result<CorrelationTable> {
    let raw = read_table(path).map_err(|e| DashboardError::unavailable(path, format!("{e:#}")))?;
    let rows =
        correlation_rows(&raw).map_err(|e| DashboardError::unavailable(path, format!("{e:#}")))?;
    Ok(CorrelationTable { rows })
}

// ---------------------------------------------------------------------------
// Raw table: one parse target shared by every format
// ---------------------------------------------------------------------------

/// A single cell before schema interpretation.
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Text(String),
    Int(i64),
    Number(f64),
    Null,
}

impl RawCell {
    fn as_str(&self) -> Option<&str> {
        match self {
            RawCell::Text(s) => Some(s),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            RawCell::Int(i) => Some(*i),
            // Tolerate integral floats: JSON and parquet sources often carry
            // years as f64.
            RawCell::Number(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            RawCell::Number(f) => Some(*f),
            RawCell::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn is_null(&self) -> bool {
        matches!(self, RawCell::Null)
    }
}

/// A parsed table: header plus row-major cells, not yet interpreted
/// against either schema.
#[derive(Debug)]
struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    fn column_index(&self, name: &str) -> anyhow::Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .with_context(|| format!("missing required column '{name}'"))
    }
}

/// Parse a source file into a [`RawTable`]. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`            – header row plus one record per line (primary)
/// * `.parquet` / `.pq` – flat scalar columns
/// * `.json`           – records-oriented array, `df.to_json(orient='records')`
fn read_table(path: &Path) -> anyhow::Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => raw_from_csv(path),
        "parquet" | "pq" => raw_from_parquet(path),
        "json" => raw_from_json(path),
        other => bail!("unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn raw_from_csv(path: &Path) -> anyhow::Result<RawTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Ok(RawTable { columns, rows })
}

/// CSV carries no types; classify each cell the way the data reads.
fn guess_cell_type(s: &str) -> RawCell {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return RawCell::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return RawCell::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return RawCell::Number(f);
    }
    RawCell::Text(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

fn raw_from_parquet(path: &Path) -> anyhow::Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<RawCell>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        if columns.is_empty() {
            columns = batch
                .schema()
                .fields()
                .iter()
                .map(|f| f.name().clone())
                .collect();
        }

        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .enumerate()
                .map(|(col, array)| {
                    scalar_cell(array, row).with_context(|| {
                        format!("column '{}', row {row}", batch.schema().field(col).name())
                    })
                })
                .collect::<anyhow::Result<Vec<RawCell>>>()?;
            rows.push(cells);
        }
    }

    Ok(RawTable { columns, rows })
}

/// Extract one scalar cell from an Arrow column.
fn scalar_cell(col: &Arc<dyn Array>, row: usize) -> anyhow::Result<RawCell> {
    if col.is_null(row) {
        return Ok(RawCell::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            RawCell::Text(arr.value(row).to_string())
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            RawCell::Int(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            RawCell::Int(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            RawCell::Number(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            RawCell::Number(arr.value(row))
        }
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(cell)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')` layout:
/// a top-level array of objects, one object per row, keyed by column name.
/// The first record fixes the column set; keys missing from later records
/// read as null.
fn raw_from_json(path: &Path) -> anyhow::Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let records = root.as_array().context("expected top-level JSON array")?;

    let columns: Vec<String> = match records.first() {
        Some(first) => first
            .as_object()
            .context("row 0 is not a JSON object")?
            .keys()
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::with_capacity(records.len());
    for (row_no, record) in records.iter().enumerate() {
        let obj = record
            .as_object()
            .with_context(|| format!("row {row_no} is not a JSON object"))?;
        let cells = columns
            .iter()
            .map(|col| json_cell(obj.get(col)))
            .collect::<anyhow::Result<Vec<RawCell>>>()
            .with_context(|| format!("row {row_no}"))?;
        rows.push(cells);
    }

    Ok(RawTable { columns, rows })
}

fn json_cell(val: Option<&JsonValue>) -> anyhow::Result<RawCell> {
    let cell = match val {
        None | Some(JsonValue::Null) => RawCell::Null,
        Some(JsonValue::String(s)) => RawCell::Text(s.clone()),
        Some(JsonValue::Number(n)) => {
            if let Some(i) = n.as_i64() {
                RawCell::Int(i)
            } else if let Some(f) = n.as_f64() {
                RawCell::Number(f)
            } else {
                bail!("numeric value out of range: {n}")
            }
        }
        Some(other) => bail!("unsupported JSON value: {other}"),
    };
    Ok(cell)
}

// ---------------------------------------------------------------------------
// Schema interpretation
// ---------------------------------------------------------------------------

/// Interpret a raw table against the panel contract and enrich each row
/// with its continent.
fn panel_rows(raw: &RawTable, causes: &[String]) -> anyhow::Result<Vec<PanelRow>> {
    let country_idx = raw.column_index(COL_COUNTRY)?;
    let year_idx = raw.column_index(COL_YEAR)?;
    let climate_idx: Vec<(ClimateVariable, usize)> = ClimateVariable::ALL
        .into_iter()
        .map(|var| Ok((var, raw.column_index(var.column_name())?)))
        .collect::<anyhow::Result<_>>()?;
    // Validate the configured cause schema up front so drift fails the load,
    // not a later query.
    let cause_idx: Vec<(&String, usize)> = causes
        .iter()
        .map(|cause| Ok((cause, raw.column_index(&rate_column(cause))?)))
        .collect::<anyhow::Result<_>>()?;

    let mut rows = Vec::with_capacity(raw.rows.len());
    for (row_no, cells) in raw.rows.iter().enumerate() {
        let country = cells[country_idx]
            .as_str()
            .with_context(|| format!("row {row_no}: '{COL_COUNTRY}' is not text"))?
            .to_string();
        let year_raw = cells[year_idx]
            .as_i64()
            .with_context(|| format!("row {row_no}: '{COL_YEAR}' is not an integer"))?;
        let year = i32::try_from(year_raw)
            .with_context(|| format!("row {row_no}: year {year_raw} out of range"))?;

        let continent = continent_of(&country);
        if continent.is_none() {
            debug!("row {row_no}: no continent mapping for '{country}'");
        }

        let mut climate = [None; 4];
        for (slot, &(var, idx)) in climate.iter_mut().zip(&climate_idx) {
            *slot = metric_cell(&cells[idx], row_no, var.column_name())?;
        }

        let mut cause_rates = BTreeMap::new();
        for &(cause, idx) in &cause_idx {
            let value = metric_cell(&cells[idx], row_no, &rate_column(cause))?;
            cause_rates.insert(cause.clone(), value);
        }

        rows.push(PanelRow {
            country,
            year,
            continent,
            temperature_c: climate[0],
            precipitation_mm: climate[1],
            surface_pressure_pa: climate[2],
            wind_speed_ms: climate[3],
            cause_rates,
        });
    }

    Ok(rows)
}

/// A metric cell is numeric or empty. Non-finite values load as missing so
/// the mean aggregations never see NaN.
fn metric_cell(cell: &RawCell, row_no: usize, column: &str) -> anyhow::Result<Option<f64>> {
    if cell.is_null() {
        return Ok(None);
    }
    let value = cell
        .as_f64()
        .with_context(|| format!("row {row_no}: '{column}' is not numeric"))?;
    Ok(value.is_finite().then_some(value))
}

/// Interpret a raw table against the correlation contract.
fn correlation_rows(raw: &RawTable) -> anyhow::Result<Vec<CorrelationRow>> {
    let cause_idx = raw.column_index(COL_CAUSE)?;
    let variable_idx = raw.column_index(COL_CLIMATE_VARIABLE)?;
    let correlation_idx = raw.column_index(COL_CORRELATION)?;

    let mut rows = Vec::with_capacity(raw.rows.len());
    for (row_no, cells) in raw.rows.iter().enumerate() {
        let cause = cells[cause_idx]
            .as_str()
            .with_context(|| format!("row {row_no}: '{COL_CAUSE}' is not text"))?
            .to_string();
        let climate_variable = cells[variable_idx]
            .as_str()
            .with_context(|| format!("row {row_no}: '{COL_CLIMATE_VARIABLE}' is not text"))?
            .to_string();
        let correlation = cells[correlation_idx]
            .as_f64()
            .with_context(|| format!("row {row_no}: '{COL_CORRELATION}' is not numeric"))?;

        rows.push(CorrelationRow {
            cause,
            climate_variable,
            correlation,
        });
    }

    Ok(rows)
}
