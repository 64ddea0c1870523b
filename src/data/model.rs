use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// ClimateVariable – the four climate columns of the panel table
// ---------------------------------------------------------------------------

/// The fixed set of climate indicators carried by the panel table.
/// The variants map 1:1 onto source column names, which are part of the
/// file contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClimateVariable {
    Temperature,
    Precipitation,
    SurfacePressure,
    WindSpeed,
}

impl ClimateVariable {
    pub const ALL: [ClimateVariable; 4] = [
        ClimateVariable::Temperature,
        ClimateVariable::Precipitation,
        ClimateVariable::SurfacePressure,
        ClimateVariable::WindSpeed,
    ];

    /// Source column name for this variable.
    pub fn column_name(self) -> &'static str {
        match self {
            ClimateVariable::Temperature => "Temperature_C",
            ClimateVariable::Precipitation => "Precipitation_mm",
            ClimateVariable::SurfacePressure => "Surface_Pressure_Pa",
            ClimateVariable::WindSpeed => "Wind_Speed_ms",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.column_name() == name)
    }
}

impl fmt::Display for ClimateVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// Continent – derived geographic grouping
// ---------------------------------------------------------------------------

/// Coarse geographic grouping derived from the country name via the static
/// lookup in [`super::continent`]. Not present in the source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Continent {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Continent::Africa => "Africa",
            Continent::Americas => "Americas",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::Oceania => "Oceania",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Metric – which panel column a query aggregates
// ---------------------------------------------------------------------------

/// Suffix that turns a cause-of-death name into its panel column name.
pub const RATE_SUFFIX: &str = "_Rate_per_100k";

/// Panel column name for a cause-of-death rate.
pub fn rate_column(cause: &str) -> String {
    format!("{cause}{RATE_SUFFIX}")
}

/// A plottable panel column: either one of the four climate variables or a
/// cause-of-death rate (per 100k population).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    Climate(ClimateVariable),
    CauseRate(String),
}

impl Metric {
    /// Source column name for this metric.
    pub fn column_name(&self) -> String {
        match self {
            Metric::Climate(var) => var.column_name().to_string(),
            Metric::CauseRate(cause) => rate_column(cause),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}

// ---------------------------------------------------------------------------
// PanelRow – one row of the country/year panel
// ---------------------------------------------------------------------------

/// One observation of the panel: a (country, year) pair with its climate
/// indicators and mortality rates. (country, year) pairs are expected to be
/// unique in the source, but duplicates are tolerated and collapsed by the
/// mean aggregations before plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub country: String,
    pub year: i32,
    /// Derived at load; `None` for countries absent from the lookup.
    pub continent: Option<Continent>,
    pub temperature_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub surface_pressure_pa: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    /// cause name → rate per 100k. Every configured cause has an entry;
    /// `None` marks an empty source cell.
    pub cause_rates: BTreeMap<String, Option<f64>>,
}

impl PanelRow {
    /// Value of a climate variable for this row.
    pub fn climate(&self, var: ClimateVariable) -> Option<f64> {
        match var {
            ClimateVariable::Temperature => self.temperature_c,
            ClimateVariable::Precipitation => self.precipitation_mm,
            ClimateVariable::SurfacePressure => self.surface_pressure_pa,
            ClimateVariable::WindSpeed => self.wind_speed_ms,
        }
    }

    /// Value of an arbitrary metric; `None` for missing cells and for cause
    /// names outside the configured schema.
    pub fn value(&self, metric: &Metric) -> Option<f64> {
        match metric {
            Metric::Climate(var) => self.climate(*var),
            Metric::CauseRate(cause) => self.cause_rates.get(cause).copied().flatten(),
        }
    }
}

// ---------------------------------------------------------------------------
// PanelTable – the loaded panel with pre-computed indexes
// ---------------------------------------------------------------------------

/// The full panel dataset. Immutable after load; all queries take read-only
/// views (index vectors or row iterators) and never mutate it.
#[derive(Debug, Clone)]
pub struct PanelTable {
    /// All observations, in source row order.
    pub rows: Vec<PanelRow>,
    /// Configured cause-of-death names, in schema order.
    pub causes: Vec<String>,
    /// Sorted set of distinct country names.
    pub countries: BTreeSet<String>,
    /// Observed (min, max) year, `None` for an empty table.
    pub year_span: Option<(i32, i32)>,
}

impl PanelTable {
    /// Build the table indexes from loaded rows.
    pub fn from_rows(rows: Vec<PanelRow>, causes: Vec<String>) -> Self {
        let mut countries = BTreeSet::new();
        let mut year_span: Option<(i32, i32)> = None;

        for row in &rows {
            countries.insert(row.country.clone());
            year_span = Some(match year_span {
                None => (row.year, row.year),
                Some((lo, hi)) => (lo.min(row.year), hi.max(row.year)),
            });
        }

        PanelTable {
            rows,
            causes,
            countries,
            year_span,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total column count of the logical table: country, year, continent,
    /// the four climate variables, and one rate column per cause.
    pub fn column_count(&self) -> usize {
        3 + ClimateVariable::ALL.len() + self.causes.len()
    }

    /// Iterate the rows named by a filtered index vector.
    pub fn select<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a PanelRow> + 'a {
        indices.iter().map(|&i| &self.rows[i])
    }
}

// ---------------------------------------------------------------------------
// CorrelationTable – long-format (cause, climate variable) correlations
// ---------------------------------------------------------------------------

/// One pre-computed correlation coefficient between a cause-of-death rate
/// and a climate variable. In [-1, 1] by domain meaning; not range-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationRow {
    pub cause: String,
    pub climate_variable: String,
    pub correlation: f64,
}

/// The loaded correlation table, in source row order. At most one row per
/// (cause, climate variable) pair is expected; the heatmap pivot enforces
/// this, nothing else does.
#[derive(Debug, Clone, Default)]
pub struct CorrelationTable {
    pub rows: Vec<CorrelationRow>,
}

impl CorrelationTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
