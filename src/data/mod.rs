/// Data layer: core types, loading, enrichment, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate schema → PanelTable, CorrelationTable
///   └──────────┘
///        │            (continent lookup enriches each panel row)
///        ▼
///   ┌──────────────┐
///   │ PanelTable    │  Vec<PanelRow>, country/year indexes
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  country set + year range → filtered indices
///   └──────────┘
/// ```
///
/// Tables are immutable after load; the query layer consumes read-only
/// views of them.

pub mod continent;
pub mod filter;
pub mod loader;
pub mod model;
