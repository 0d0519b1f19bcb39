/// Data layer: core types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Row>, column kinds, unique values
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  multiselect criteria → RowSet / FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  filtered view → CSV
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
