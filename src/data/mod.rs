/// Data layer: parsing, normalization, aggregation, filtering, and export.
///
/// Architecture:
/// ```text
///  cluster export (.csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  normalize rows → Report (records + warnings)
///   └──────────┘
///        │
///        ├──────────────▶ aggregate – fleet-wide KPIs
///        ▼
///   ┌──────────┐
///   │  filter   │  cluster subset + column toggles
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  table    │  formatted comparison rows → TableView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  TableView → CSV bytes
///   └──────────┘
/// ```
pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod parse;
pub mod table;
