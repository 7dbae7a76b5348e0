/// Data layer: core types, loading, and series building.
///
/// Architecture:
/// ```text
///  affordability.json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read + validate → AffordabilityDataset
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  series   │   │  audit    │  tolerated anomalies → warnings
///   └──────────┘   └──────────┘
///        │
///        ▼
///   per-geography SeriesSet on a shared year axis
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  tidy CSV of every chart series
///   └──────────┘
/// ```

pub mod audit;
pub mod export;
pub mod loader;
pub mod model;
pub mod series;
