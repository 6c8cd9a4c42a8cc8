//! Data layer: exported tables, statistics and histograms.
//!
//! Architecture:
//! ```text
//!   <project>/<name>.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse CSV → TabularDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ TabularDataset│  named columns of typed cells
//!   └──────────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌──────────┐  ┌───────────┐
//!   │  stats    │  │ histogram │  summaries, comparison tables, 30-bin counts
//!   └──────────┘  └───────────┘
//! ```

pub mod histogram;
pub mod loader;
pub mod model;
pub mod stats;
