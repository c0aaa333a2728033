/// Data layer: filename labels, filtering, keys, and result tables.
///
/// Architecture:
/// ```text
///  resolved file paths
///        │
///        ▼
///   ┌──────────┐
///   │  label    │  filename root → label value (or absent)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  keep paths carrying `marker-value` tokens
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  keys     │  bundle[,hemi][,endpoint] / surface[,hemi]
///   └──────────┘
///
///  result filenames ──► subsequence ──► submission ids
///  .csv / .json     ──► loader      ──► PerformanceTable / config map
/// ```

pub mod filter;
pub mod keys;
pub mod label;
pub mod loader;
pub mod model;
pub mod subsequence;
