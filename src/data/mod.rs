/// Data layer: core types, filtering, aggregation and lookup.
///
/// Architecture:
/// ```text
///   raw sheet rows (header + data)
///        │
///        ▼
///   ┌──────────┐
///   │  model    │  build → Dataset (trimmed header, padded rows)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSpec → FilteredView (row indices)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ summary   │   │  lookup   │
///   └──────────┘   └──────────┘
/// ```

pub mod filter;
pub mod lookup;
pub mod model;
pub mod summary;

pub use filter::{apply, FilterSpec, FilteredView};
pub use lookup::find_by_key;
pub use model::{Dataset, Row};
pub use summary::{count, count_where, group_counts, OverviewSummary};
