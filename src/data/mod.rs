/// Data layer: record loading, filtering, aggregation and map binding.
///
/// Architecture:
/// ```text
///  perguruanTinggiIndonesia.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  rename columns, parse WKT → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  province / organizer / status selections → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  per-province counts + shares (filtered and complete)
///   └───────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ choropleth  │  join shares onto province shapes, fixed colour domain
///   └────────────┘
/// ```
///
/// `report` runs the whole chain for one filter state; `export` writes the
/// filtered table back out as CSV.

pub mod aggregate;
pub mod choropleth;
pub mod export;
pub mod filter;
pub mod geometry;
pub mod loader;
pub mod model;
pub mod report;

#[cfg(test)]
pub(crate) mod fixtures;
