//! In-memory records shared by the data-layer tests.

use std::sync::Arc;

use super::geometry::{Geometry, Polygon};
use super::model::{Dataset, InstitutionRecord, YearMetrics};

/// Axis-aligned square with its lower-left corner at the origin.
pub fn square(size: f64) -> Arc<Geometry> {
    Arc::new(Geometry::Polygon(Polygon {
        rings: vec![vec![
            [0.0, 0.0],
            [size, 0.0],
            [size, size],
            [0.0, size],
            [0.0, 0.0],
        ]],
    }))
}

/// A record whose geometry is a square sized by the province name length,
/// so every row of one province carries the same outline.
pub fn record(province: &str, organizer: &str, status: &str) -> InstitutionRecord {
    InstitutionRecord {
        institution_id: format!("{province}-{organizer}"),
        geometry_id: province.len().to_string(),
        name: format!("Universitas {province}"),
        province: province.to_string(),
        organizer: organizer.to_string(),
        status: status.to_string(),
        code: String::new(),
        source: "PDDikti".to_string(),
        y2017: YearMetrics::default(),
        y2018: YearMetrics::default(),
        geometry: Some(square(province.len() as f64)),
    }
}

pub fn named(name: &str, province: &str) -> InstitutionRecord {
    InstitutionRecord {
        name: name.to_string(),
        ..record(province, "PTS", "Aktif")
    }
}

/// Province A has three records (two public), province B one private record.
pub fn two_provinces() -> Dataset {
    Dataset::from_records(vec![
        record("A", "public", "accredited"),
        record("A", "public", "accredited"),
        record("A", "private", "accredited"),
        record("B", "private", "non-accredited"),
    ])
}
