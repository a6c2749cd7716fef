use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::geometry::Geometry;

// ---------------------------------------------------------------------------
// Year – the two tracked reporting years
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Year {
    Y2017,
    Y2018,
}

impl Year {
    pub const ALL: [Year; 2] = [Year::Y2017, Year::Y2018];

    pub fn as_u16(self) -> u16 {
        match self {
            Year::Y2017 => 2017,
            Year::Y2018 => 2018,
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Staff / student figures of one institution for one year.
/// Empty source cells are `None`; sums treat them as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct YearMetrics {
    pub staff: Option<f64>,
    pub students: Option<f64>,
    pub ratio: Option<f64>,
}

// ---------------------------------------------------------------------------
// InstitutionRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One `(institution, program)` row.
#[derive(Debug, Clone, PartialEq)]
pub struct InstitutionRecord {
    pub institution_id: String,
    pub geometry_id: String,
    pub name: String,
    pub province: String,
    pub organizer: String,
    pub status: String,
    pub code: String,
    pub source: String,
    pub y2017: YearMetrics,
    pub y2018: YearMetrics,
    /// Province outline; `None` when the WKT could not be parsed.
    /// Rows of the same province share one allocation.
    pub geometry: Option<Arc<Geometry>>,
}

impl InstitutionRecord {
    pub fn metrics(&self, year: Year) -> &YearMetrics {
        match year {
            Year::Y2017 => &self.y2017,
            Year::Y2018 => &self.y2018,
        }
    }
}

/// The `(province, geometry)` pair used to draw one map region.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceShape {
    pub province: String,
    pub geometry: Option<Arc<Geometry>>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full loaded dataset. Immutable after construction; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<InstitutionRecord>,
    provinces: Vec<String>,
    organizers: Vec<String>,
    statuses: Vec<String>,
    shapes: Vec<ProvinceShape>,
}

impl Dataset {
    /// Build the selector value lists and per-province shapes from the records.
    /// All lists are in order of first appearance.
    pub fn from_records(records: Vec<InstitutionRecord>) -> Self {
        let provinces = unique_in_order(records.iter().map(|r| r.province.as_str()));
        let organizers = unique_in_order(records.iter().map(|r| r.organizer.as_str()));
        let statuses = unique_in_order(records.iter().map(|r| r.status.as_str()));

        let shapes = provinces
            .iter()
            .map(|province| ProvinceShape {
                province: province.clone(),
                geometry: records
                    .iter()
                    .filter(|r| &r.province == province)
                    .find_map(|r| r.geometry.clone()),
            })
            .collect();

        Dataset {
            records,
            provinces,
            organizers,
            statuses,
            shapes,
        }
    }

    pub fn records(&self) -> &[InstitutionRecord] {
        &self.records
    }

    pub fn provinces(&self) -> &[String] {
        &self.provinces
    }

    pub fn organizers(&self) -> &[String] {
        &self.organizers
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    /// One entry per province, with the first parsed geometry of that province.
    pub fn shapes(&self) -> &[ProvinceShape] {
        &self.shapes
    }

    /// Records whose geometry could not be parsed.
    pub fn geometry_missing(&self) -> usize {
        self.records.iter().filter(|r| r.geometry.is_none()).count()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Distinct values in order of first appearance.
pub fn unique_in_order<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
