use std::collections::BTreeMap;
use std::sync::Arc;

use super::geometry::Geometry;
use super::model::{InstitutionRecord, ProvinceShape, Year};

// ---------------------------------------------------------------------------
// Province counts and percentage shares
// ---------------------------------------------------------------------------

/// Count and share of one province within one population.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceAggregate {
    pub province: String,
    pub count: usize,
    /// `count / population total * 100`; `0.0` for an empty population.
    pub percentage: f64,
    /// Geometry of a representative record of the province.
    pub geometry: Option<Arc<Geometry>>,
}

/// Per-province aggregate of one population, keyed by province.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    entries: BTreeMap<String, ProvinceAggregate>,
    total: usize,
}

impl Aggregate {
    /// Group the population by province and compute each province's share of it.
    pub fn of<'a>(records: impl IntoIterator<Item = &'a InstitutionRecord>) -> Self {
        let mut entries: BTreeMap<String, ProvinceAggregate> = BTreeMap::new();
        let mut total = 0;

        for r in records {
            total += 1;
            let entry = entries
                .entry(r.province.clone())
                .or_insert_with(|| ProvinceAggregate {
                    province: r.province.clone(),
                    count: 0,
                    percentage: 0.0,
                    geometry: None,
                });
            entry.count += 1;
            if entry.geometry.is_none() {
                entry.geometry = r.geometry.clone();
            }
        }

        for entry in entries.values_mut() {
            entry.percentage = share(entry.count, total);
        }

        Aggregate { entries, total }
    }

    /// Add zero entries for `shapes` that have no member in this population.
    ///
    /// Every entry ends up with the province's outline, also when the
    /// matching records themselves carry no geometry.
    pub fn including(mut self, shapes: &[ProvinceShape]) -> Self {
        for shape in shapes {
            let entry = self
                .entries
                .entry(shape.province.clone())
                .or_insert_with(|| ProvinceAggregate {
                    province: shape.province.clone(),
                    count: 0,
                    percentage: 0.0,
                    geometry: None,
                });
            if entry.geometry.is_none() {
                entry.geometry = shape.geometry.clone();
            }
        }
        self
    }

    pub fn get(&self, province: &str) -> Option<&ProvinceAggregate> {
        self.entries.get(province)
    }

    /// Percentage of `province`, `0.0` when the province has no entry.
    pub fn percentage_of(&self, province: &str) -> f64 {
        self.get(province).map_or(0.0, |e| e.percentage)
    }

    pub fn count_of(&self, province: &str) -> usize {
        self.get(province).map_or(0, |e| e.count)
    }

    /// Entries in province key order.
    pub fn iter(&self) -> impl Iterator<Item = &ProvinceAggregate> {
        self.entries.values()
    }

    /// Size of the population this aggregate was computed from.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by count descending, ties by province key.
    pub fn by_count_desc(&self) -> Vec<&ProvinceAggregate> {
        let mut sorted: Vec<&ProvinceAggregate> = self.entries.values().collect();
        // `values()` is key-ordered and the sort is stable.
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }

    /// Provinces with at least one member.
    pub fn covered_provinces(&self) -> usize {
        self.entries.values().filter(|e| e.count > 0).count()
    }
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

// ---------------------------------------------------------------------------
// Staff / student sums per province and year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct YearTotals {
    pub staff: f64,
    pub students: f64,
}

/// Staff and student sums of one province for both tracked years.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceMetrics {
    pub province: String,
    pub years: BTreeMap<Year, YearTotals>,
}

impl ProvinceMetrics {
    pub fn year(&self, year: Year) -> YearTotals {
        self.years.get(&year).copied().unwrap_or_default()
    }

    /// Sum of all four staff / student figures; only used for ordering.
    pub fn total(&self) -> f64 {
        self.years.values().map(|t| t.staff + t.students).sum()
    }
}

/// Sum staff and students per province and year, sorted by descending total.
///
/// Ties are ordered by province key, so the result does not depend on row
/// order. Missing cells count as zero.
pub fn aggregate_metrics<'a>(
    records: impl IntoIterator<Item = &'a InstitutionRecord>,
) -> Vec<ProvinceMetrics> {
    let mut grouped: BTreeMap<&str, BTreeMap<Year, YearTotals>> = BTreeMap::new();
    for r in records {
        let years = grouped.entry(r.province.as_str()).or_default();
        for year in Year::ALL {
            let m = r.metrics(year);
            let totals = years.entry(year).or_default();
            totals.staff += m.staff.unwrap_or(0.0);
            totals.students += m.students.unwrap_or(0.0);
        }
    }

    let mut metrics: Vec<ProvinceMetrics> = grouped
        .into_iter()
        .map(|(province, years)| ProvinceMetrics {
            province: province.to_string(),
            years,
        })
        .collect();

    // `grouped` is key-ordered and the sort is stable.
    metrics.sort_by(|a, b| b.total().total_cmp(&a.total()));
    metrics
}
