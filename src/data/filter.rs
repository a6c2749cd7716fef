use std::collections::BTreeSet;

use super::model::InstitutionRecord;

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per dimension
// ---------------------------------------------------------------------------

/// The three selector dimensions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Province,
    Organizer,
    Status,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Province, Dimension::Organizer, Dimension::Status];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Province => "Provinsi",
            Dimension::Organizer => "Penyelenggara",
            Dimension::Status => "Status",
        }
    }

    pub fn value_of(self, record: &InstitutionRecord) -> &str {
        match self {
            Dimension::Province => &record.province,
            Dimension::Organizer => &record.organizer,
            Dimension::Status => &record.status,
        }
    }
}

/// Per-dimension selections.
///
/// An empty set means "no restriction on this dimension", never "exclude everything".
/// The dimensions combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub provinces: BTreeSet<String>,
    pub organizers: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
}

impl FilterState {
    pub fn selection(&self, dim: Dimension) -> &BTreeSet<String> {
        match dim {
            Dimension::Province => &self.provinces,
            Dimension::Organizer => &self.organizers,
            Dimension::Status => &self.statuses,
        }
    }

    pub fn selection_mut(&mut self, dim: Dimension) -> &mut BTreeSet<String> {
        match dim {
            Dimension::Province => &mut self.provinces,
            Dimension::Organizer => &mut self.organizers,
            Dimension::Status => &mut self.statuses,
        }
    }

    /// Add the value if absent, remove it if present.
    pub fn toggle(&mut self, dim: Dimension, value: &str) {
        let selected = self.selection_mut(dim);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }

    /// Whether no dimension restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.selection(*d).is_empty())
    }

    pub fn matches(&self, record: &InstitutionRecord) -> bool {
        Dimension::ALL.iter().all(|dim| {
            let selected = self.selection(*dim);
            selected.is_empty() || selected.contains(dim.value_of(record))
        })
    }
}

/// Records passing all active filters, in input order.
pub fn filter_records<'a>(
    records: impl IntoIterator<Item = &'a InstitutionRecord>,
    filters: &FilterState,
) -> Vec<&'a InstitutionRecord> {
    records
        .into_iter()
        .filter(|r| filters.matches(r))
        .collect()
}

/// Indices (into `records`) of rows passing all active filters, ascending.
pub fn filtered_indices(records: &[InstitutionRecord], filters: &FilterState) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| filters.matches(r))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Name search (table view)
// ---------------------------------------------------------------------------

/// Narrow `indices` to records whose name contains `term`, ignoring case.
/// An empty term keeps everything.
pub fn search_by_name(records: &[InstitutionRecord], indices: &[usize], term: &str) -> Vec<usize> {
    if term.is_empty() {
        return indices.to_vec();
    }
    let needle = term.to_lowercase();
    indices
        .iter()
        .copied()
        .filter(|&i| records[i].name.to_lowercase().contains(&needle))
        .collect()
}
