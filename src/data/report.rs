use super::aggregate::{aggregate_metrics, Aggregate, ProvinceMetrics};
use super::choropleth::{bind, ChoroplethLayer};
use super::export::{CsvDownload, ExportError};
use super::filter::{filtered_indices, FilterState};
use super::model::{unique_in_order, Dataset, InstitutionRecord};

/// Headline numbers of the filtered population.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub institutions: usize,
    pub provinces: usize,
    /// Distinct organizer types, in order of first appearance.
    pub organizers: Vec<String>,
}

/// Everything derived from one `(dataset, filters)` pair.
///
/// Rebuilt in full on every filter change; nothing here is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Indices of records passing the filters, ascending.
    pub filtered: Vec<usize>,
    pub summary: Summary,
    /// Aggregate of the filtered population, with zero entries for the
    /// dataset's other provinces.
    pub filtered_aggregate: Aggregate,
    /// Aggregate of the complete dataset; fixes the colour domain.
    pub global_aggregate: Aggregate,
    pub map: ChoroplethLayer,
    /// Staff / student sums of the complete dataset, largest total first.
    pub metrics: Vec<ProvinceMetrics>,
}

impl Report {
    pub fn build(dataset: &Dataset, filters: &FilterState) -> Self {
        let filtered = filtered_indices(dataset.records(), filters);
        let records = || filtered.iter().map(|&i| &dataset.records()[i]);

        let filtered_aggregate = Aggregate::of(records()).including(dataset.shapes());

        let summary = Summary {
            institutions: filtered_aggregate.total(),
            provinces: filtered_aggregate.covered_provinces(),
            organizers: unique_in_order(records().map(|r| r.organizer.as_str())),
        };

        let global_aggregate = Aggregate::of(dataset.records());
        let map = bind(dataset.shapes(), &filtered_aggregate, &global_aggregate);
        let metrics = aggregate_metrics(dataset.records());

        log::debug!(
            "Refreshed report: {} of {} records match",
            filtered.len(),
            dataset.len()
        );

        Report {
            filtered,
            summary,
            filtered_aggregate,
            global_aggregate,
            map,
            metrics,
        }
    }

    pub fn filtered_records<'a>(
        &'a self,
        dataset: &'a Dataset,
    ) -> impl Iterator<Item = &'a InstitutionRecord> + 'a {
        self.filtered.iter().map(move |&i| &dataset.records()[i])
    }

    /// CSV of the filtered records (the name search does not apply).
    pub fn download(&self, dataset: &Dataset) -> Result<CsvDownload, ExportError> {
        CsvDownload::build(self.filtered_records(dataset))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::Dimension;
    use crate::data::fixtures::{record, two_provinces};

    const EPS: f64 = 1e-9;

    /// Every combination of selections over the dataset's own values,
    /// plus a value that matches nothing.
    fn all_filter_states(ds: &Dataset) -> Vec<FilterState> {
        let options = |values: &[String]| -> Vec<BTreeSet<String>> {
            let mut values = values.to_vec();
            values.push("none-such".to_string());
            (0..1u32 << values.len())
                .map(|mask| {
                    values
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| mask & (1 << i) != 0)
                        .map(|(_, v)| v.clone())
                        .collect()
                })
                .collect()
        };

        let mut states = Vec::new();
        for provinces in options(ds.provinces()) {
            for organizers in options(ds.organizers()) {
                for statuses in options(ds.statuses()) {
                    states.push(FilterState {
                        provinces: provinces.clone(),
                        organizers: organizers.clone(),
                        statuses,
                    });
                }
            }
        }
        states
    }

    #[test]
    fn percentages_hold_for_every_filter_combination() {
        let ds = two_provinces();
        let baseline = Report::build(&ds, &FilterState::default());

        for filters in all_filter_states(&ds) {
            let report = Report::build(&ds, &filters);
            let sum: f64 = report.filtered_aggregate.iter().map(|e| e.percentage).sum();
            if report.filtered.is_empty() {
                assert!(
                    report.filtered_aggregate.iter().all(|e| e.percentage == 0.0),
                    "{filters:?}"
                );
            } else {
                assert!((sum - 100.0).abs() < EPS, "{filters:?}: {sum}");
            }
            assert_eq!(report.map.provinces.len(), ds.shapes().len(), "{filters:?}");
            assert_eq!(report.map.domain, baseline.map.domain, "{filters:?}");
            assert_eq!(report.global_aggregate, baseline.global_aggregate);
        }
    }

    #[test]
    fn summary_of_filtered_population() {
        let ds = two_provinces();
        let filters = FilterState {
            organizers: ["private".to_string()].into(),
            ..Default::default()
        };
        let report = Report::build(&ds, &filters);
        assert_eq!(
            report.summary,
            Summary {
                institutions: 2,
                provinces: 2,
                organizers: vec!["private".to_string()],
            }
        );
    }

    #[test]
    fn zero_matches_is_an_empty_valid_report() {
        let ds = two_provinces();
        let mut filters = FilterState::default();
        filters.toggle(Dimension::Province, "nowhere");
        let report = Report::build(&ds, &filters);

        assert_eq!(report.summary, Summary::default());
        assert_eq!(report.filtered_aggregate.len(), 2);
        assert_eq!(report.map.provinces.len(), 2);
        let download = report.download(&ds).unwrap();
        assert_eq!(String::from_utf8(download.contents).unwrap().lines().count(), 1);
    }

    #[test]
    fn metrics_cover_the_complete_dataset() {
        let ds = Dataset::from_records(vec![record("A", "p", "s"), record("B", "q", "s")]);
        let filters = FilterState {
            provinces: ["A".to_string()].into(),
            ..Default::default()
        };
        let report = Report::build(&ds, &filters);
        assert_eq!(report.metrics.len(), 2);
    }

    #[test]
    fn download_contains_only_filtered_rows() {
        let ds = two_provinces();
        let filters = FilterState {
            provinces: ["B".to_string()].into(),
            ..Default::default()
        };
        let report = Report::build(&ds, &filters);
        let text = String::from_utf8(report.download(&ds).unwrap().contents).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().contains(",B,"));
    }
}
