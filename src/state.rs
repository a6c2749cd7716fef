use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::SequentialScale;
use crate::data::filter::{search_by_name, Dimension, FilterState};
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::data::report::Report;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset. Never mutated; replaced wholesale by File → Open.
    pub dataset: Arc<Dataset>,

    /// Per-dimension filter selections.
    pub filters: FilterState,

    /// Institution-name search of the table view.
    pub search: String,

    /// Everything derived from `dataset` + `filters` (cached).
    pub report: Report,

    /// Indices of filtered records that also match `search` (cached).
    pub table_rows: Vec<usize>,

    /// Colour scale of the map, fixed by the unfiltered aggregate.
    pub map_scale: SequentialScale,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let filters = FilterState::default();
        let report = Report::build(&dataset, &filters);
        let map_scale = SequentialScale::greens(report.map.domain);
        let table_rows = report.filtered.clone();
        Self {
            dataset,
            filters,
            search: String::new(),
            report,
            table_rows,
            map_scale,
            status_message: None,
        }
    }

    /// Replace the session dataset and reset all selections.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        *self = AppState::new(dataset);
    }

    /// Load a new dataset from disk. On failure the current one stays.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let dataset = load_file(path).with_context(|| format!("loading {}", path.display()))?;
        self.set_dataset(Arc::new(dataset));
        Ok(())
    }

    /// Recompute the report after a filter change.
    pub fn refilter(&mut self) {
        self.report = Report::build(&self.dataset, &self.filters);
        self.research();
    }

    /// Recompute the table rows after a search change.
    pub fn research(&mut self) {
        self.table_rows = search_by_name(self.dataset.records(), &self.report.filtered, &self.search);
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &str) {
        self.filters.toggle(dim, value);
        self.refilter();
    }

    /// Remove every selection of one dimension.
    pub fn clear_dimension(&mut self, dim: Dimension) {
        self.filters.selection_mut(dim).clear();
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.refilter();
    }

    pub fn set_search(&mut self, term: String) {
        self.search = term;
        self.research();
    }

    /// Write the filtered table to `path`.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        self.report
            .download(&self.dataset)
            .context("building CSV export")?
            .save(path)
            .with_context(|| format!("saving {}", path.display()))
    }
}
