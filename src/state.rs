use crate::config::ColumnLayout;
use crate::data::{apply, find_by_key, Dataset, FilterSpec, FilteredView, OverviewSummary, Row};
use crate::error::{Result, SheetError};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The two dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Details,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Overview, Tab::Details];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "generalidades",
            Tab::Details => "detalles",
        }
    }
}

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Column roles from the configuration.
    pub layout: ColumnLayout,

    /// Loaded dataset (None until the first successful load).
    pub dataset: Option<Dataset>,

    /// Overview filter selections.
    pub filters: FilterSpec,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub tab: Tab,

    /// Entity shown on the details tab.
    pub selected_entity: Option<String>,

    /// Where the dataset came from, for the status line.
    pub source_label: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether reloading might clear `status_message`.
    pub can_retry: bool,

    /// Last failure of a filter or summary, shown instead of the overview.
    pub view_error: Option<SheetError>,
}

impl AppState {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset, reset filters and the selection.
    pub fn set_dataset(&mut self, dataset: Dataset, source_label: String) {
        self.filters = FilterSpec::new();
        self.visible_indices = (0..dataset.len()).collect();
        self.selected_entity = dataset
            .column_values(&self.layout.entity)
            .ok()
            .and_then(|values| values.into_iter().next());

        let missing: Vec<&str> = self
            .layout
            .filter_columns()
            .into_iter()
            .chain([self.layout.entity.as_str()])
            .filter(|col| !dataset.has_column(col))
            .collect();
        self.status_message = if missing.is_empty() {
            None
        } else {
            Some(format!("Sheet is missing column(s): {}", missing.join(", ")))
        };

        self.can_retry = false;
        self.dataset = Some(dataset);
        self.source_label = Some(source_label);
        self.view_error = None;
    }

    /// Record a failed load; the previous dataset (if any) stays visible.
    pub fn set_load_error(&mut self, err: &SheetError) {
        log::error!("loading the sheet failed: {err}");
        self.status_message = Some(format!("{} ({err})", err.user_message()));
        self.can_retry = err.is_recoverable();
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        match apply(ds, &self.filters) {
            Ok(view) => {
                self.visible_indices = view.indices().to_vec();
                self.view_error = None;
            }
            Err(err) => {
                log::warn!("filter failed: {err}");
                self.visible_indices.clear();
                self.view_error = Some(err);
            }
        }
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &str) {
        self.filters.toggle(column, value);
        self.refilter();
    }

    /// Remove every constraint on a column.
    pub fn clear_filter(&mut self, column: &str) {
        self.filters.clear_column(column);
        self.refilter();
    }

    /// The filtered rows, as of the last `refilter`.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        let ds = self.dataset.as_ref()?;
        Some(FilteredView::from_indices(ds, self.visible_indices.clone()))
    }

    /// Options for a filter: distinct values over the whole dataset.
    pub fn filter_options(&self, column: &str) -> Result<Vec<String>> {
        match &self.dataset {
            Some(ds) => ds.column_values(column),
            None => Ok(Vec::new()),
        }
    }

    /// Entities offered on the details tab, in sheet order.
    pub fn entity_options(&self) -> Result<Vec<String>> {
        self.filter_options(&self.layout.entity)
    }

    pub fn select_entity(&mut self, entity: String) {
        self.selected_entity = Some(entity);
    }

    /// Row of the selected entity.
    pub fn selected_row(&self) -> Option<Result<&Row>> {
        let ds = self.dataset.as_ref()?;
        let entity = self.selected_entity.as_deref()?;
        Some(find_by_key(ds, &self.layout.entity, entity))
    }

    /// Overview metrics of the filtered rows.
    pub fn summary(&self) -> Option<Result<OverviewSummary>> {
        let view = self.view()?;
        Some(OverviewSummary::compute(&view, &self.layout))
    }
}
