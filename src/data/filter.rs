use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dataset, Row};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Filter predicate: which values are accepted per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of accepted values.
/// If a column is absent or its set is empty, it means "no filter" (show all).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    columns: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSpec::set`].
    pub fn with<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(column, values);
        self
    }

    /// Replace the accepted set for `column`.
    pub fn set<I, S>(&mut self, column: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.insert(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        );
    }

    /// Add `value` to the column's accepted set, or remove it if present.
    pub fn toggle(&mut self, column: &str, value: &str) {
        let selected = self.columns.entry(column.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Drop every constraint on `column`.
    pub fn clear_column(&mut self, column: &str) {
        self.columns.remove(column);
    }

    /// Accepted values for `column` (empty when unconstrained).
    pub fn accepted(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.columns.get(column)
    }

    pub fn is_selected(&self, column: &str, value: &str) -> bool {
        self.columns
            .get(column)
            .is_some_and(|selected| selected.contains(value))
    }

    /// Whether any column actually constrains the rows.
    pub fn is_active(&self) -> bool {
        self.columns.values().any(|selected| !selected.is_empty())
    }

    /// Constrained columns only: `(column, accepted values)`.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.columns
            .iter()
            .filter(|(_, selected)| !selected.is_empty())
            .map(|(col, selected)| (col.as_str(), selected))
    }
}

// ---------------------------------------------------------------------------
// FilteredView – rows of a dataset that pass a FilterSpec
// ---------------------------------------------------------------------------

/// Read-only subset of a [`Dataset`], stored as row indices in dataset order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// A view over every row of the dataset.
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            indices: (0..dataset.len()).collect(),
        }
    }

    /// A view over precomputed indices (as kept by the UI state).
    pub(crate) fn from_indices(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        Self { dataset, indices }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Dataset positions of the visible rows.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The `i`-th visible row.
    pub fn row(&self, i: usize) -> Option<&'a Row> {
        let idx = *self.indices.get(i)?;
        self.dataset.row(idx)
    }

    /// Visible rows in dataset order.
    pub fn rows(&self) -> impl Iterator<Item = &'a Row> + '_ {
        let rows = self.dataset.rows();
        self.indices.iter().map(move |&i| &rows[i])
    }

    /// Owned copies of the visible rows.
    pub fn to_rows(&self) -> Vec<Row> {
        self.rows().cloned().collect()
    }
}

/// Return the rows of `dataset` that pass every constraint of `spec`.
///
/// A row passes a column constraint when:
/// * The column is not present in `spec` → passes (no constraint)
/// * The accepted set for that column is empty → passes (no constraint)
/// * The row's value for that column is in the accepted set → passes
///
/// A constrained column missing from the schema is an error.
pub fn apply<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> Result<FilteredView<'a>> {
    let mut constraints = Vec::new();
    for (col, selected) in spec.constraints() {
        constraints.push((dataset.column_index(col)?, selected));
    }

    let indices = dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            constraints.iter().all(|(idx, selected)| {
                row.value_at(*idx)
                    .is_some_and(|value| selected.contains(value))
            })
        })
        .map(|(i, _)| i)
        .collect();

    Ok(FilteredView { dataset, indices })
}
