use std::collections::HashMap;

use super::filter::FilteredView;
use crate::config::ColumnLayout;
use crate::error::Result;

/// Number of rows in the view.
pub fn count(view: &FilteredView<'_>) -> usize {
    view.len()
}

/// Rows whose `column` equals `value` exactly (case-sensitive).
pub fn count_where(view: &FilteredView<'_>, column: &str, value: &str) -> Result<usize> {
    let idx = view.dataset().column_index(column)?;
    Ok(view
        .rows()
        .filter(|row| row.value_at(idx) == Some(value))
        .count())
}

/// `(value, count)` pairs for `column`, in first-occurrence order.
pub fn group_counts(view: &FilteredView<'_>, column: &str) -> Result<Vec<(String, usize)>> {
    let idx = view.dataset().column_index(column)?;
    let mut groups: Vec<(String, usize)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for row in view.rows() {
        let value = row.value_at(idx).unwrap_or_default();
        match slot.get(value) {
            Some(&i) => groups[i].1 += 1,
            None => {
                slot.insert(value, groups.len());
                groups.push((value.to_string(), 1));
            }
        }
    }
    Ok(groups)
}

// ---------------------------------------------------------------------------
// Overview metrics
// ---------------------------------------------------------------------------

/// Everything the overview tab shows about the filtered rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverviewSummary {
    pub total: usize,
    pub private: usize,
    pub public: usize,
    /// Distribution by agreement type (pie chart slices).
    pub by_agreement_type: Vec<(String, usize)>,
}

impl OverviewSummary {
    /// Compute the overview metrics using the configured column names.
    pub fn compute(view: &FilteredView<'_>, layout: &ColumnLayout) -> Result<Self> {
        Ok(Self {
            total: count(view),
            private: count_where(view, &layout.entity_type, &layout.private_value)?,
            public: count_where(view, &layout.entity_type, &layout.public_value)?,
            by_agreement_type: group_counts(view, &layout.agreement_type)?,
        })
    }
}
