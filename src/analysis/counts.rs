//! Category counts behind the histogram, bar and pie charts.

use std::collections::BTreeMap;

use crate::data::filter::FilteredView;
use crate::data::model::CellValue;
use crate::error::AnalysisError;

/// `(value, count)` pairs sorted by count descending, ties by value.
/// Null cells are not counted.
pub fn value_counts(
    view: &FilteredView<'_>,
    column: &str,
) -> Result<Vec<(CellValue, usize)>, AnalysisError> {
    let col = view.dataset.require_column(column)?;
    let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for value in view.column_values(col).filter(|v| !v.is_null()) {
        *counts.entry(value).or_default() += 1;
    }
    let mut pairs: Vec<(CellValue, usize)> =
        counts.into_iter().map(|(v, n)| (v.clone(), n)).collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(pairs)
}

/// Slice of a pie chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Proportion {
    pub value: CellValue,
    pub count: usize,
    pub fraction: f64,
}

pub fn proportions(
    view: &FilteredView<'_>,
    column: &str,
) -> Result<Vec<Proportion>, AnalysisError> {
    let counts = value_counts(view, column)?;
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    Ok(counts
        .into_iter()
        .map(|(value, count)| Proportion {
            value,
            count,
            fraction: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            },
        })
        .collect())
}

/// Counts of `x` categories split by a second `group` column, as drawn by a
/// grouped bar chart. `counts[g][c]` is the number of rows with
/// `group == groups[g]` and `x == categories[c]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupedCounts {
    pub x_column: String,
    pub group_column: String,
    pub categories: Vec<CellValue>,
    pub groups: Vec<CellValue>,
    pub counts: Vec<Vec<usize>>,
}

impl GroupedCounts {
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// Rows where either column is null are left out.
pub fn grouped_counts(
    view: &FilteredView<'_>,
    x_column: &str,
    group_column: &str,
) -> Result<GroupedCounts, AnalysisError> {
    let x = view.dataset.require_column(x_column)?;
    let g = view.dataset.require_column(group_column)?;

    let mut cells: BTreeMap<(&CellValue, &CellValue), usize> = BTreeMap::new();
    for row in view.rows() {
        let (xv, gv) = (&row.cells[x], &row.cells[g]);
        if xv.is_null() || gv.is_null() {
            continue;
        }
        *cells.entry((gv, xv)).or_default() += 1;
    }

    let mut categories: Vec<CellValue> = cells.keys().map(|(_, xv)| (*xv).clone()).collect();
    categories.sort();
    categories.dedup();
    let mut groups: Vec<CellValue> = cells.keys().map(|(gv, _)| (*gv).clone()).collect();
    groups.dedup();

    let counts = groups
        .iter()
        .map(|gv| {
            categories
                .iter()
                .map(|xv| cells.get(&(gv, xv)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    Ok(GroupedCounts {
        x_column: x_column.to_string(),
        group_column: group_column.to_string(),
        categories,
        groups,
        counts,
    })
}
