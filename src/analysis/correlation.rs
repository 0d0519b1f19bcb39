//! Pairwise Pearson correlation over the numeric columns.

use crate::data::filter::FilteredView;
use crate::error::AnalysisError;

/// Square correlation matrix; `values[i][j]` pairs `columns[i]` with
/// `columns[j]`. Undefined entries are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Correlate every pair of numeric columns using the rows where both values
/// are present. The diagonal is 1.0 for every column. A view without rows has
/// no numeric data to correlate.
pub fn correlation_matrix(view: &FilteredView<'_>) -> Result<CorrelationMatrix, AnalysisError> {
    let numeric = view.dataset.numeric_columns();
    if numeric.is_empty() || view.is_empty() {
        return Err(AnalysisError::NoNumericColumns("correlation analysis"));
    }

    let series: Vec<Vec<Option<f64>>> = numeric
        .iter()
        .map(|(col, _)| view.column_values(*col).map(|v| v.as_f64()).collect())
        .collect();

    let n = numeric.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: numeric.iter().map(|(_, name)| name.to_string()).collect(),
        values,
    })
}

/// Pearson's r over pairwise-complete observations, clamped to [-1, 1].
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::RowSet;
    use crate::data::loader::load_csv_reader;

    const TEXT: &str = "Country,Start,End,Share,Flat\n\
                        A,1990,1995,10.0,3\n\
                        B,2000,2004,20.5,3\n\
                        C,2010,2016,5.25,3\n\
                        D,1980,,40.0,3\n";

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let ds = load_csv_reader(TEXT.as_bytes()).unwrap();
        let m = correlation_matrix(&RowSet::all(&ds).view(&ds)).unwrap();

        assert_eq!(m.columns, vec!["Start", "End", "Share", "Flat"]);
        for i in 0..m.columns.len() {
            assert_eq!(m.values[i][i], 1.0);
            for j in 0..m.columns.len() {
                let (a, b) = (m.values[i][j], m.values[j][i]);
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
    }

    #[test]
    fn collinear_columns_correlate_perfectly() {
        let ds = load_csv_reader(TEXT.as_bytes()).unwrap();
        let rows = RowSet { indices: vec![0, 1] };
        let m = correlation_matrix(&rows.view(&ds)).unwrap();
        assert!((m.get("Start", "End").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pairwise_complete_rows_only() {
        // Row D has no End year; Start/End uses rows A-C only.
        let ds = load_csv_reader(TEXT.as_bytes()).unwrap();
        let m = correlation_matrix(&RowSet::all(&ds).view(&ds)).unwrap();
        let r = m.get("Start", "End").unwrap();
        assert!(r > 0.99 && r <= 1.0);
    }

    #[test]
    fn constant_column_is_undefined_off_diagonal() {
        let ds = load_csv_reader(TEXT.as_bytes()).unwrap();
        let m = correlation_matrix(&RowSet::all(&ds).view(&ds)).unwrap();
        assert!(m.get("Flat", "Share").unwrap().is_nan());
        assert_eq!(m.get("Flat", "Flat"), Some(1.0));
    }

    #[test]
    fn no_numeric_columns_is_reported() {
        let ds = load_csv_reader("Country,Sex\nA,M\n".as_bytes()).unwrap();
        let err = correlation_matrix(&RowSet::all(&ds).view(&ds)).unwrap_err();
        assert_eq!(err, AnalysisError::NoNumericColumns("correlation analysis"));
    }

    #[test]
    fn empty_view_has_nothing_to_correlate() {
        let ds = load_csv_reader(TEXT.as_bytes()).unwrap();
        let rows = RowSet::default();
        let err = correlation_matrix(&rows.view(&ds)).unwrap_err();
        assert_eq!(err, AnalysisError::NoNumericColumns("correlation analysis"));
    }
}
