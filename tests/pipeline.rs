//! End-to-end tests: load → filter → analyse → export.

use std::collections::BTreeSet;
use std::io::Write;

use marriage_explorer::analysis::{correlation, counts};
use marriage_explorer::data::export::to_csv_bytes;
use marriage_explorer::data::filter::apply;
use marriage_explorer::data::loader::{load_csv_reader, load_file};
use marriage_explorer::data::model::{AGE_GROUP, COUNTRY, MARITAL_STATUS, SEX};
use marriage_explorer::{CellValue, Dataset, ExplorationReport, FilterCriteria, RowSet};
use tempfile::NamedTempFile;

const HEADER: &str = "Country,AgeGroup,Sex,MaritalStatus,Data Collection (Start Year),Data Collection (End Year),Value";

fn s(v: &str) -> CellValue {
    CellValue::String(v.to_string())
}

fn set(values: &[&str]) -> BTreeSet<CellValue> {
    values.iter().map(|v| s(v)).collect()
}

/// Create a test CSV file with sample data
fn create_test_csv() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    let rows = [
        "Argentina,20-24,Female,Married,2001,2001,31.2",
        "Argentina,20-24,Female,Single,2001,2001,60.4",
        "Argentina,20-24,Male,Married,2001,2001,18.9",
        "Argentina,30-34,Male,Divorced,2001,2001,4.5",
        "Japan,20-24,Female,Single,2010,2010,88.0",
        "Japan,30-34,Female,Married,2010,2010,",
        "Japan,30-34,Male,Widowed,1995,1996,0.4",
        "Kenya,15-19,Female,Married,1989,1993,22.1",
        "Kenya,15-19,Male,Single,1989,1993,97.3",
        "Kenya,15-19,Male,Single,1989,1993,97.3",
    ];
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

fn load() -> Dataset {
    let file = create_test_csv();
    load_file(file.path()).unwrap()
}

#[test]
fn filtering_example_from_two_rows() {
    let text = "Country,AgeGroup,Sex,MaritalStatus\nA,20-29,M,Married\nB,20-29,F,Single\n";
    let ds = load_csv_reader(text.as_bytes()).unwrap();
    let mut criteria = FilterCriteria::default();
    criteria.set(COUNTRY, set(&["A"]));

    let rows = apply(&ds, &criteria).unwrap();
    let view = rows.view(&ds);
    let selected: Vec<_> = view.rows().cloned().collect();
    assert_eq!(selected, vec![ds.rows[0].clone()]);
}

#[test]
fn filtered_rows_match_every_selection() {
    let ds = load();
    let mut criteria = FilterCriteria::default();
    criteria.set(COUNTRY, set(&["Argentina", "Kenya"]));
    criteria.set(SEX, set(&["Male"]));

    let rows = apply(&ds, &criteria).unwrap();
    assert_eq!(rows.len(), 4);

    let country = ds.column_index(COUNTRY).unwrap();
    let sex = ds.column_index(SEX).unwrap();
    for row in rows.view(&ds).rows() {
        assert!(set(&["Argentina", "Kenya"]).contains(&row.cells[country]));
        assert_eq!(row.cells[sex], s("Male"));
    }
}

#[test]
fn filtered_view_is_subset_of_dataset() {
    let ds = load();
    let mut criteria = FilterCriteria::default();
    criteria.set(AGE_GROUP, set(&["20-24", "30-34"]));

    let rows = apply(&ds, &criteria).unwrap();
    assert!(rows.indices.windows(2).all(|w| w[0] < w[1]));
    for row in rows.view(&ds).rows() {
        assert!(ds.rows.contains(row));
    }
    assert!(rows.len() <= ds.len());
}

#[test]
fn empty_selection_returns_everything() {
    let ds = load();
    let rows = apply(&ds, &FilterCriteria::default()).unwrap();
    assert_eq!(rows, RowSet::all(&ds));
}

#[test]
fn status_counts_sum_to_filtered_rows() {
    let ds = load();
    let mut criteria = FilterCriteria::default();
    criteria.set(COUNTRY, set(&["Japan", "Kenya"]));
    let rows = apply(&ds, &criteria).unwrap();

    let counts = counts::value_counts(&rows.view(&ds), MARITAL_STATUS).unwrap();
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    assert_eq!(total, rows.len());
}

#[test]
fn correlation_matrix_is_symmetric_with_unit_diagonal() {
    let ds = load();
    let m = correlation::correlation_matrix(&RowSet::all(&ds).view(&ds)).unwrap();

    assert_eq!(m.columns.len(), 3);
    for i in 0..m.columns.len() {
        assert_eq!(m.values[i][i], 1.0);
        for j in 0..i {
            assert_eq!(m.values[i][j].to_bits(), m.values[j][i].to_bits());
        }
    }
}

#[test]
fn export_then_reload_reproduces_rows() {
    let ds = load();
    let mut criteria = FilterCriteria::default();
    criteria.set(COUNTRY, set(&["Japan"]));
    let rows = apply(&ds, &criteria).unwrap();

    let bytes = to_csv_bytes(&rows.view(&ds)).unwrap();
    let reloaded = load_csv_reader(bytes.as_slice()).unwrap();

    let expected: Vec<_> = rows.view(&ds).rows().cloned().collect();
    assert_eq!(reloaded.rows, expected);
    assert_eq!(reloaded.column_names, ds.column_names);
}

#[test]
fn report_covers_filtered_view() {
    let ds = load();
    let report = ExplorationReport::build(&RowSet::all(&ds).view(&ds));

    assert_eq!(report.row_count, 10);
    assert_eq!(report.duplicate_rows, 1);
    assert_eq!(report.columns_with_missing, vec![("Value".to_string(), 1)]);
    assert_eq!(report.boxplots.as_ref().unwrap().len(), 3);
    assert_eq!(report.status_by_sex.as_ref().unwrap().total(), 10);
    assert_eq!(report.scatter_axes.as_ref().unwrap().len(), 3);
}
