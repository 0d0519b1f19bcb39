use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt32Type};
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, Row};

/// Text tokens read as missing values, the default `na_values` of
/// `pandas.read_csv`. The empty string is handled separately.
const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one record per line (the shipped dataset)
/// * `.json`    – `[{ "Country": "...", "AgeGroup": "...", ... }, ...]`
/// * `.parquet` – any flat schema of string / integer / float / bool columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.column_names,
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    load_csv_reader(file)
}

/// Parse CSV from any reader: header row with column names, every cell typed
/// individually by [`guess_cell_type`].
pub fn load_csv_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells = record.iter().map(guess_cell_type).collect();
        rows.push(Row { cells });
    }

    Dataset::new(headers, rows)
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() || NULL_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "true" | "True" => CellValue::Bool(true),
        "false" | "False" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Columns are the union of keys in first-seen order; absent keys are null.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| Row {
            cells: columns
                .iter()
                .map(|c| obj.get(c).map_or(CellValue::Null, json_to_cell))
                .collect(),
        })
        .collect();

    Dataset::new(columns, rows)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file as written by `df.to_parquet()` or Polars'
/// `write_parquet()`. Nested columns are rendered as their type name.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect();
            rows.push(Row { cells });
        }
    }

    Dataset::new(columns, rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => CellValue::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::ColumnKind;

    #[test]
    fn csv_cells_are_typed_individually() {
        let text = "Country,AgeGroup,Value,Flag\nKenya,15-19,12.5,true\nPeru,20-24,NA,false\n";
        let ds = load_csv_reader(text.as_bytes()).unwrap();

        assert_eq!(ds.column_names, vec!["Country", "AgeGroup", "Value", "Flag"]);
        assert_eq!(ds.rows[0].cells[2], CellValue::Float(12.5));
        assert_eq!(ds.rows[1].cells[2], CellValue::Null);
        assert_eq!(ds.kinds[2], ColumnKind::Float);
        assert_eq!(ds.kinds[3], ColumnKind::Boolean);
        // "15-19" must not be read as a number
        assert_eq!(ds.kinds[1], ColumnKind::Text);
    }

    #[test]
    fn pandas_missing_tokens_keep_columns_numeric() {
        let text = "Start,Value,Note
                    1990,1.5,-
                    1991,None,n/a
                    1992,3.5,<NA>
                    1993,n/a,#N/A
                    1994,-1.#IND,1.#QNAN
";
        let ds = load_csv_reader(text.as_bytes()).unwrap();

        assert_eq!(ds.kinds, vec![ColumnKind::Integer, ColumnKind::Float, ColumnKind::Text]);
        assert_eq!(ds.rows[1].cells[1], CellValue::Null);
        assert_eq!(ds.rows[4].cells[1], CellValue::Null);
        // a bare dash is data, not a missing marker
        assert_eq!(ds.rows[0].cells[2], CellValue::String("-".into()));
        assert!(ds.rows[1..].iter().all(|r| r.cells[2].is_null()));

        let numeric: Vec<&str> = ds.numeric_columns().into_iter().map(|(_, n)| n).collect();
        assert_eq!(numeric, vec!["Start", "Value"]);
    }

    #[test]
    fn ragged_csv_is_an_error() {
        let text = "a,b\n1,2\n3\n";
        assert!(load_csv_reader(text.as_bytes()).is_err());
    }

    #[test]
    fn json_records_fill_absent_keys_with_null() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"Country":"Chile","Value":3}},{{"Country":"Iran","Extra":1.5}}]"#
        )
        .unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.column_names, vec!["Country", "Value", "Extra"]);
        assert_eq!(ds.rows[1].cells[1], CellValue::Null);
        assert_eq!(ds.rows[1].cells[2], CellValue::Float(1.5));
    }

    #[test]
    fn parquet_columns_map_to_cells() {
        use std::sync::Arc;

        use arrow::array::{Float64Array, Int32Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Country", DataType::Utf8, false),
            Field::new("Data Collection (Start Year)", DataType::Int32, false),
            Field::new("Value", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Chile", "Iran"])),
                Arc::new(Int32Array::from(vec![1992, 2006])),
                Arc::new(Float64Array::from(vec![Some(41.5), None])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0].cells[1], CellValue::Integer(1992));
        assert_eq!(ds.rows[1].cells[2], CellValue::Null);
        assert_eq!(ds.kinds[2], ColumnKind::Float);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_file(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.csv"));
    }
}
