use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::filter::FilteredView;

/// Name offered by the save dialog.
pub const DEFAULT_EXPORT_NAME: &str = "filtered_data.csv";

/// Write the view as CSV: header in dataset column order, then the rows.
/// Nulls become empty fields so the file loads back to the same rows.
pub fn write_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&view.dataset.column_names)
        .context("writing CSV header")?;
    for (n, row) in view.rows().enumerate() {
        out.write_record(row.cells.iter().map(|c| c.to_string()))
            .with_context(|| format!("writing CSV row {n}"))?;
    }
    out.flush().context("flushing CSV output")?;
    Ok(())
}

/// In-memory CSV, as handed to a download button.
pub fn to_csv_bytes(view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(buf)
}

pub fn export_to_path(view: &FilteredView<'_>, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(view, std::io::BufWriter::new(file))?;
    info!("Exported {} rows to {}", view.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::RowSet;
    use crate::data::loader::load_csv_reader;

    const TEXT: &str = "Country,Sex,Value\n\"Korea, Rep.\",F,1.5\nChad,M,\nChad,F,7\n";

    #[test]
    fn subset_round_trips_through_csv() {
        let ds = load_csv_reader(TEXT.as_bytes()).unwrap();
        let rows = RowSet { indices: vec![0, 1] };
        let bytes = to_csv_bytes(&rows.view(&ds)).unwrap();

        let reloaded = load_csv_reader(bytes.as_slice()).unwrap();
        assert_eq!(reloaded.column_names, ds.column_names);
        assert_eq!(reloaded.rows, vec![ds.rows[0].clone(), ds.rows[1].clone()]);
    }

    #[test]
    fn quoted_commas_survive_export() {
        let ds = load_csv_reader(TEXT.as_bytes()).unwrap();
        let bytes = to_csv_bytes(&RowSet::all(&ds).view(&ds)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"Korea, Rep.\""));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn export_writes_file() {
        let ds = load_csv_reader(TEXT.as_bytes()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_NAME);

        export_to_path(&RowSet::all(&ds).view(&ds), &path).unwrap();
        let reloaded = crate::data::loader::load_file(&path).unwrap();
        assert_eq!(reloaded.rows, ds.rows);
    }
}
