use std::io;
use std::path::Path;

use super::model::MeasurementTable;
use crate::error::{ProcessingError, Result};

/// Write `table` as delimited text: a header row (time label, then the original
/// wavelength labels) followed by one row per time point.
///
/// Values use the shortest decimal form that parses back to the same `f64`.
pub fn write_table<W: io::Write>(
    table: &MeasurementTable,
    writer: W,
    delimiter: u8,
) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    let header = std::iter::once(table.time_label.as_str())
        .chain(table.columns.iter().map(|c| c.label.as_str()));
    wtr.write_record(header)?;

    let mut row = Vec::with_capacity(table.width() + 1);
    for (i, t) in table.time.iter().enumerate() {
        row.clear();
        row.push(t.to_string());
        row.extend(table.columns.iter().map(|c| c.values[i].to_string()));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Serialise `table` into a string.
pub fn table_to_string(table: &MeasurementTable, delimiter: u8) -> Result<String> {
    let mut buf = Vec::new();
    write_table(table, &mut buf, delimiter).map_err(|source| ProcessingError::Write {
        path: "<memory>".into(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `table` to `path`, replacing any existing file.
pub fn save_table(table: &MeasurementTable, path: &Path, delimiter: u8) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| ProcessingError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    write_table(table, io::BufWriter::new(file), delimiter).map_err(|source| {
        ProcessingError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}
