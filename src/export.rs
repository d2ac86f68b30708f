use std::path::{Path, PathBuf};

use log::info;

use crate::data::writer::save_table;
use crate::error::{ProcessingError, Result};
use crate::result::ProcessingResult;

/// Write every table of `result` into `dir` as `<name>.<extension>`.
///
/// Returns the written paths in export order.
pub fn export_tables(
    result: &ProcessingResult,
    dir: &Path,
    delimiter: u8,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|source| ProcessingError::FileAccess {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for (kind, table) in result.named_tables() {
        let path = dir.join(format!("{}.{extension}", kind.file_stem()));
        save_table(table, &path, delimiter)?;
        written.push(path);
    }
    info!("Exported {} tables to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;
    use crate::data::model::{MeasurementTable, WavelengthColumn};
    use crate::pipeline::{process_tables, LogObserver};

    #[test]
    fn writes_one_file_per_table() {
        let signal = MeasurementTable::new(
            "Time",
            vec![0.0, 1.0, 2.0],
            vec![WavelengthColumn::new("500", 500.0, vec![3.0, 4.0, 5.0])],
        );
        let reference = MeasurementTable::new(
            "Time",
            vec![0.0, 1.0, 2.0],
            vec![WavelengthColumn::new("500", 500.0, vec![1.0, 1.0, 1.0])],
        );
        let result = process_tables(signal, Some(reference), 1, &mut LogObserver).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run");
        let written = export_tables(&result, &out, b',', "csv").unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "signal.csv",
                "reference_dark.csv",
                "common_signal.csv",
                "common_reference_dark.csv",
                "common_signal_minus_common_reference.csv",
                "moving_average.csv",
            ]
        );

        let difference = load_file(&out.join("common_signal_minus_common_reference.csv")).unwrap();
        assert_eq!(difference.columns[0].values, vec![2.0, 3.0, 4.0]);
    }
}
