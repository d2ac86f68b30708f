use std::path::PathBuf;

use thiserror::Error;

/// Every way a processing run can fail.
///
/// All variants are recoverable: the run is aborted, the message is shown to the
/// user, and a corrected input can be retried.
#[derive(Debug, Error)]
pub enum ProcessingError {
    // -- Loading --
    #[error("Unsupported file format '.{extension}'. Use .csv, .txt, .xls or .xlsx")]
    UnsupportedFormat { extension: String },

    #[error("Could not access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("The file is empty: {}", path.display())]
    EmptyFile { path: PathBuf },

    #[error(
        "Invalid data format: found {columns} column(s). The first column must hold time \
         points and at least one further column must hold a wavelength"
    )]
    MalformedHeader { columns: usize },

    #[error("Invalid column header '{header}'. All columns except the first must be wavelength values")]
    InvalidWavelengthHeader { header: String },

    #[error("Wavelength column '{header}' appears more than once")]
    DuplicateWavelength { header: String },

    #[error("Invalid value '{value}' in column '{column}' (data row {row}). All values must be numeric")]
    NonNumericData {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Malformed record: {message}")]
    MalformedRecord { message: String },

    #[error("Could not read spreadsheet {}: {message}", path.display())]
    Spreadsheet { path: PathBuf, message: String },

    // -- Validation --
    #[error("Signal data is empty")]
    EmptyDataset,

    #[error("Not enough data points ({rows}) for moving average window size ({window})")]
    InsufficientData { rows: usize, window: usize },

    #[error("Moving average window size must be at least 1 (got {window})")]
    InvalidWindowSize { window: usize },

    // -- Alignment --
    #[error("No common wavelengths found between signal and reference")]
    NoCommonWavelengths,

    #[error("No common time points found between signal and reference")]
    NoCommonTimePoints,

    // -- Output / configuration --
    #[error("Could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid configuration file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, ProcessingError>;
