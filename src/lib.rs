//! Transient absorption analyser.
//!
//! Loads a time-resolved signal measurement and an optional reference (dark)
//! measurement, aligns them on their common wavelengths and time points,
//! subtracts the reference and smooths the result with a moving average.
//!
//! ```no_run
//! use ta_analyser::{process_files, LogObserver, ProcessingRequest};
//!
//! let request = ProcessingRequest::new("signal.csv", 5).with_reference("dark.csv");
//! let result = process_files(&request, &mut LogObserver)?;
//! println!("{}", result.summary());
//! # Ok::<(), ta_analyser::ProcessingError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod result;
pub mod session;

pub use config::AnalysisConfig;
pub use data::model::{MeasurementTable, WavelengthColumn, WavelengthKey};
pub use error::ProcessingError;
pub use pipeline::{
    process_files, process_tables, LogObserver, ProcessingEvent, ProcessingRequest,
    ProgressObserver,
};
pub use result::{ProcessingResult, TableKind};
pub use session::AnalysisSession;
