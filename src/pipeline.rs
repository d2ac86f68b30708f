use std::path::PathBuf;

use log::{info, warn};

use crate::data::align::align;
use crate::data::loader::load_file;
use crate::data::model::MeasurementTable;
use crate::data::smooth::smooth_table;
use crate::data::validate::validate;
use crate::error::{ProcessingError, Result};
use crate::result::ProcessingResult;

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Lifecycle notifications emitted while a run progresses.
#[derive(Debug, Clone, Copy)]
pub enum ProcessingEvent<'a> {
    /// Percentage of the run completed (0..=100).
    Progress(u8),
    /// The run succeeded.
    Completed(&'a ProcessingResult),
    /// The run was aborted.
    Failed(&'a ProcessingError),
}

/// Receives [`ProcessingEvent`]s. Any `FnMut(ProcessingEvent)` closure works.
pub trait ProgressObserver {
    fn on_event(&mut self, event: ProcessingEvent<'_>);
}

impl<F> ProgressObserver for F
where
    F: FnMut(ProcessingEvent<'_>),
{
    fn on_event(&mut self, event: ProcessingEvent<'_>) {
        self(event)
    }
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_event(&mut self, event: ProcessingEvent<'_>) {
        match event {
            ProcessingEvent::Progress(p) => info!("Processing: {p}%"),
            ProcessingEvent::Completed(result) => info!(
                "Processing complete: {} wavelengths, {} time points",
                result.wavelengths().len(),
                result.time_points().len()
            ),
            ProcessingEvent::Failed(e) => warn!("Processing failed: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Input of one processing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingRequest {
    pub signal_path: PathBuf,
    pub reference_path: Option<PathBuf>,
    pub window_size: usize,
}

impl ProcessingRequest {
    pub fn new(signal_path: impl Into<PathBuf>, window_size: usize) -> Self {
        Self {
            signal_path: signal_path.into(),
            reference_path: None,
            window_size,
        }
    }

    pub fn with_reference(mut self, reference_path: impl Into<PathBuf>) -> Self {
        self.reference_path = Some(reference_path.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Load, validate, align and smooth the files named in `request`.
///
/// Emits progress 0, 10, 30, 50, 80 and 100 followed by `Completed`; on
/// failure the progress reached so far is followed by `Failed`.
pub fn process_files(
    request: &ProcessingRequest,
    observer: &mut impl ProgressObserver,
) -> Result<ProcessingResult> {
    observer.on_event(ProcessingEvent::Progress(0));
    let outcome = load_and_run(request, observer);
    finish(outcome, observer)
}

/// Run the pipeline on tables that are already in memory.
pub fn process_tables(
    signal: MeasurementTable,
    reference: Option<MeasurementTable>,
    window_size: usize,
    observer: &mut impl ProgressObserver,
) -> Result<ProcessingResult> {
    observer.on_event(ProcessingEvent::Progress(0));
    observer.on_event(ProcessingEvent::Progress(10));
    let outcome = run(signal, reference, window_size, observer);
    finish(outcome, observer)
}

fn load_and_run(
    request: &ProcessingRequest,
    observer: &mut impl ProgressObserver,
) -> Result<ProcessingResult> {
    observer.on_event(ProcessingEvent::Progress(10));
    let signal = load_file(&request.signal_path)?;
    let reference = request
        .reference_path
        .as_deref()
        .map(load_file)
        .transpose()?;
    run(signal, reference, request.window_size, observer)
}

fn run(
    signal: MeasurementTable,
    reference: Option<MeasurementTable>,
    window_size: usize,
    observer: &mut impl ProgressObserver,
) -> Result<ProcessingResult> {
    validate(&signal, window_size)?;
    observer.on_event(ProcessingEvent::Progress(30));

    let alignment = align(&signal, reference.as_ref())?;
    observer.on_event(ProcessingEvent::Progress(50));

    let smoothed = smooth_table(&alignment.difference, window_size)?;
    observer.on_event(ProcessingEvent::Progress(80));

    Ok(ProcessingResult::assemble(
        signal,
        reference,
        alignment,
        smoothed,
        window_size,
    ))
}

fn finish(
    outcome: Result<ProcessingResult>,
    observer: &mut impl ProgressObserver,
) -> Result<ProcessingResult> {
    match &outcome {
        Ok(result) => {
            observer.on_event(ProcessingEvent::Progress(100));
            observer.on_event(ProcessingEvent::Completed(result));
        }
        Err(e) => observer.on_event(ProcessingEvent::Failed(e)),
    }
    outcome
}
