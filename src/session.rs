use crate::error::ProcessingError;
use crate::pipeline::{process_files, ProcessingRequest, ProgressObserver};
use crate::result::ProcessingResult;

// ---------------------------------------------------------------------------
// Analysis session
// ---------------------------------------------------------------------------

/// State shared with display and export consumers, independent of rendering.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    /// Last successful run (None until a run succeeds).
    result: Option<ProcessingResult>,

    /// Status / error message of the last run.
    status_message: Option<String>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the pipeline. A success replaces the stored result; a failure only
    /// records its message and keeps the previous result.
    pub fn run(
        &mut self,
        request: &ProcessingRequest,
        observer: &mut impl ProgressObserver,
    ) -> Result<&ProcessingResult, ProcessingError> {
        match process_files(request, observer) {
            Ok(result) => {
                self.status_message = Some(result.summary());
                Ok(&*self.result.insert(result))
            }
            Err(e) => {
                self.status_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The last successful result, read-only.
    pub fn result(&self) -> Option<&ProcessingResult> {
        self.result.as_ref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Forget the stored result and message.
    pub fn clear(&mut self) {
        self.result = None;
        self.status_message = None;
    }
}
