use super::model::MeasurementTable;
use crate::error::{ProcessingError, Result};

/// Check that `signal` can be smoothed with a window of `window` samples.
pub fn validate(signal: &MeasurementTable, window: usize) -> Result<()> {
    if window < 1 {
        return Err(ProcessingError::InvalidWindowSize { window });
    }
    if signal.is_empty() {
        return Err(ProcessingError::EmptyDataset);
    }
    if signal.len() < window {
        return Err(ProcessingError::InsufficientData {
            rows: signal.len(),
            window,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::WavelengthColumn;

    fn table(rows: usize) -> MeasurementTable {
        let time: Vec<f64> = (0..rows).map(|i| i as f64).collect();
        let values = time.clone();
        MeasurementTable::new("Time", time, vec![WavelengthColumn::new("500", 500.0, values)])
    }

    #[test]
    fn accepts_window_equal_to_row_count() {
        assert!(validate(&table(5), 5).is_ok());
        assert!(validate(&table(5), 1).is_ok());
    }

    #[test]
    fn rejects_window_larger_than_data() {
        let err = validate(&table(3), 4).unwrap_err();
        assert!(matches!(err, ProcessingError::InsufficientData { rows: 3, window: 4 }));
    }

    #[test]
    fn rejects_empty_table() {
        let err = validate(&table(0), 1).unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyDataset));
    }

    #[test]
    fn rejects_zero_window() {
        let err = validate(&table(3), 0).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidWindowSize { window: 0 }));
    }
}
