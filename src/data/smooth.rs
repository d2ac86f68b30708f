use log::debug;

use super::model::{MeasurementTable, WavelengthColumn};
use crate::error::{ProcessingError, Result};

/// Centered moving average with "same length" convolution semantics.
///
/// The input is convolved with a uniform kernel of `window` taps weighted
/// `1/window`, and the central `values.len()` samples of the full convolution are
/// kept. Samples outside the data contribute nothing, so the first and last
/// `window / 2` outputs are biased towards zero. For even windows the kernel
/// reaches one sample further back than forward.
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<f64>> {
    if window < 1 {
        return Err(ProcessingError::InvalidWindowSize { window });
    }
    let n = values.len();
    let weight = 1.0 / window as f64;
    let offset = (window - 1) / 2;

    let out: Vec<f64> = (0..n)
        .map(|i| {
            // Full-convolution index i + offset covers x[i + offset - (window - 1)..=i + offset].
            let hi = (i + offset).min(n.saturating_sub(1));
            let lo = (i + offset).saturating_sub(window - 1);
            values[lo..=hi].iter().map(|&x| x * weight).sum::<f64>()
        })
        .collect();
    Ok(out)
}

/// Smooth every wavelength column of `table`; the time axis is untouched.
pub fn smooth_table(table: &MeasurementTable, window: usize) -> Result<MeasurementTable> {
    let columns = table
        .columns
        .iter()
        .map(|c| {
            Ok(WavelengthColumn {
                label: c.label.clone(),
                wavelength: c.wavelength,
                values: moving_average(&c.values, window)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!("Smoothed {} columns with window {window}", columns.len());
    Ok(MeasurementTable::new(
        table.time_label.clone(),
        table.time.clone(),
        columns,
    ))
}
