use std::collections::{HashMap, HashSet};

use log::{debug, info};

use super::model::{MeasurementTable, WavelengthKey};
use crate::error::{ProcessingError, Result};

// ---------------------------------------------------------------------------
// Alignment output
// ---------------------------------------------------------------------------

/// Signal and reference restricted to their common domain, plus the
/// background-subtracted difference.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Signal minus reference on common wavelengths; other signal columns pass
    /// through unchanged. Equal to the signal when no reference was given.
    pub difference: MeasurementTable,
    /// Signal rows whose time is shared with the reference.
    pub signal_common: Option<MeasurementTable>,
    /// Reference rows paired with `signal_common`, in the same row order.
    pub reference_common: Option<MeasurementTable>,
    /// Rounded wavelengths present in both tables, in signal column order.
    pub common_wavelengths: Vec<WavelengthKey>,
}

// ---------------------------------------------------------------------------
// Common-domain intersection
// ---------------------------------------------------------------------------

/// Exact time equality with `-0.0 == 0.0`; NaN never matches.
fn time_key(t: f64) -> Option<u64> {
    if t.is_nan() {
        None
    } else if t == 0.0 {
        Some(0.0f64.to_bits())
    } else {
        Some(t.to_bits())
    }
}

/// Rounded wavelengths shared by both tables, deduplicated, in signal order.
/// Non-finite wavelengths never match.
fn common_wavelengths(
    signal: &MeasurementTable,
    reference: &MeasurementTable,
) -> Vec<WavelengthKey> {
    let in_reference: HashSet<WavelengthKey> = reference
        .columns
        .iter()
        .filter(|c| c.wavelength.is_finite())
        .map(|c| c.key())
        .collect();
    let mut seen = HashSet::new();
    signal
        .columns
        .iter()
        .filter(|c| c.wavelength.is_finite())
        .map(|c| c.key())
        .filter(|k| in_reference.contains(k) && seen.insert(*k))
        .collect()
}

/// Row pairs `(signal_row, reference_row)` with equal time, in signal order.
///
/// Repeated times pair the k-th signal occurrence with the k-th reference
/// occurrence; surplus signal rows reuse the last reference occurrence.
fn common_rows(
    signal: &MeasurementTable,
    reference: &MeasurementTable,
) -> (Vec<usize>, Vec<usize>) {
    let mut reference_rows: HashMap<u64, Vec<usize>> = HashMap::new();
    for (i, &t) in reference.time.iter().enumerate() {
        if let Some(k) = time_key(t) {
            reference_rows.entry(k).or_default().push(i);
        }
    }

    let mut used: HashMap<u64, usize> = HashMap::new();
    let mut sig = Vec::new();
    let mut refr = Vec::new();
    for (i, &t) in signal.time.iter().enumerate() {
        let Some(k) = time_key(t) else { continue };
        let Some(candidates) = reference_rows.get(&k) else { continue };
        let n = used.entry(k).or_insert(0);
        refr.push(candidates[(*n).min(candidates.len() - 1)]);
        *n += 1;
        sig.push(i);
    }
    (sig, refr)
}

/// Intersect `signal` with `reference` and subtract the reference on the
/// common domain.
pub fn align(signal: &MeasurementTable, reference: Option<&MeasurementTable>) -> Result<Alignment> {
    let Some(reference) = reference else {
        debug!("No reference given, difference is the raw signal");
        return Ok(Alignment {
            difference: signal.clone(),
            signal_common: None,
            reference_common: None,
            common_wavelengths: Vec::new(),
        });
    };

    let common = common_wavelengths(signal, reference);
    if common.is_empty() {
        return Err(ProcessingError::NoCommonWavelengths);
    }

    let (signal_rows, reference_rows) = common_rows(signal, reference);
    if signal_rows.is_empty() {
        return Err(ProcessingError::NoCommonTimePoints);
    }

    let signal_common = signal.select_rows(&signal_rows);
    let reference_common = reference.select_rows(&reference_rows);

    let mut difference = signal_common.clone();
    for &key in &common {
        // Both lookups succeed: `common` only holds keys present in each table.
        let (Some(s), Some(r)) = (signal_common.position_of(key), reference_common.position_of(key))
        else {
            continue;
        };
        let background = &reference_common.columns[r].values;
        for (v, b) in difference.columns[s].values.iter_mut().zip(background) {
            *v -= b;
        }
    }

    info!(
        "Aligned on {} common wavelengths ({} passed through) and {} common time points",
        common.len(),
        difference.width().saturating_sub(common.len()),
        difference.len()
    );

    Ok(Alignment {
        difference,
        signal_common: Some(signal_common),
        reference_common: Some(reference_common),
        common_wavelengths: common,
    })
}
