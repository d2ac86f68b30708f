use super::model::{MeasurementTable, WavelengthKey};

/// Time course of one wavelength: `(time, value)` pairs in row order.
///
/// The first column whose wavelength matches after 2-decimal rounding is used.
pub fn kinetic_trace(table: &MeasurementTable, wavelength: f64) -> Option<Vec<(f64, f64)>> {
    let idx = table.position_of(WavelengthKey::new(wavelength))?;
    Some(
        table
            .time
            .iter()
            .copied()
            .zip(table.columns[idx].values.iter().copied())
            .collect(),
    )
}

/// Mean value of each wavelength over the closed time interval
/// `[t_min, t_max]`, as `(wavelength, mean)` sorted by wavelength.
///
/// Columns whose mean is NaN are dropped. Empty when no time point lies in the
/// interval.
pub fn average_spectrum(table: &MeasurementTable, t_min: f64, t_max: f64) -> Vec<(f64, f64)> {
    let rows: Vec<usize> = table
        .time
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t >= t_min && t <= t_max)
        .map(|(i, _)| i)
        .collect();
    if rows.is_empty() {
        return Vec::new();
    }

    let mut spectrum: Vec<(f64, f64)> = table
        .columns
        .iter()
        .map(|c| {
            let sum: f64 = rows.iter().map(|&r| c.values[r]).sum();
            (c.wavelength, sum / rows.len() as f64)
        })
        .filter(|(_, mean)| !mean.is_nan())
        .collect();
    spectrum.sort_by(|a, b| a.0.total_cmp(&b.0));
    spectrum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::WavelengthColumn;

    fn table() -> MeasurementTable {
        MeasurementTable::new(
            "Time",
            vec![0.0, 1.0, 2.0, 3.0],
            vec![
                WavelengthColumn::new("510", 510.0, vec![1.0, 2.0, 3.0, 4.0]),
                WavelengthColumn::new("505", 505.0, vec![10.0, 20.0, 30.0, 40.0]),
                WavelengthColumn::new("520", 520.0, vec![f64::NAN, 0.0, 0.0, 0.0]),
            ],
        )
    }

    #[test]
    fn kinetic_trace_pairs_time_and_value() {
        let trace = kinetic_trace(&table(), 505.001).unwrap();
        assert_eq!(trace, vec![(0.0, 10.0), (1.0, 20.0), (2.0, 30.0), (3.0, 40.0)]);
        assert!(kinetic_trace(&table(), 700.0).is_none());
    }

    #[test]
    fn average_spectrum_is_sorted_and_inclusive() {
        let spectrum = average_spectrum(&table(), 1.0, 2.0);
        assert_eq!(spectrum, vec![(505.0, 25.0), (510.0, 2.5), (520.0, 0.0)]);
    }

    #[test]
    fn nan_means_are_dropped() {
        let spectrum = average_spectrum(&table(), 0.0, 3.0);
        assert_eq!(spectrum.len(), 2);
        assert!(spectrum.iter().all(|&(w, _)| w != 520.0));
    }

    #[test]
    fn empty_interval_gives_empty_spectrum() {
        assert!(average_spectrum(&table(), 5.0, 6.0).is_empty());
    }
}
