use std::fmt;

use crate::data::align::Alignment;
use crate::data::model::MeasurementTable;

// ---------------------------------------------------------------------------
// TableKind – the named tables handed to export
// ---------------------------------------------------------------------------

/// The six tables a processing run can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Signal,
    Reference,
    SignalCommon,
    ReferenceCommon,
    Difference,
    MovingAverage,
}

impl TableKind {
    pub const ALL: [TableKind; 6] = [
        TableKind::Signal,
        TableKind::Reference,
        TableKind::SignalCommon,
        TableKind::ReferenceCommon,
        TableKind::Difference,
        TableKind::MovingAverage,
    ];

    /// File name (without extension) used when the table is exported.
    pub fn file_stem(self) -> &'static str {
        match self {
            TableKind::Signal => "signal",
            TableKind::Reference => "reference_dark",
            TableKind::SignalCommon => "common_signal",
            TableKind::ReferenceCommon => "common_reference_dark",
            TableKind::Difference => "common_signal_minus_common_reference",
            TableKind::MovingAverage => "moving_average",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

// ---------------------------------------------------------------------------
// ProcessingResult – immutable output of one run
// ---------------------------------------------------------------------------

/// Everything a successful run produced. Built once, then only read.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    signal: MeasurementTable,
    reference: Option<MeasurementTable>,
    signal_common: Option<MeasurementTable>,
    reference_common: Option<MeasurementTable>,
    difference: MeasurementTable,
    smoothed: MeasurementTable,
    wavelengths: Vec<f64>,
    time_points: Vec<f64>,
    window_size: usize,
}

impl ProcessingResult {
    /// Package the outputs of a run. Wavelengths and time points are taken from
    /// the difference table.
    pub fn assemble(
        signal: MeasurementTable,
        reference: Option<MeasurementTable>,
        alignment: Alignment,
        smoothed: MeasurementTable,
        window_size: usize,
    ) -> Self {
        let Alignment {
            difference,
            signal_common,
            reference_common,
            ..
        } = alignment;
        let wavelengths = difference.wavelengths();
        let time_points = difference.time.clone();
        Self {
            signal,
            reference,
            signal_common,
            reference_common,
            difference,
            smoothed,
            wavelengths,
            time_points,
            window_size,
        }
    }

    pub fn signal(&self) -> &MeasurementTable {
        &self.signal
    }

    pub fn reference(&self) -> Option<&MeasurementTable> {
        self.reference.as_ref()
    }

    pub fn signal_common(&self) -> Option<&MeasurementTable> {
        self.signal_common.as_ref()
    }

    pub fn reference_common(&self) -> Option<&MeasurementTable> {
        self.reference_common.as_ref()
    }

    /// Signal minus reference on the common domain.
    pub fn difference(&self) -> &MeasurementTable {
        &self.difference
    }

    /// Moving average of [`Self::difference`].
    pub fn smoothed(&self) -> &MeasurementTable {
        &self.smoothed
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn time_points(&self) -> &[f64] {
        &self.time_points
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Look up one of the named tables; `None` if the run did not produce it.
    pub fn table(&self, kind: TableKind) -> Option<&MeasurementTable> {
        match kind {
            TableKind::Signal => Some(&self.signal),
            TableKind::Reference => self.reference.as_ref(),
            TableKind::SignalCommon => self.signal_common.as_ref(),
            TableKind::ReferenceCommon => self.reference_common.as_ref(),
            TableKind::Difference => Some(&self.difference),
            TableKind::MovingAverage => Some(&self.smoothed),
        }
    }

    /// Every table the run produced, in export order.
    pub fn named_tables(&self) -> Vec<(TableKind, &MeasurementTable)> {
        TableKind::ALL
            .iter()
            .filter_map(|&kind| self.table(kind).map(|t| (kind, t)))
            .collect()
    }

    /// Human readable summary for display.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ProcessingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Data processing complete:\n\
             - Number of wavelengths: {}\n\
             - Number of time points: {}\n\
             - Moving average window: {}",
            self.wavelengths.len(),
            self.time_points.len(),
            self.window_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::align::align;
    use crate::data::model::WavelengthColumn;
    use crate::data::smooth::smooth_table;

    fn signal() -> MeasurementTable {
        MeasurementTable::new(
            "Time",
            vec![0.0, 1.0, 2.0],
            vec![
                WavelengthColumn::new("500", 500.0, vec![1.0, 2.0, 3.0]),
                WavelengthColumn::new("501", 501.0, vec![4.0, 5.0, 6.0]),
            ],
        )
    }

    #[test]
    fn summary_lists_counts_and_window() {
        let signal = signal();
        let alignment = align(&signal, None).unwrap();
        let smoothed = smooth_table(&alignment.difference, 3).unwrap();
        let result = ProcessingResult::assemble(signal, None, alignment, smoothed, 3);
        assert_eq!(
            result.summary(),
            "Data processing complete:\n- Number of wavelengths: 2\n- Number of time points: 3\n- Moving average window: 3"
        );
    }

    #[test]
    fn named_tables_skip_absent_reference() {
        let signal = signal();
        let alignment = align(&signal, None).unwrap();
        let smoothed = smooth_table(&alignment.difference, 1).unwrap();
        let result = ProcessingResult::assemble(signal, None, alignment, smoothed, 1);
        let kinds: Vec<TableKind> = result.named_tables().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![TableKind::Signal, TableKind::Difference, TableKind::MovingAverage]
        );
    }

    #[test]
    fn all_six_tables_with_reference() {
        let signal = signal();
        let reference = signal.clone();
        let alignment = align(&signal, Some(&reference)).unwrap();
        let smoothed = smooth_table(&alignment.difference, 1).unwrap();
        let result = ProcessingResult::assemble(signal, Some(reference), alignment, smoothed, 1);
        assert_eq!(result.named_tables().len(), 6);
        assert_eq!(result.wavelengths(), &[500.0, 501.0]);
        assert_eq!(result.time_points(), &[0.0, 1.0, 2.0]);
    }
}
