use std::fmt;

// ---------------------------------------------------------------------------
// WavelengthKey – wavelength rounded for matching across tables
// ---------------------------------------------------------------------------

/// A wavelength rounded to two decimal places, stored as hundredths so it can be
/// hashed and compared exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WavelengthKey(i64);

impl WavelengthKey {
    /// Rounds the exact binary value to two decimals, ties to even, so
    /// `400.005` (stored as 400.00499…) keys as `400.00`.
    ///
    /// Non-finite input has no meaningful key; callers filter it out first.
    pub fn new(wavelength: f64) -> Self {
        // `{:.2}` rounds the exact value; the parsed hundredths are then an
        // integer to within far less than half a unit.
        let rounded = format!("{wavelength:.2}")
            .parse::<f64>()
            .unwrap_or(wavelength);
        WavelengthKey((rounded * 100.0).round() as i64)
    }

    /// The rounded wavelength as a float.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for WavelengthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

// ---------------------------------------------------------------------------
// WavelengthColumn – one measured channel
// ---------------------------------------------------------------------------

/// A single wavelength channel: its header as written in the file, the parsed
/// wavelength and one value per time point.
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthColumn {
    /// Header text as found in the source file (after trimming).
    pub label: String,
    /// Parsed wavelength (`,` decimal marks already normalised).
    pub wavelength: f64,
    /// Values, one per row of the owning table.
    pub values: Vec<f64>,
}

impl WavelengthColumn {
    pub fn new(label: impl Into<String>, wavelength: f64, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            wavelength,
            values,
        }
    }

    pub fn key(&self) -> WavelengthKey {
        WavelengthKey::new(self.wavelength)
    }
}

// ---------------------------------------------------------------------------
// MeasurementTable – time axis plus wavelength columns
// ---------------------------------------------------------------------------

/// A time-resolved measurement: rows are time points, columns are wavelengths.
///
/// Every column holds exactly `time.len()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTable {
    /// Header of the time column (kept only for serialisation).
    pub time_label: String,
    /// Time axis, one entry per row.
    pub time: Vec<f64>,
    /// Wavelength columns in file order.
    pub columns: Vec<WavelengthColumn>,
}

impl MeasurementTable {
    pub fn new(
        time_label: impl Into<String>,
        time: Vec<f64>,
        columns: Vec<WavelengthColumn>,
    ) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == time.len()));
        Self {
            time_label: time_label.into(),
            time,
            columns,
        }
    }

    /// Number of rows (time points).
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Number of wavelength columns (the time column is not counted).
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Wavelengths in column order.
    pub fn wavelengths(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.wavelength).collect()
    }

    /// Index of the first column whose rounded wavelength equals `key`.
    pub fn position_of(&self, key: WavelengthKey) -> Option<usize> {
        self.columns.iter().position(|c| c.key() == key)
    }

    /// Copy of the table restricted to `rows`, in the order given.
    pub fn select_rows(&self, rows: &[usize]) -> MeasurementTable {
        let time = rows.iter().map(|&r| self.time[r]).collect();
        let columns = self
            .columns
            .iter()
            .map(|c| WavelengthColumn {
                label: c.label.clone(),
                wavelength: c.wavelength,
                values: rows.iter().map(|&r| c.values[r]).collect(),
            })
            .collect();
        MeasurementTable {
            time_label: self.time_label.clone(),
            time,
            columns,
        }
    }
}
