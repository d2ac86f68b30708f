/// Data layer: core types, loading, alignment and smoothing.
///
/// Architecture:
/// ```text
///  .csv / .txt / .xls / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MeasurementTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ validate  │  non-empty, enough rows for the window
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  align    │  common wavelengths × common times → signal − reference
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  smooth   │  centred moving average per wavelength column
///   └──────────┘
/// ```
///
/// `writer` serialises tables back to delimited text and `views` slices them
/// for display.

pub mod align;
pub mod loader;
pub mod model;
pub mod smooth;
pub mod validate;
pub mod views;
pub mod writer;
