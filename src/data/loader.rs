use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use log::{debug, info};

use super::model::{MeasurementTable, WavelengthColumn};
use crate::error::{ProcessingError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`         – comma separated, `.` or `,` decimal marks
/// * `.txt`         – tab or comma separated, `.` or `,` decimal marks
/// * `.xls`/`.xlsx` – first sheet of the workbook
///
/// The first row is the header: a time label followed by one wavelength per
/// column. Every other row is a time point.
pub fn load_file(path: &Path) -> Result<MeasurementTable> {
    let format = FileFormat::from_path(path)?;
    let table = match format {
        FileFormat::Spreadsheet => load_spreadsheet(path)?,
        FileFormat::Csv | FileFormat::Txt => {
            let bytes = std::fs::read(path).map_err(|source| ProcessingError::FileAccess {
                path: path.to_path_buf(),
                source,
            })?;
            let text = decode_text(&bytes);
            parse_delimited(&text, format.strategies(), path)?
        }
    };
    info!(
        "Loaded {}: {} time points x {} wavelengths",
        path.display(),
        table.len(),
        table.width()
    );
    Ok(table)
}

/// Input container, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Txt,
    Spreadsheet,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "txt" => Ok(FileFormat::Txt),
            "xls" | "xlsx" => Ok(FileFormat::Spreadsheet),
            other => Err(ProcessingError::UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }

    fn strategies(self) -> &'static [ParseStrategy] {
        match self {
            FileFormat::Csv => CSV_STRATEGIES,
            FileFormat::Txt => TXT_STRATEGIES,
            FileFormat::Spreadsheet => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Text decoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum TextEncoding {
    Utf8,
    Latin1,
}

/// Tried in order; Latin-1 maps every byte and cannot fail.
const ENCODINGS: [TextEncoding; 2] = [TextEncoding::Utf8, TextEncoding::Latin1];

impl TextEncoding {
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                std::str::from_utf8(bytes).ok().map(str::to_owned)
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

fn decode_text(bytes: &[u8]) -> String {
    ENCODINGS
        .iter()
        .find_map(|enc| {
            let text = enc.decode(bytes);
            if text.is_none() {
                debug!("{enc:?} decoding failed, trying next encoding");
            }
            text
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Parse strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Delimiter {
    Byte(u8),
    /// Pick the most frequent candidate on the header line.
    Sniff,
}

#[derive(Debug, Clone, Copy)]
enum DecimalMark {
    /// Plain `1.5`.
    Dot,
    /// `1,5` (a `.` is still accepted).
    Comma,
    /// Anything that becomes a number once quotes and inner blanks are dropped
    /// and `,` is turned into `.`.
    Lenient,
}

impl DecimalMark {
    fn parse(self, field: &str) -> Option<f64> {
        match self {
            DecimalMark::Dot => field.parse().ok(),
            DecimalMark::Comma => field.replace(',', ".").parse().ok(),
            DecimalMark::Lenient => {
                let cleaned: String = field
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != '"' && *c != '\'')
                    .map(|c| if c == ',' { '.' } else { c })
                    .collect();
                cleaned.parse().ok()
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ParseStrategy {
    delimiter: Delimiter,
    decimal: DecimalMark,
}

const fn strategy(delimiter: Delimiter, decimal: DecimalMark) -> ParseStrategy {
    ParseStrategy { delimiter, decimal }
}

const PERMISSIVE: ParseStrategy = strategy(Delimiter::Sniff, DecimalMark::Lenient);

const CSV_STRATEGIES: &[ParseStrategy] = &[
    strategy(Delimiter::Byte(b','), DecimalMark::Dot),
    strategy(Delimiter::Byte(b','), DecimalMark::Comma),
    PERMISSIVE,
];

const TXT_STRATEGIES: &[ParseStrategy] = &[
    strategy(Delimiter::Byte(b'\t'), DecimalMark::Dot),
    strategy(Delimiter::Byte(b'\t'), DecimalMark::Comma),
    strategy(Delimiter::Byte(b','), DecimalMark::Dot),
    strategy(Delimiter::Byte(b','), DecimalMark::Comma),
    PERMISSIVE,
];

/// In priority order; ties go to the earlier entry so `;` wins over `,` on
/// headers like `Time;500,5;501,5`.
const SNIFF_CANDIDATES: [u8; 4] = [b'\t', b';', b',', b'|'];

fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let mut best = (b',', 0);
    for &candidate in &SNIFF_CANDIDATES {
        let n = header.bytes().filter(|&b| b == candidate).count();
        if n > best.1 {
            best = (candidate, n);
        }
    }
    best.0
}

/// Try each strategy in order and keep the first table that validates.
/// When all fail, the last strategy's error is reported.
fn parse_delimited(
    text: &str,
    strategies: &[ParseStrategy],
    origin: &Path,
) -> Result<MeasurementTable> {
    let mut last_err = None;
    for strategy in strategies {
        match strategy.apply(text, origin) {
            Ok(table) => {
                debug!("{} parsed with {strategy:?}", origin.display());
                return Ok(table);
            }
            Err(e) => {
                debug!("{strategy:?} rejected {}: {e}", origin.display());
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| ProcessingError::EmptyFile {
        path: origin.to_path_buf(),
    }))
}

impl ParseStrategy {
    fn apply(&self, text: &str, origin: &Path) -> Result<MeasurementTable> {
        let (delimiter, flexible) = match self.delimiter {
            Delimiter::Byte(b) => (b, false),
            Delimiter::Sniff => (sniff_delimiter(text), true),
        };
        let grid = read_grid(text, delimiter, flexible)?;
        build_table(grid, self.decimal, origin)
    }
}

// ---------------------------------------------------------------------------
// Raw grid → MeasurementTable
// ---------------------------------------------------------------------------

/// Header and rows as text, before any numeric interpretation.
struct RawGrid {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn malformed(e: csv::Error) -> ProcessingError {
    ProcessingError::MalformedRecord {
        message: e.to_string(),
    }
}

fn read_grid(text: &str, delimiter: u8, flexible: bool) -> Result<RawGrid> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(flexible)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let header: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(malformed)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }
    Ok(RawGrid { header, rows })
}

/// Parse a wavelength header, accepting `,` as decimal mark.
pub fn parse_wavelength(header: &str) -> Option<f64> {
    header.trim().replace(',', ".").parse().ok()
}

fn build_table(grid: RawGrid, decimal: DecimalMark, origin: &Path) -> Result<MeasurementTable> {
    let RawGrid { header, rows } = grid;

    if header.iter().all(String::is_empty) || rows.is_empty() {
        return Err(ProcessingError::EmptyFile {
            path: origin.to_path_buf(),
        });
    }
    if header.len() < 2 {
        return Err(ProcessingError::MalformedHeader {
            columns: header.len(),
        });
    }

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(header.len() - 1);
    for label in &header[1..] {
        let wavelength = parse_wavelength(label)
            .filter(|w| w.is_finite())
            .ok_or_else(|| ProcessingError::InvalidWavelengthHeader {
                header: label.clone(),
            })?;
        if !seen.insert(label.as_str()) {
            return Err(ProcessingError::DuplicateWavelength {
                header: label.clone(),
            });
        }
        columns.push(WavelengthColumn::new(
            label.clone(),
            wavelength,
            Vec::with_capacity(rows.len()),
        ));
    }

    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() > header.len()) {
        return Err(ProcessingError::MalformedRecord {
            message: format!(
                "data row {} has {} fields but the header has {}",
                i + 1,
                row.len(),
                header.len()
            ),
        });
    }

    // Column by column so the first reported failure is the leftmost bad column.
    let mut time = Vec::with_capacity(rows.len());
    for (col_idx, name) in header.iter().enumerate() {
        for (row_no, row) in rows.iter().enumerate() {
            let field = row.get(col_idx).map(String::as_str).unwrap_or("");
            let value = decimal
                .parse(field)
                .ok_or_else(|| ProcessingError::NonNumericData {
                    column: name.clone(),
                    row: row_no + 1,
                    value: field.to_string(),
                })?;
            if col_idx == 0 {
                time.push(value);
            } else {
                columns[col_idx - 1].values.push(value);
            }
        }
    }

    Ok(MeasurementTable::new(header[0].clone(), time, columns))
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

/// Read the first sheet of an `.xls` / `.xlsx` workbook. Cells are rendered to
/// text and go through the same numeric rules as delimited files.
fn load_spreadsheet(path: &Path) -> Result<MeasurementTable> {
    std::fs::metadata(path).map_err(|source| ProcessingError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let spreadsheet_err = |message: String| ProcessingError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| spreadsheet_err("workbook has no sheets".to_string()))?
        .map_err(|e| spreadsheet_err(e.to_string()))?;

    let mut cells = range
        .rows()
        .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|c| !c.is_empty()));

    let header = cells.next().unwrap_or_default();
    let rows = cells.collect();
    build_table(RawGrid { header, rows }, DecimalMark::Lenient, path)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse_csv(text: &str) -> Result<MeasurementTable> {
        parse_delimited(text, CSV_STRATEGIES, Path::new("test.csv"))
    }

    fn parse_txt(text: &str) -> Result<MeasurementTable> {
        parse_delimited(text, TXT_STRATEGIES, Path::new("test.txt"))
    }

    #[test]
    fn parses_dot_decimal_csv() {
        let table = parse_csv("Time,532.0,533.5\n0.0,0.1,0.2\n1.0,0.3,0.4\n").unwrap();
        assert_eq!(table.time_label, "Time");
        assert_eq!(table.time, vec![0.0, 1.0]);
        assert_eq!(table.wavelengths(), vec![532.0, 533.5]);
        assert_eq!(table.columns[1].label, "533.5");
        assert_eq!(table.columns[1].values, vec![0.2, 0.4]);
    }

    #[test]
    fn parses_quoted_comma_decimals_in_csv() {
        let table = parse_csv("Time,\"532,5\"\n\"0,5\",\"1,25\"\n").unwrap();
        assert_eq!(table.wavelengths(), vec![532.5]);
        assert_eq!(table.time, vec![0.5]);
        assert_eq!(table.columns[0].values, vec![1.25]);
    }

    #[test]
    fn parses_tab_separated_comma_decimal_txt() {
        let table = parse_txt("t\t500,5\t501\n0\t1,5\t2\n1\t3\t4,25\n").unwrap();
        assert_eq!(table.wavelengths(), vec![500.5, 501.0]);
        assert_eq!(table.columns[0].values, vec![1.5, 3.0]);
        assert_eq!(table.columns[1].values, vec![2.0, 4.25]);
    }

    #[test]
    fn txt_falls_back_to_commas() {
        let table = parse_txt("Time,500,501\n0,1,2\n").unwrap();
        assert_eq!(table.width(), 2);
    }

    #[test]
    fn semicolon_file_needs_the_permissive_strategy() {
        let table = parse_csv("Time;500,0;501,0\n0;1,5;2\n1;3;4\n").unwrap();
        assert_eq!(table.wavelengths(), vec![500.0, 501.0]);
        assert_eq!(table.columns[0].values, vec![1.5, 3.0]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let table = parse_csv("Time,500\n0,1\n\n1,2\n\n").unwrap();
        assert_eq!(table.time, vec![0.0, 1.0]);
    }

    #[test]
    fn header_only_is_empty_file() {
        let err = parse_csv("Time,500,501\n").unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyFile { .. }));
        let err = parse_csv("").unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyFile { .. }));
    }

    #[test]
    fn single_column_is_malformed_header() {
        let err = parse_csv("Time\n0\n1\n").unwrap_err();
        assert!(matches!(err, ProcessingError::MalformedHeader { columns: 1 }));
    }

    #[test]
    fn non_numeric_header_is_named() {
        let err = parse_csv("Time,500,abc\n0,1,2\n").unwrap_err();
        match err {
            ProcessingError::InvalidWavelengthHeader { header } => assert_eq!(header, "abc"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_header_is_rejected() {
        for bad in ["nan", "inf", "-Infinity"] {
            let err = parse_csv(&format!("Time,500,{bad}\n0,1,2\n")).unwrap_err();
            match err {
                ProcessingError::InvalidWavelengthHeader { header } => assert_eq!(header, bad),
                other => panic!("unexpected error for {bad}: {other}"),
            }
        }
    }

    #[test]
    fn duplicate_header_is_rejected() {
        let err = parse_csv("Time,500,500\n0,1,2\n").unwrap_err();
        assert!(matches!(err, ProcessingError::DuplicateWavelength { .. }));
    }

    #[test]
    fn non_numeric_cell_names_the_column() {
        let err = parse_csv("Time,500,501\n0,1,2\n1,x,y\n").unwrap_err();
        match err {
            ProcessingError::NonNumericData { column, row, value } => {
                assert_eq!(column, "500");
                assert_eq!(row, 2);
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_cell_is_non_numeric() {
        let err = parse_csv("Time,500,501\n0,1,\n").unwrap_err();
        assert!(matches!(err, ProcessingError::NonNumericData { .. }));
    }

    #[test]
    fn latin1_bytes_are_decoded() {
        let bytes = b"Zeit \xb5s,500\n0,1\n";
        let text = decode_text(bytes);
        assert!(text.starts_with("Zeit \u{b5}s"));
        let table = parse_csv(&text).unwrap();
        assert_eq!(table.time_label, "Zeit \u{b5}s");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let text = decode_text(b"\xEF\xBB\xBFTime,500\n0,1\n");
        assert!(text.starts_with("Time"));
    }

    #[test]
    fn extension_selects_format() {
        assert_eq!(FileFormat::from_path(Path::new("a.CSV")).unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_path(Path::new("a.txt")).unwrap(), FileFormat::Txt);
        assert_eq!(
            FileFormat::from_path(Path::new("a.xlsx")).unwrap(),
            FileFormat::Spreadsheet
        );
        let err = FileFormat::from_path(Path::new("a.json")).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::UnsupportedFormat { extension } if extension == "json"
        ));
    }

    #[test]
    fn missing_file_is_file_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, ProcessingError::FileAccess { .. }));
        let err = load_file(&dir.path().join("absent.xlsx")).unwrap_err();
        assert!(matches!(err, ProcessingError::FileAccess { .. }));
    }

    /// Write `rows` to the first sheet; cells that parse as numbers are stored
    /// as numbers, everything else as text.
    fn write_xlsx(path: &Path, rows: &[&[&str]]) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell.parse::<f64>() {
                    Ok(number) => worksheet.write_number(r, c, number).unwrap(),
                    Err(_) => worksheet.write_string(r, c, *cell).unwrap(),
                };
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn loads_first_sheet_of_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_xlsx(
            &path,
            &[&["Time", "532.5", "533,5"], &["0", "1.5", "0,25"], &["1", "2", "3"]],
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.time_label, "Time");
        assert_eq!(table.time, vec![0.0, 1.0]);
        assert_eq!(table.wavelengths(), vec![532.5, 533.5]);
        assert_eq!(table.columns[1].label, "533,5");
        assert_eq!(table.columns[0].values, vec![1.5, 2.0]);
        assert_eq!(table.columns[1].values, vec![0.25, 3.0]);
    }

    #[test]
    fn xlsx_text_cell_is_non_numeric() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_xlsx(&path, &[&["Time", "500"], &["0", "1"], &["1", "abc"]]);

        match load_file(&path).unwrap_err() {
            ProcessingError::NonNumericData { column, row, value } => {
                assert_eq!(column, "500");
                assert_eq!(row, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"Time\t400\t410\n0\t0,1\t0,2\n").unwrap();
        let table = load_file(file.path()).unwrap();
        assert_eq!(table.columns[0].values, vec![0.1]);
        assert_eq!(table.columns[1].values, vec![0.2]);
    }
}
