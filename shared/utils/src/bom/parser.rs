//! BOM Grid Decoder
//!
//! Turns uploaded spreadsheet files and pasted clipboard text into a grid of
//! string cells. No header promotion happens here: every row of the source,
//! title rows included, is kept in position for the classifier.

use calamine::{open_workbook_from_rs, DataType, Reader, Xls, Xlsx};
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ExecBomError, ExecBomResult};
use crate::validation::validate_row_count;

/// One source row. Cells past the end of the vector are treated as empty.
pub type Row = Vec<String>;

/// Decoded sheet, rows in source order.
pub type Grid = Vec<Row>;

/// Supported BOM file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomFormat {
    /// XLSX/XLSM
    Excel,
    /// XLS
    LegacyExcel,
    Csv,
    /// Tab-separated text, as copied from a spreadsheet.
    Text,
}

impl BomFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    /// Detect format from content type header
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type.split(';').next().unwrap_or("").trim();
        match mime {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some(Self::Excel),
            "application/vnd.ms-excel.sheet.macroenabled.12" => Some(Self::Excel),
            "application/vnd.ms-excel" => Some(Self::LegacyExcel),
            "text/csv" | "application/csv" => Some(Self::Csv),
            "text/tab-separated-values" | "text/plain" => Some(Self::Text),
            _ => None,
        }
    }
}

impl FromStr for BomFormat {
    type Err = ExecBomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "xlsm" | "excel" => Ok(Self::Excel),
            "xls" => Ok(Self::LegacyExcel),
            "csv" => Ok(Self::Csv),
            "txt" | "tsv" | "text" => Ok(Self::Text),
            other => Err(ExecBomError::unsupported_format(other)),
        }
    }
}

impl fmt::Display for BomFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Excel => "xlsx",
            Self::LegacyExcel => "xls",
            Self::Csv => "csv",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// Split clipboard text into rows on `\n` and cells on `\t`.
///
/// A trailing `\r` is dropped from each line. The empty string yields one
/// row holding one empty cell.
pub fn parse_pasted_text(text: &str) -> Grid {
    text.split('\n')
        .map(|line| {
            line.strip_suffix('\r')
                .unwrap_or(line)
                .split('\t')
                .map(str::to_string)
                .collect()
        })
        .collect()
}

/// Decodes uploaded files into grids.
pub struct GridDecoder {
    max_rows: usize,
}

impl Default for GridDecoder {
    fn default() -> Self {
        Self { max_rows: usize::MAX }
    }
}

impl GridDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject grids with more than `max_rows` rows.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Decode file bytes. `format` wins over the file name's extension.
    pub fn decode(&self, filename: &str, data: &[u8], format: Option<BomFormat>) -> ExecBomResult<Grid> {
        let format = match format.or_else(|| BomFormat::from_extension(Path::new(filename))) {
            Some(format) => format,
            None => {
                let ext = Path::new(filename)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown");
                return Err(ExecBomError::unsupported_format(ext));
            }
        };

        let grid = match format {
            BomFormat::Excel => first_sheet::<Xlsx<_>>(data)?,
            BomFormat::LegacyExcel => first_sheet::<Xls<_>>(data)?,
            BomFormat::Csv => parse_csv(data)?,
            BomFormat::Text => parse_text_bytes(data),
        };

        validate_row_count(grid.len(), self.max_rows)?;
        tracing::info!(filename, %format, rows = grid.len(), "Decoded BOM grid");
        Ok(grid)
    }

    /// Split pasted text, applying the same row limit as file uploads.
    pub fn decode_text(&self, text: &str) -> ExecBomResult<Grid> {
        let grid = parse_pasted_text(text);
        validate_row_count(grid.len(), self.max_rows)?;
        Ok(grid)
    }
}

/// First worksheet, padded so that index 0 is always column A.
fn first_sheet<'a, R>(data: &'a [u8]) -> ExecBomResult<Grid>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: Into<calamine::Error>,
{
    let mut workbook: R = open_workbook_from_rs(Cursor::new(data)).map_err(spreadsheet_error)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExecBomError::decode("No sheets found in workbook"))?
        .map_err(spreadsheet_error)?;

    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut grid: Grid = vec![Vec::new(); row_offset];
    grid.extend(range.rows().map(|cells| {
        std::iter::repeat(String::new())
            .take(col_offset)
            .chain(cells.iter().map(cell_to_string))
            .collect()
    }));
    Ok(grid)
}

fn spreadsheet_error<E: Into<calamine::Error>>(error: E) -> ExecBomError {
    ExecBomError::from(error.into())
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}

fn parse_csv(data: &[u8]) -> ExecBomResult<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

fn parse_text_bytes(data: &[u8]) -> Grid {
    let text = String::from_utf8_lossy(data);
    parse_pasted_text(text.strip_prefix('\u{feff}').unwrap_or(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(BomFormat::from_extension(Path::new("bom.csv")), Some(BomFormat::Csv));
        assert_eq!(BomFormat::from_extension(Path::new("bom.XLSX")), Some(BomFormat::Excel));
        assert_eq!(BomFormat::from_extension(Path::new("bom.xls")), Some(BomFormat::LegacyExcel));
        assert_eq!(BomFormat::from_extension(Path::new("bom.tsv")), Some(BomFormat::Text));
        assert_eq!(BomFormat::from_extension(Path::new("bom.pdf")), None);
        assert_eq!(BomFormat::from_extension(Path::new("bom")), None);
    }

    #[test]
    fn test_content_type_detection() {
        assert_eq!(BomFormat::from_content_type("text/csv; charset=utf-8"), Some(BomFormat::Csv));
        assert_eq!(BomFormat::from_content_type("application/vnd.ms-excel"), Some(BomFormat::LegacyExcel));
        assert_eq!(BomFormat::from_content_type("application/octet-stream"), None);
    }

    #[test]
    fn test_paste_splitting() {
        let grid = parse_pasted_text("Frame\r\nBolt\tM4 x 10\t12\n\nNut\tM4");
        assert_eq!(
            grid,
            vec![
                vec!["Frame".to_string()],
                vec!["Bolt".to_string(), "M4 x 10".to_string(), "12".to_string()],
                vec![String::new()],
                vec!["Nut".to_string(), "M4".to_string()],
            ]
        );
        assert_eq!(parse_pasted_text(""), vec![vec![String::new()]]);
    }

    #[test]
    fn test_csv_keeps_every_row() {
        let data = b"Module,Description,Qty\nMotors\nM1,Stepper,\"2\"\n";
        let grid = GridDecoder::new().decode("bom.csv", data, None).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec!["Module", "Description", "Qty"]);
        assert_eq!(grid[1], vec!["Motors"]);
        assert_eq!(grid[2], vec!["M1", "Stepper", "2"]);
    }

    #[test]
    fn test_explicit_format_overrides_extension() {
        let grid = GridDecoder::new().decode("upload.bin", b"A\tB\t3", Some(BomFormat::Text)).unwrap();
        assert_eq!(grid, vec![vec!["A", "B", "3"]]);
    }

    #[test]
    fn test_text_file_strips_byte_order_mark() {
        let grid = GridDecoder::new().decode("bom.txt", "\u{feff}Frame".as_bytes(), None).unwrap();
        assert_eq!(grid, vec![vec!["Frame"]]);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = GridDecoder::new().decode("bom.pdf", b"", None).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
        assert_eq!(err.http_status_code(), 415);
    }

    #[test]
    fn test_corrupt_workbook_is_a_decode_error() {
        let err = GridDecoder::new().decode("bom.xlsx", b"not a zip archive", None).unwrap_err();
        assert_eq!(err.error_code(), "DECODE_ERROR");
    }

    #[test]
    fn test_row_limit() {
        let decoder = GridDecoder::new().with_max_rows(2);
        assert!(decoder.decode_text("a\nb").is_ok());
        let err = decoder.decode("bom.csv", b"a\nb\nc\n", None).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
