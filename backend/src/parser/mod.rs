//! Raw grid model and loaders.
//!
//! A grid is what a spreadsheet export looks like before any tournament
//! semantics are applied: rows of cells, each with a display value and an
//! optional note. Row 0 is always the header.
//!
//! Two input shapes are understood:
//!
//! - JSON, either a plain array of rows or a spreadsheet API document
//!   (`sheets[0].data[0].rowData[].values[]`), cells being strings or
//!   `{ formattedValue, note }` objects
//! - CSV/TSV with encoding and delimiter auto-detection (no notes)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GridError, GridResult};

// =============================================================================
// Cell / RawGrid
// =============================================================================

/// A single spreadsheet cell.
///
/// An absent value is the empty string. A blank note is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Cell {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() { None } else { Some(note) };
        self
    }

    /// Trimmed note, if any.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty() && self.note().is_none()
    }
}

/// Ordered rows of cells. Row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawGrid {
    pub rows: Vec<Vec<Cell>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a note-less grid from plain strings.
    pub fn from_values<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|v| Cell::new(v.as_ref())).collect())
                .collect(),
        }
    }

    /// Fail on an empty grid or an empty header row.
    pub fn check_structure(&self) -> GridResult<()> {
        let header = self.rows.first().ok_or(GridError::EmptyGrid)?;
        if header.iter().all(|c| c.value.trim().is_empty()) {
            return Err(GridError::EmptyHeader);
        }
        Ok(())
    }

    /// Header display values (empty when the grid is empty).
    pub fn header_values(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(|c| c.value.trim().to_string()).collect())
            .unwrap_or_default()
    }

    /// Every row after the header.
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Cell at `index` in `row`, or `None` when the column is absent or the row is short.
pub fn cell_at(row: &[Cell], index: Option<usize>) -> Option<&Cell> {
    index.and_then(|i| row.get(i))
}

/// Trimmed display value at `index`; absent columns read as "".
pub fn value_at(row: &[Cell], index: Option<usize>) -> &str {
    cell_at(row, index).map(|c| c.value.trim()).unwrap_or("")
}

// =============================================================================
// Parse metadata
// =============================================================================

/// Source shape of a loaded grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Json,
    Csv,
}

/// Result of loading a grid with metadata.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub grid: RawGrid,
    pub source: SourceFormat,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected delimiter (CSV only)
    pub delimiter: Option<char>,
}

// =============================================================================
// JSON
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetCell {
    #[serde(default, alias = "value", alias = "displayValue")]
    formatted_value: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonCell {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Object(SheetCell),
}

impl From<SheetCell> for Cell {
    fn from(cell: SheetCell) -> Self {
        let base = Cell::new(cell.formatted_value.unwrap_or_default());
        match cell.note {
            Some(note) => base.with_note(note),
            None => base,
        }
    }
}

impl From<Option<JsonCell>> for Cell {
    fn from(cell: Option<JsonCell>) -> Self {
        match cell {
            None => Cell::default(),
            Some(JsonCell::Text(s)) => Cell::new(s),
            Some(JsonCell::Number(n)) => Cell::new(n.to_string()),
            Some(JsonCell::Bool(b)) => Cell::new(b.to_string()),
            Some(JsonCell::Object(c)) => c.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpreadsheetDoc {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    #[serde(default)]
    data: Vec<GridData>,
}

#[derive(Debug, Deserialize)]
struct GridData {
    #[serde(default, rename = "rowData")]
    row_data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    #[serde(default)]
    values: Vec<SheetCell>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonGrid {
    Rows(Vec<Vec<Option<JsonCell>>>),
    Document(SpreadsheetDoc),
}

/// Parse a JSON grid (plain rows or spreadsheet API document).
pub fn parse_json_str(content: &str) -> GridResult<RawGrid> {
    grid_from_json(serde_json::from_str(content)?)
}

/// Same as [`parse_json_str`], for an already-decoded JSON value.
pub fn parse_json_value(value: serde_json::Value) -> GridResult<RawGrid> {
    grid_from_json(serde_json::from_value(value)?)
}

fn grid_from_json(parsed: JsonGrid) -> GridResult<RawGrid> {
    let rows = match parsed {
        JsonGrid::Rows(rows) => rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::from).collect())
            .collect(),
        JsonGrid::Document(doc) => doc
            .sheets
            .into_iter()
            .next()
            .and_then(|sheet| sheet.data.into_iter().next())
            .map(|data| {
                data.row_data
                    .into_iter()
                    .map(|row| row.values.into_iter().map(Cell::from).collect())
                    .collect()
            })
            .unwrap_or_default(),
    };

    Ok(RawGrid::new(rows))
}

// =============================================================================
// CSV
// =============================================================================

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding label
pub fn decode_content(bytes: &[u8], encoding: &str) -> GridResult<String> {
    let label = encoding.to_lowercase();
    if matches!(label.as_str(), "utf-8" | "utf8" | "ascii") {
        return Ok(match String::from_utf8(bytes.to_vec()) {
            Ok(s) => s,
            Err(_) => String::from_utf8_lossy(bytes).to_string(),
        });
    }

    match encoding_rs::Encoding::for_label(label.as_bytes()) {
        Some(enc) => {
            let (decoded, _, had_errors) = enc.decode(bytes);
            if had_errors {
                return Err(GridError::EncodingError(encoding.to_string()));
            }
            Ok(decoded.into_owned())
        }
        // Unknown label: lossy UTF-8
        None => Ok(String::from_utf8_lossy(bytes).to_string()),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text with an explicit delimiter. Rows may have uneven widths.
pub fn parse_csv_str(content: &str, delimiter: char) -> GridResult<RawGrid> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|v| Cell::new(v.trim())).collect());
    }

    Ok(RawGrid::new(rows))
}

// =============================================================================
// Auto-detection
// =============================================================================

/// Parse grid bytes, sniffing JSON vs CSV and auto-detecting CSV settings.
pub fn parse_bytes_auto(bytes: &[u8]) -> GridResult<ParseResult> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let looks_like_json = bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'[' || *b == b'{');

    if looks_like_json {
        let content = decode_content(bytes, "utf-8")?;
        return Ok(ParseResult {
            grid: parse_json_str(&content)?,
            source: SourceFormat::Json,
            encoding: "utf-8".to_string(),
            delimiter: None,
        });
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);

    Ok(ParseResult {
        grid: parse_csv_str(&content, delimiter)?,
        source: SourceFormat::Csv,
        encoding,
        delimiter: Some(delimiter),
    })
}

/// Parse a grid file with auto-detection.
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> GridResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}
