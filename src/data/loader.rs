use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, DataType, Reader, Xlsx};

use super::model::{Cell, Column, TabularFrame};
use crate::error::{FlowError, Result};

/// Cell texts read as missing values.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "NULL", "null", "None", "#N/A", "<NA>",
];

// ---------------------------------------------------------------------------
// Uploaded files
// ---------------------------------------------------------------------------

/// Input formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Infer the format from the final extension of `name`, case-insensitively.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = extension_of(name);
        match ext.as_str() {
            ".csv" => Ok(FileFormat::Csv),
            ".xlsx" => Ok(FileFormat::Xlsx),
            _ => Err(FlowError::UnsupportedFormat(ext)),
        }
    }
}

/// Lower-cased extension including the leading dot, or `""` when there is none.
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// A file as handed over by the user. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadedFile {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(UploadedFile { name, bytes })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }

    pub fn format(&self) -> Result<FileFormat> {
        FileFormat::from_file_name(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse an uploaded file into a frame. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – comma-delimited text, first record is the header
/// * `.xlsx` – first worksheet of an Excel workbook, first row is the header
pub fn load_frame(file: &UploadedFile) -> Result<TabularFrame> {
    let frame = match file.format()? {
        FileFormat::Csv => parse_csv(&file.bytes)?,
        FileFormat::Xlsx => parse_xlsx(&file.bytes)?,
    };
    log::info!(
        "Loaded {} ({} rows x {} columns)",
        file.name,
        frame.height(),
        frame.width()
    );
    Ok(frame)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Rows shorter than the header are padded with nulls; longer rows are an error.
pub fn parse_csv(bytes: &[u8]) -> Result<TabularFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(FlowError::Malformed("no columns to parse from file".into())),
    };
    let names = dedupe_headers(header.iter().map(str::to_string).collect());
    let width = names.len();

    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); width];
    for result in records {
        let record = result?;
        if record.len() > width {
            let line = record.position().map_or(0, |p| p.line());
            return Err(FlowError::Malformed(format!(
                "expected {width} fields in line {line}, saw {}",
                record.len()
            )));
        }
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(record.get(idx).map_or(Cell::Null, guess_cell_type));
        }
    }

    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, cells)| Column::new(name, cells))
        .collect();
    TabularFrame::new(columns)
}

fn guess_cell_type(s: &str) -> Cell {
    if is_missing(s) {
        return Cell::Null;
    }
    if let Ok(v) = s.trim().parse::<f64>() {
        return Cell::number(v);
    }
    if s.eq_ignore_ascii_case("true") {
        return Cell::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Cell::Bool(false);
    }
    Cell::Text(s.to_string())
}

fn is_missing(s: &str) -> bool {
    MISSING_MARKERS.contains(&s)
}

/// Blank names become `Unnamed: {index}`; repeats get `.1`, `.2`, … suffixes.
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let count = counts.entry(base.clone()).or_insert(0);
        while names.contains(&candidate) {
            *count += 1;
            candidate = format!("{base}.{count}");
        }
        names.push(candidate);
    }
    names
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// Read the first worksheet. An empty sheet gives an empty frame.
///
/// Blank cells are not part of the cell range, so trailing all-blank rows are
/// recovered from the sheet's recorded used range.
pub fn parse_xlsx(bytes: &[u8]) -> Result<TabularFrame> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| FlowError::Malformed("workbook has no worksheets".into()))?;
    let range = workbook.worksheet_range(&name)?;

    let (Some((header_row, _)), Some(header)) = (range.start(), range.rows().next()) else {
        return TabularFrame::new(Vec::new());
    };
    let used_rows = workbook.worksheet_cells_reader(&name)?.dimensions().end.0;
    let height = (range.height() - 1).max(used_rows.saturating_sub(header_row) as usize);

    let names = dedupe_headers(
        header
            .iter()
            .map(|h| match h {
                Data::Empty => String::new(),
                Data::String(s) => s.clone(),
                other => excel_cell(other).to_string(),
            })
            .collect(),
    );

    let mut columns: Vec<Vec<Cell>> = vec![Vec::with_capacity(height); names.len()];
    for row in range.rows().skip(1) {
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(row.get(idx).map_or(Cell::Null, excel_cell));
        }
    }
    for column in &mut columns {
        column.resize(height, Cell::Null);
    }

    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, cells)| Column::new(name, cells))
        .collect();
    TabularFrame::with_height(columns, height)
}

fn excel_cell(value: &Data) -> Cell {
    match value {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) if is_missing(s) => Cell::Null,
        Data::String(s) => Cell::Text(s.clone()),
        Data::DateTime(_) => value
            .as_datetime()
            .map(|dt| Cell::Text(dt.to_string()))
            .unwrap_or(Cell::Null),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Null,
    }
}
