use std::fmt;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use super::model::{Cell, TabularFrame, format_number};
use crate::error::{FlowError, Result};

/// Rows per worksheet, header included.
const XLSX_MAX_ROWS: usize = 1_048_576;
const XLSX_MAX_COLUMNS: usize = 16_384;

// ---------------------------------------------------------------------------
// Export format
// ---------------------------------------------------------------------------

/// Target of a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Excel];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Excel => "Excel",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Serialized bytes ready to be saved, plus the name and MIME type to save them under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serialize `frame` into `format`, naming the result after `source_name`
/// with its extension swapped.
pub fn export_artifact(
    frame: &TabularFrame,
    source_name: &str,
    format: ExportFormat,
) -> Result<ExportArtifact> {
    let bytes = match format {
        ExportFormat::Csv => write_csv(frame)?,
        ExportFormat::Excel => write_xlsx(frame)?,
    };
    let file_name = replace_extension(source_name, format.extension());
    log::info!(
        "Exported {source_name} as {format} ({} rows, {} bytes) -> {file_name}",
        frame.height(),
        bytes.len()
    );
    Ok(ExportArtifact {
        file_name,
        mime_type: format.mime_type(),
        bytes,
    })
}

/// `report.csv` + `xlsx` → `report.xlsx`. Directory parts are dropped.
pub fn replace_extension(name: &str, extension: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "export".to_string());
    format!("{stem}.{extension}")
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Header plus one record per row, `\n`-terminated, no index column.
/// A frame without columns produces an empty buffer.
pub fn write_csv(frame: &TabularFrame) -> Result<Vec<u8>> {
    if frame.width() == 0 {
        return Ok(Vec::new());
    }
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(frame.column_names())?;
    for row in frame.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| FlowError::Io(std::io::Error::other(e.to_string())))
}

// ---------------------------------------------------------------------------
// Excel writer
// ---------------------------------------------------------------------------

/// One worksheet named `Sheet1` with a bold header row.
pub fn write_xlsx(frame: &TabularFrame) -> Result<Vec<u8>> {
    let too_large = || FlowError::SheetTooLarge {
        rows: frame.height(),
        columns: frame.width(),
    };
    if frame.height() >= XLSX_MAX_ROWS || frame.width() > XLSX_MAX_COLUMNS {
        return Err(too_large());
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let blank_format = Format::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")?;

    for (col_idx, column) in frame.columns().iter().enumerate() {
        let col = u16::try_from(col_idx).map_err(|_| too_large())?;
        worksheet.write_string_with_format(0, col, &column.name, &header_format)?;

        for (row_idx, cell) in column.cells.iter().enumerate() {
            let row = u32::try_from(row_idx + 1).map_err(|_| too_large())?;
            match cell {
                Cell::Number(v) if v.is_finite() => {
                    worksheet.write_number(row, col, *v)?;
                }
                Cell::Number(v) => {
                    worksheet.write_string(row, col, format_number(*v))?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                // Kept as a blank cell so the used range still covers
                // trailing all-null rows.
                Cell::Null => {
                    worksheet.write_blank(row, col, &blank_format)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{parse_csv, parse_xlsx};
    use crate::data::model::Column;

    #[test]
    fn csv_output_has_no_index_and_integer_floats() {
        let frame = parse_csv(b"a,b\n1,4.0\n2.5,\n").unwrap();
        assert_eq!(write_csv(&frame).unwrap(), b"a,b\n1,4\n2.5,\n");
    }

    #[test]
    fn csv_quotes_embedded_commas() {
        let frame = TabularFrame::new(vec![Column::new("addr", vec![Cell::text("1 Main St, Springfield")])])
            .unwrap();
        assert_eq!(write_csv(&frame).unwrap(), b"addr\n\"1 Main St, Springfield\"\n");
    }

    #[test]
    fn zero_column_frame_is_empty_csv() {
        let frame = parse_csv(b"a\n1\n").unwrap().select::<&str>(&[]).unwrap();
        assert!(write_csv(&frame).unwrap().is_empty());
    }

    #[test]
    fn xlsx_round_trip_keeps_cells() {
        let frame = parse_csv(b"id,name,ok,score\n1,ann,true,2.5\n2,bob,false,\n").unwrap();
        let bytes = write_xlsx(&frame).unwrap();
        assert_eq!(parse_xlsx(&bytes).unwrap(), frame);
    }

    #[test]
    fn xlsx_round_trip_keeps_trailing_null_rows() {
        let frame = parse_csv(b"a,b\n1,2\n,\n").unwrap();
        assert_eq!(frame.height(), 2);
        let back = parse_xlsx(&write_xlsx(&frame).unwrap()).unwrap();
        assert_eq!(back.height(), 2);
        assert_eq!(back, frame);

        let all_null = parse_csv(b"a,b\n,\n,\n").unwrap();
        let back = parse_xlsx(&write_xlsx(&all_null).unwrap()).unwrap();
        assert_eq!(back.height(), 2);
        assert_eq!(back.row(1).unwrap(), vec![&Cell::Null, &Cell::Null]);
    }

    #[test]
    fn artifact_names_and_mime_types() {
        let frame = parse_csv(b"a\n1\n").unwrap();

        let csv = export_artifact(&frame, "report.xlsx", ExportFormat::Csv).unwrap();
        assert_eq!(csv.file_name, "report.csv");
        assert_eq!(csv.mime_type, "text/csv");

        let xlsx = export_artifact(&frame, "report.csv", ExportFormat::Excel).unwrap();
        assert_eq!(xlsx.file_name, "report.xlsx");
        assert_eq!(
            xlsx.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert!(xlsx.bytes.starts_with(b"PK"), "xlsx output is a zip archive");
    }

    #[test]
    fn extension_replacement() {
        assert_eq!(replace_extension("Q1.Sales.CSV", "xlsx"), "Q1.Sales.xlsx");
        assert_eq!(replace_extension("dir/data.csv", "csv"), "data.csv");
        assert_eq!(replace_extension("", "csv"), "export.csv");
    }
}
