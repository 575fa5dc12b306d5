use thiserror::Error;

/// Every failure the transform pipeline can report for a single file or
/// template. None of them abort a whole run.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read Excel workbook: {0}")]
    Excel(#[from] calamine::XlsxError),

    #[error("failed to write Excel workbook: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("malformed file: {0}")]
    Malformed(String),

    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("frame of {rows} rows x {columns} columns does not fit in a worksheet")]
    SheetTooLarge { rows: usize, columns: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;
