use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{FlowError, Result};

// ---------------------------------------------------------------------------
// Cell – a single value in a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a spreadsheet column can hold.
///
/// The loaders and the cleaning steps build numbers through [`Cell::number`],
/// which turns NaN into `Null`, so parsed frames hold no NaN. A NaN placed in
/// `Number` by hand still compares equal to itself, keeping `Eq` lawful.
#[derive(Debug, Clone)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl Cell {
    /// Build a numeric cell, mapping NaN to `Null`.
    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            Cell::Null
        } else {
            Cell::Number(value)
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

// -- Manual Eq/Hash so rows can be used as keys when deduplicating --

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Number(a), Cell::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            (Cell::Null, Cell::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            // 0.0 and -0.0 compare equal, so they must hash alike.
            Cell::Number(v) if *v == 0.0 => 0u64.hash(state),
            Cell::Number(v) if v.is_nan() => f64::NAN.to_bits().hash(state),
            Cell::Number(v) => v.to_bits().hash(state),
            Cell::Text(s) => s.hash(state),
            Cell::Bool(b) => b.hash(state),
            Cell::Null => {}
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{}", format_number(*v)),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Bool(true) => write!(f, "True"),
            Cell::Bool(false) => write!(f, "False"),
            Cell::Null => Ok(()),
        }
    }
}

/// Whole numbers print without a fractional part (`4`, not `4.0`); everything
/// else uses the shortest representation that parses back to the same value.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// A named sequence of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Column {
            name: name.into(),
            cells,
        }
    }

    /// A column is numeric when every non-null cell is a number. A column of
    /// nothing but nulls counts as numeric, like a float column of NaNs.
    pub fn is_numeric(&self) -> bool {
        self.cells
            .iter()
            .all(|c| matches!(c, Cell::Number(_) | Cell::Null))
    }

    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }

    /// Mean of the non-null numbers, or `None` when there are none.
    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self
            .cells
            .iter()
            .filter_map(Cell::as_f64)
            .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
        (count > 0).then(|| sum / count as f64)
    }
}

// ---------------------------------------------------------------------------
// TabularFrame – the parsed table
// ---------------------------------------------------------------------------

/// Ordered columns of equal length.
///
/// The row count is stored separately so a frame projected down to zero
/// columns still reports its height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularFrame {
    columns: Vec<Column>,
    height: usize,
}

impl TabularFrame {
    /// Build a frame, rejecting columns of unequal length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map_or(0, |c| c.cells.len());
        Self::with_height(columns, height)
    }

    /// Build a frame with an explicit height, which must match every column.
    pub fn with_height(columns: Vec<Column>, height: usize) -> Result<Self> {
        if let Some(bad) = columns.iter().find(|c| c.cells.len() != height) {
            return Err(FlowError::RaggedColumns {
                column: bad.name.clone(),
                expected: height,
                found: bad.cells.len(),
            });
        }
        Ok(TabularFrame { columns, height })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Cells of one row, left to right.
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.height {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells[index]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Cell>> + '_ {
        (0..self.height).map(move |i| self.columns.iter().map(|c| &c.cells[i]).collect())
    }

    /// Copy of the first `n` rows.
    pub fn head(&self, n: usize) -> TabularFrame {
        let height = n.min(self.height);
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.cells[..height].to_vec()))
            .collect();
        TabularFrame { columns, height }
    }

    /// Keep only the rows whose flag is `true`. `keep` must have one entry per row.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.height);
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.cells.retain(|_| *flags.next().unwrap_or(&false));
        }
        self.height = keep.iter().filter(|k| **k).count();
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.height == 0
    }
}
