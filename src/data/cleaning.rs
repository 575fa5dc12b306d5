use std::collections::HashSet;

use super::model::{Cell, TabularFrame};

/// What a cleaning pass changed, for the status lines shown next to a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub duplicates_removed: Option<usize>,
    pub cells_filled: Option<usize>,
}

/// Remove rows identical to an earlier row. First occurrences survive in
/// their original order. Returns the number of rows removed.
pub fn drop_duplicates(frame: &mut TabularFrame) -> usize {
    let keep: Vec<bool> = {
        let mut seen: HashSet<Vec<&Cell>> = HashSet::with_capacity(frame.height());
        frame.rows().map(|row| seen.insert(row)).collect()
    };
    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        frame.retain_rows(&keep);
    }
    log::debug!("drop_duplicates removed {removed} rows");
    removed
}

/// Replace missing cells of every numeric column with that column's mean.
///
/// Means are taken over the original non-missing values before any cell is
/// replaced. A numeric column with no values at all, or whose values average
/// to NaN, has no mean and is left missing. Returns the number of cells filled.
pub fn fill_missing_with_mean(frame: &mut TabularFrame) -> usize {
    let mut filled = 0;
    for column in frame.columns_mut() {
        if !column.is_numeric() {
            continue;
        }
        // `inf` and `-inf` together average to NaN, which is no fill value.
        let fill = column.mean().map(Cell::number).unwrap_or(Cell::Null);
        if fill.is_null() {
            log::debug!("column '{}' has no usable mean, leaving it missing", column.name);
            continue;
        }
        for cell in column.cells.iter_mut().filter(|c| c.is_null()) {
            *cell = fill.clone();
            filled += 1;
        }
    }
    log::debug!("fill_missing_with_mean filled {filled} cells");
    filled
}
