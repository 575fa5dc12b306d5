use super::model::{Column, TabularFrame};
use crate::error::{FlowError, Result};

impl TabularFrame {
    /// New frame holding exactly `names`, in that order, with every row kept.
    ///
    /// Selecting nothing gives a zero-column frame of the same height.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<TabularFrame> {
        let columns = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.column(name)
                    .cloned()
                    .ok_or_else(|| FlowError::UnknownColumn(name.to_string()))
            })
            .collect::<Result<Vec<Column>>>()?;
        TabularFrame::with_height(columns, self.height())
    }
}

// ---------------------------------------------------------------------------
// Column selection state for the multiselect widget
// ---------------------------------------------------------------------------

/// Which columns of a file the user wants to keep. `None` means "all".
///
/// Names are kept in frame order so toggling a column back on restores it to
/// its original position rather than appending it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    chosen: Option<Vec<String>>,
}

impl ColumnSelection {
    pub fn all() -> Self {
        ColumnSelection { chosen: None }
    }

    pub fn only<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        ColumnSelection {
            chosen: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.chosen
            .as_ref()
            .map_or(true, |chosen| chosen.iter().any(|c| c == name))
    }

    /// Flip one column on or off. Starting from "all", the frame's column
    /// order is taken as the current selection; a column switched back on
    /// goes to the end, like a multiselect.
    pub fn toggle(&mut self, name: &str, frame_order: &[String]) {
        let chosen = self.chosen.get_or_insert_with(|| frame_order.to_vec());
        if let Some(pos) = chosen.iter().position(|c| c == name) {
            chosen.remove(pos);
        } else {
            chosen.push(name.to_string());
        }
    }

    /// Resolve against the columns a frame actually has. Names that have
    /// disappeared are dropped.
    pub fn resolve(&self, frame_order: &[String]) -> Vec<String> {
        match &self.chosen {
            None => frame_order.to_vec(),
            Some(chosen) => chosen
                .iter()
                .filter(|c| frame_order.contains(c))
                .cloned()
                .collect(),
        }
    }
}
