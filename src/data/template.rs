use std::collections::BTreeMap;

use super::export::{ExportArtifact, ExportFormat, write_csv};
use super::model::{Cell, Column, TabularFrame};
use crate::error::{FlowError, Result};

/// Category name → ordered field names for the "create your own dataset" form.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    ("Sales", &["Date", "Customer Name", "Product", "Quantity", "Price"]),
    ("HR", &["Employee ID", "Name", "Department", "Salary"]),
    ("Finance", &["Transaction ID", "Amount", "Category", "Date"]),
    (
        "E-Commerce",
        &[
            "Order ID",
            "Customer Name",
            "Product Name",
            "Category",
            "Price",
            "Quantity",
            "Order Date",
            "Shipping Address",
        ],
    ),
];

pub fn category_names() -> impl Iterator<Item = &'static str> {
    CATEGORIES.iter().map(|(name, _)| *name)
}

pub fn category_fields(category: &str) -> Option<&'static [&'static str]> {
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, fields)| *fields)
}

/// Build a one-row CSV for `category` from whatever the user typed.
///
/// Values are taken as text verbatim; a field with no entry becomes an empty
/// cell. Keys that are not fields of the category are ignored.
pub fn generate_template(
    category: &str,
    values: &BTreeMap<String, String>,
) -> Result<ExportArtifact> {
    let fields = category_fields(category)
        .ok_or_else(|| FlowError::UnknownCategory(category.to_string()))?;

    let columns = fields
        .iter()
        .map(|field| {
            let value = values.get(*field).cloned().unwrap_or_default();
            Column::new(*field, vec![Cell::Text(value)])
        })
        .collect();
    let frame = TabularFrame::new(columns)?;

    let format = ExportFormat::Csv;
    let bytes = write_csv(&frame)?;
    log::info!("Generated {category} template ({} bytes)", bytes.len());
    Ok(ExportArtifact {
        file_name: format!("{category}.{}", format.extension()),
        mime_type: format.mime_type(),
        bytes,
    })
}
