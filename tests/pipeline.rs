//! End-to-end runs of the ingest → clean → project → export pipeline through
//! the public API.

use std::collections::BTreeMap;

use anyhow::Result;
use fileflow::FlowError;
use fileflow::data::export::{ExportFormat, write_csv, write_xlsx};
use fileflow::data::loader::{UploadedFile, load_frame, parse_csv, parse_xlsx};
use fileflow::data::pipeline::{FileOptions, OptionsByFile, PipelineSettings, export_file, run};
use fileflow::data::select::ColumnSelection;
use fileflow::data::template::generate_template;

const SALES: &str = "\
Date,Customer Name,Product,Quantity,Price
2024-03-01,Ana,Pen,2,2.5
2024-03-02,Chen,Lamp,,18.9
2024-03-01,Ana,Pen,2,2.5
2024-03-03,Dana,Notebook,4,
";

fn clean_everything() -> FileOptions {
    FileOptions {
        clean_requested: true,
        dedupe_requested: true,
        impute_requested: true,
        ..FileOptions::default()
    }
}

#[test]
fn worked_example_from_upload_to_csv() -> Result<()> {
    let file = UploadedFile::new("numbers.csv", b"a,b\n1,\n1,4\n1,4\n".to_vec());

    let dedupe_only = FileOptions {
        clean_requested: true,
        dedupe_requested: true,
        ..FileOptions::default()
    };
    let deduped = export_file(&file, &dedupe_only, &PipelineSettings::default())?;
    assert_eq!(deduped.bytes, b"a,b\n1,\n1,4\n");

    let cleaned = export_file(&file, &clean_everything(), &PipelineSettings::default())?;
    assert_eq!(cleaned.bytes, b"a,b\n1,4\n1,4\n");
    assert_eq!(cleaned.file_name, "numbers.csv");
    Ok(())
}

#[test]
fn csv_to_excel_conversion_is_readable() -> Result<()> {
    let file = UploadedFile::new("sales.csv", SALES.as_bytes().to_vec());
    let options = FileOptions {
        columns: ColumnSelection::only(["Product", "Quantity", "Price"]),
        export_format: ExportFormat::Excel,
        ..clean_everything()
    };

    let artifact = export_file(&file, &options, &PipelineSettings::default())?;
    assert_eq!(artifact.file_name, "sales.xlsx");

    let frame = parse_xlsx(&artifact.bytes)?;
    assert_eq!(frame.column_names(), vec!["Product", "Quantity", "Price"]);
    assert_eq!(frame.height(), 3, "duplicate sale removed");
    assert_eq!(frame.column("Quantity").map(|c| c.null_count()), Some(0));
    assert_eq!(frame.column("Price").map(|c| c.null_count()), Some(0));
    Ok(())
}

#[test]
fn csv_round_trip_through_both_formats() -> Result<()> {
    let original = parse_csv(SALES.as_bytes())?;

    let via_csv = parse_csv(&write_csv(&original)?)?;
    assert_eq!(via_csv, original);

    let via_xlsx = parse_xlsx(&write_xlsx(&original)?)?;
    assert_eq!(via_xlsx, original);
    Ok(())
}

#[test]
fn mixed_uploads_report_per_file() {
    let files = vec![
        UploadedFile::new("report.txt", b"a\n1\n".to_vec()),
        UploadedFile::new("sales.csv", SALES.as_bytes().to_vec()),
        UploadedFile::new("broken.xlsx", b"definitely not a workbook".to_vec()),
    ];
    let outcomes = run(&files, &OptionsByFile::new(), &PipelineSettings::default());

    let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["report.txt", "sales.csv", "broken.xlsx"]);

    let unsupported = outcomes[0].result.as_ref().unwrap_err();
    assert_eq!(unsupported.to_string(), "unsupported file type: .txt");
    assert!(matches!(outcomes[2].result, Err(FlowError::Excel(_))));

    let sales = outcomes[1].result.as_ref().unwrap();
    assert_eq!(sales.frame.height(), 4);
    assert_eq!(sales.preview.height(), 4);
    assert!(sales.chart.is_none());
}

#[test]
fn uploads_from_disk_keep_only_the_file_name() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Inventory.CSV");
    std::fs::write(&path, "sku,count\nA1,3\n")?;

    let file = UploadedFile::from_path(&path)?;
    assert_eq!(file.name, "Inventory.CSV");
    assert_eq!(file.size(), 15);

    let frame = load_frame(&file)?;
    assert_eq!(frame.column_names(), vec!["sku", "count"]);
    Ok(())
}

#[test]
fn exported_excel_file_can_be_uploaded_again() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file = UploadedFile::new("sales.csv", SALES.as_bytes().to_vec());
    let options = FileOptions {
        export_format: ExportFormat::Excel,
        ..FileOptions::default()
    };

    let artifact = export_file(&file, &options, &PipelineSettings::default())?;
    let path = dir.path().join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)?;

    let reloaded = load_frame(&UploadedFile::from_path(&path)?)?;
    assert_eq!(reloaded, parse_csv(SALES.as_bytes())?);
    Ok(())
}

#[test]
fn excel_export_keeps_rows_without_values() -> Result<()> {
    let file = UploadedFile::new("gaps.csv", b"a,b\n1,x\nNA,\n,\n".to_vec());
    let options = FileOptions {
        export_format: ExportFormat::Excel,
        ..FileOptions::default()
    };

    let artifact = export_file(&file, &options, &PipelineSettings::default())?;
    let frame = parse_xlsx(&artifact.bytes)?;
    assert_eq!(frame.height(), 3);
    assert_eq!(frame, parse_csv(b"a,b\n1,x\n,\n,\n")?);
    Ok(())
}

#[test]
fn template_for_e_commerce() -> Result<()> {
    let mut values = BTreeMap::new();
    values.insert("Order ID".to_string(), "A-17".to_string());
    values.insert("Shipping Address".to_string(), "1 Main St, Springfield".to_string());

    let artifact = generate_template("E-Commerce", &values)?;
    assert_eq!(artifact.file_name, "E-Commerce.csv");
    assert_eq!(
        String::from_utf8(artifact.bytes)?,
        "Order ID,Customer Name,Product Name,Category,Price,Quantity,Order Date,Shipping Address\n\
         A-17,,,,,,,\"1 Main St, Springfield\"\n"
    );
    Ok(())
}
