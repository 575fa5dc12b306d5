use std::collections::BTreeMap;

use super::cleaning::{CleaningReport, drop_duplicates, fill_missing_with_mean};
use super::export::{ExportArtifact, ExportFormat, export_artifact};
use super::loader::{UploadedFile, load_frame};
use super::model::TabularFrame;
use super::preview::{ChartSeries, chart_series};
use super::select::ColumnSelection;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Settings and per-file options
// ---------------------------------------------------------------------------

/// Knobs that apply to every file in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Rows shown in the preview table.
    pub preview_rows: usize,
    /// Numeric columns drawn in the chart.
    pub chart_series: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            chart_series: 2,
        }
    }
}

/// Everything the user has toggled for one file.
///
/// Deduplication and imputation only take effect while `clean_requested`
/// is also set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOptions {
    pub clean_requested: bool,
    pub dedupe_requested: bool,
    pub impute_requested: bool,
    pub columns: ColumnSelection,
    pub show_chart: bool,
    pub export_format: ExportFormat,
}

impl FileOptions {
    fn dedupe(&self) -> bool {
        self.clean_requested && self.dedupe_requested
    }

    fn impute(&self) -> bool {
        self.clean_requested && self.impute_requested
    }
}

/// Options for every uploaded file, keyed by file name.
pub type OptionsByFile = BTreeMap<String, FileOptions>;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A file after one full pass through the pipeline.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub name: String,
    pub size_kb: f64,
    /// Head of the frame as parsed, before any cleaning.
    pub preview: TabularFrame,
    /// Columns of the parsed frame, for the column picker.
    pub all_columns: Vec<String>,
    pub cleaning: CleaningReport,
    /// The frame as it would be exported.
    pub frame: TabularFrame,
    /// Present only when the chart is switched on.
    pub chart: Option<Vec<ChartSeries>>,
}

/// Per-file result of [`run`]; failures never stop the other files.
#[derive(Debug)]
pub struct FileOutcome {
    pub name: String,
    pub result: Result<ProcessedFile>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Parse `file` from its bytes and apply `options`.
///
/// Order: parse → preview → dedupe → impute → project → chart. Nothing is
/// cached, so calling this again with the same inputs yields the same frame.
pub fn process_file(
    file: &UploadedFile,
    options: &FileOptions,
    settings: &PipelineSettings,
) -> Result<ProcessedFile> {
    let mut frame = load_frame(file)?;
    let preview = frame.head(settings.preview_rows);
    let all_columns = frame.column_names();

    let mut cleaning = CleaningReport::default();
    if options.dedupe() {
        let removed = drop_duplicates(&mut frame);
        log::info!("{}: removed {removed} duplicate rows", file.name);
        cleaning.duplicates_removed = Some(removed);
    }
    if options.impute() {
        let filled = fill_missing_with_mean(&mut frame);
        log::info!("{}: filled {filled} missing values", file.name);
        cleaning.cells_filled = Some(filled);
    }

    let selected = options.columns.resolve(&all_columns);
    if selected != all_columns {
        log::debug!("{}: keeping columns {selected:?}", file.name);
        frame = frame.select(&selected)?;
    }

    let chart = options
        .show_chart
        .then(|| chart_series(&frame, settings.chart_series));

    Ok(ProcessedFile {
        name: file.name.clone(),
        size_kb: file.size_kb(),
        preview,
        all_columns,
        cleaning,
        frame,
        chart,
    })
}

/// Process every file in order. Files without an entry in `options` use the
/// defaults.
pub fn run(
    files: &[UploadedFile],
    options: &OptionsByFile,
    settings: &PipelineSettings,
) -> Vec<FileOutcome> {
    let defaults = FileOptions::default();
    files
        .iter()
        .map(|file| {
            let file_options = options.get(&file.name).unwrap_or(&defaults);
            let result = process_file(file, file_options, settings);
            if let Err(e) = &result {
                log::warn!("Skipping {}: {e}", file.name);
            }
            FileOutcome {
                name: file.name.clone(),
                result,
            }
        })
        .collect()
}

/// Recompute `file` from scratch and serialize it in the chosen format.
pub fn export_file(
    file: &UploadedFile,
    options: &FileOptions,
    settings: &PipelineSettings,
) -> Result<ExportArtifact> {
    let processed = process_file(file, options, settings)?;
    export_artifact(&processed.frame, &file.name, options.export_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;

    fn csv_file(name: &str, body: &str) -> UploadedFile {
        UploadedFile::new(name, body.as_bytes().to_vec())
    }

    fn cleaning_options() -> FileOptions {
        FileOptions {
            clean_requested: true,
            dedupe_requested: true,
            impute_requested: true,
            ..FileOptions::default()
        }
    }

    #[test]
    fn dedupe_then_impute() {
        let file = csv_file("data.csv", "a,b\n1,\n1,4\n1,4\n");
        let processed = process_file(&file, &cleaning_options(), &PipelineSettings::default()).unwrap();
        assert_eq!(
            processed.cleaning,
            CleaningReport {
                duplicates_removed: Some(1),
                cells_filled: Some(1),
            }
        );
        let artifact = export_file(&file, &cleaning_options(), &PipelineSettings::default()).unwrap();
        assert_eq!(artifact.bytes, b"a,b\n1,4\n1,4\n");
    }

    #[test]
    fn cleaning_flags_need_the_clean_toggle() {
        let file = csv_file("data.csv", "a\n1\n1\n");
        let options = FileOptions {
            clean_requested: false,
            ..cleaning_options()
        };
        let processed = process_file(&file, &options, &PipelineSettings::default()).unwrap();
        assert_eq!(processed.frame.height(), 2);
        assert_eq!(processed.cleaning, CleaningReport::default());
    }

    #[test]
    fn preview_is_taken_before_cleaning() {
        let file = csv_file("data.csv", "a\n1\n1\n1\n1\n1\n1\n1\n");
        let processed = process_file(&file, &cleaning_options(), &PipelineSettings::default()).unwrap();
        assert_eq!(processed.preview.height(), 5);
        assert_eq!(processed.frame.height(), 1);
    }

    #[test]
    fn projection_and_chart_follow_the_selection() {
        let file = csv_file("data.csv", "name,x,y,z\na,1,2,3\n");
        let options = FileOptions {
            columns: ColumnSelection::only(["z", "name"]),
            show_chart: true,
            ..FileOptions::default()
        };
        let processed = process_file(&file, &options, &PipelineSettings::default()).unwrap();
        assert_eq!(processed.frame.column_names(), vec!["name", "z"]);
        assert_eq!(processed.all_columns.len(), 4);
        let chart = processed.chart.unwrap();
        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].name, "z");
    }

    #[test]
    fn run_continues_past_failures() {
        let files = vec![
            csv_file("report.txt", "a\n1\n"),
            csv_file("bad.csv", "a\n1,2\n"),
            csv_file("good.csv", "a\n1\n"),
        ];
        let outcomes = run(&files, &OptionsByFile::new(), &PipelineSettings::default());
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(&outcomes[0].result, Err(FlowError::UnsupportedFormat(e)) if e == ".txt"));
        assert!(matches!(&outcomes[1].result, Err(FlowError::Malformed(_))));
        assert!(outcomes[2].result.is_ok());
    }

    #[test]
    fn rerun_is_stateless() {
        let file = csv_file("data.csv", "a\n1\n1\n");
        let mut options = OptionsByFile::new();
        options.insert("data.csv".to_string(), cleaning_options());
        let first = run(std::slice::from_ref(&file), &options, &PipelineSettings::default());
        options.clear();
        let second = run(std::slice::from_ref(&file), &options, &PipelineSettings::default());
        assert_eq!(first[0].result.as_ref().unwrap().frame.height(), 1);
        assert_eq!(second[0].result.as_ref().unwrap().frame.height(), 2);
    }
}
