use std::collections::BTreeMap;

use fileflow::data::export::ExportArtifact;
use fileflow::data::loader::UploadedFile;
use fileflow::data::pipeline::{
    self, FileOptions, FileOutcome, OptionsByFile, PipelineSettings,
};
use fileflow::data::template::{self, CATEGORIES};

// ---------------------------------------------------------------------------
// Template form
// ---------------------------------------------------------------------------

/// Inputs of the "create your own dataset" form.
pub struct TemplateForm {
    pub category: &'static str,
    pub values: BTreeMap<String, String>,
}

impl Default for TemplateForm {
    fn default() -> Self {
        Self {
            category: CATEGORIES[0].0,
            values: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Uploaded bytes and per-file options are the only things kept between
/// frames; `outcomes` is always recomputed from them.
#[derive(Default)]
pub struct AppState {
    /// Files in upload order.
    pub files: Vec<UploadedFile>,

    /// Per-file toggles, keyed by file name.
    pub options: OptionsByFile,

    pub settings: PipelineSettings,

    /// Result of the last pipeline run, one per file.
    pub outcomes: Vec<FileOutcome>,

    pub template: TemplateForm,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Add uploads, replacing any earlier file of the same name.
    pub fn add_files(&mut self, uploads: Vec<UploadedFile>) {
        for upload in uploads {
            match self.files.iter_mut().find(|f| f.name == upload.name) {
                Some(existing) => *existing = upload,
                None => self.files.push(upload),
            }
        }
        self.rerun();
    }

    pub fn remove_file(&mut self, name: &str) {
        self.files.retain(|f| f.name != name);
        self.options.remove(name);
        self.rerun();
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.options.clear();
        self.outcomes.clear();
        self.status_message = None;
    }

    pub fn options_for(&self, name: &str) -> FileOptions {
        self.options.get(name).cloned().unwrap_or_default()
    }

    /// Store new options for a file and recompute everything.
    pub fn set_options(&mut self, name: &str, options: FileOptions) {
        self.options.insert(name.to_string(), options);
        self.rerun();
    }

    /// Re-run the pipeline for every file from its original bytes.
    pub fn rerun(&mut self) {
        self.outcomes = pipeline::run(&self.files, &self.options, &self.settings);
    }

    /// Build the download for one file in its selected format.
    pub fn export(&self, name: &str) -> fileflow::Result<Option<ExportArtifact>> {
        let Some(file) = self.files.iter().find(|f| f.name == name) else {
            return Ok(None);
        };
        pipeline::export_file(file, &self.options_for(name), &self.settings).map(Some)
    }

    pub fn generate_template(&self) -> fileflow::Result<ExportArtifact> {
        template::generate_template(self.template.category, &self.template.values)
    }

    /// Switch the template category; values typed for other fields are dropped.
    pub fn set_category(&mut self, category: &'static str) {
        if self.template.category != category {
            self.template.category = category;
            self.template.values.clear();
        }
    }
}
