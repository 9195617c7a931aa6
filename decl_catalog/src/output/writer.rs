//! Catalog writers
//!
//! A writer receives a filled [`DeclarationStore`] and persists each kind's
//! record texts, one per line and in order, under that kind's logical name.

use super::error::OutputError;
use crate::config::runtime::{OutputFormat, OutputPreferences};
use crate::logging::codes;
use crate::store::{DeclarationKind, DeclarationRecord, DeclarationStore};
use crate::{log_error, log_success};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub const MANIFEST_FILE_NAME: &str = "catalog.json";

pub trait CatalogWriter: Send + Sync {
    fn write_catalog(&self, store: &DeclarationStore) -> Result<OutputSummary, OutputError>;

    /// Human-readable destination, for logs and CLI output
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputSummary {
    pub destination: String,
    pub files_written: Vec<PathBuf>,
    pub records_written: usize,
    pub bytes_written: usize,
}

/// Record texts joined one per line, each line terminated
pub fn render_lines(store: &DeclarationStore, kind: DeclarationKind) -> String {
    let mut content = String::new();
    for text in store.texts(kind) {
        content.push_str(text);
        content.push('\n');
    }
    content
}

/// Contents of `catalog.json`
#[derive(Debug, Serialize)]
pub struct CatalogManifest<'a> {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub counts: BTreeMap<&'static str, usize>,
    pub records: Vec<&'a DeclarationRecord>,
}

impl<'a> CatalogManifest<'a> {
    pub fn from_store(store: &'a DeclarationStore, source: Option<&Path>) -> Self {
        let counts = DeclarationKind::ALL
            .iter()
            .map(|kind| (kind.logical_name(), store.count(*kind)))
            .collect();

        Self {
            generated_at: Utc::now(),
            source: source.map(|p| p.display().to_string()),
            counts,
            records: store.in_source_order(),
        }
    }
}

/// Writes `constants.txt`, `functions.txt` and `variables.txt` into a directory,
/// plus `catalog.json` in [`OutputFormat::Json`]
#[derive(Debug, Clone)]
pub struct FileCatalogWriter {
    output_dir: PathBuf,
    format: OutputFormat,
    source: Option<PathBuf>,
}

impl FileCatalogWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format: OutputFormat::Text,
            source: None,
        }
    }

    pub fn from_preferences(prefs: &OutputPreferences) -> Self {
        Self::new(prefs.output_dir.clone()).with_format(prefs.format)
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Name the scanned file in the manifest
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn destination(&self, kind: DeclarationKind) -> PathBuf {
        self.output_dir.join(format!("{}.txt", kind.logical_name()))
    }

    fn ensure_directory(&self) -> Result<(), OutputError> {
        let unavailable = |message: String| {
            let error = OutputError::DirectoryUnavailable {
                path: self.output_dir.display().to_string(),
                message,
            };
            log_error!(error.error_code(), "Output directory unavailable",
                "path" => self.output_dir.display()
            );
            error
        };

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(unavailable("exists and is not a directory".to_string()));
        }

        fs::create_dir_all(&self.output_dir).map_err(|e| unavailable(e.to_string()))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), OutputError> {
        fs::write(path, content).map_err(|e| {
            let error = OutputError::WriteFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            };
            log_error!(error.error_code(), "Failed to write catalog file",
                "path" => path.display(),
                "io_error" => e
            );
            error
        })
    }
}

impl CatalogWriter for FileCatalogWriter {
    fn write_catalog(&self, store: &DeclarationStore) -> Result<OutputSummary, OutputError> {
        self.ensure_directory()?;

        let mut summary = OutputSummary {
            destination: self.describe(),
            ..OutputSummary::default()
        };

        for kind in DeclarationKind::ALL {
            let path = self.destination(kind);
            let content = render_lines(store, kind);
            self.write_file(&path, &content)?;

            summary.records_written += store.count(kind);
            summary.bytes_written += content.len();
            summary.files_written.push(path);
        }

        if self.format == OutputFormat::Json {
            let manifest = CatalogManifest::from_store(store, self.source.as_deref());
            let json = serde_json::to_string_pretty(&manifest).map_err(|e| {
                let error = OutputError::SerializationFailed {
                    message: e.to_string(),
                };
                log_error!(error.error_code(), "Failed to serialize catalog manifest");
                error
            })?;

            let path = self.output_dir.join(MANIFEST_FILE_NAME);
            self.write_file(&path, &json)?;
            summary.bytes_written += json.len();
            summary.files_written.push(path);
        }

        log_success!(codes::success::CATALOG_WRITTEN, "Catalog written",
            "destination" => summary.destination,
            "records" => summary.records_written,
            "files" => summary.files_written.len(),
            "format" => self.format.as_str()
        );

        Ok(summary)
    }

    fn describe(&self) -> String {
        self.output_dir.display().to_string()
    }
}

/// Keeps written catalogs in memory
#[derive(Debug, Default)]
pub struct MemoryCatalogWriter {
    outputs: Mutex<BTreeMap<&'static str, Vec<String>>>,
    writes: Mutex<usize>,
    fail: bool,
}

impl MemoryCatalogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer whose every write fails with [`OutputError::WriteFailed`]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn outputs(&self) -> MutexGuard<'_, BTreeMap<&'static str, Vec<String>>> {
        self.outputs.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Lines last written for a kind
    pub fn written(&self, kind: DeclarationKind) -> Vec<String> {
        self.outputs()
            .get(kind.logical_name())
            .cloned()
            .unwrap_or_default()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl CatalogWriter for MemoryCatalogWriter {
    fn write_catalog(&self, store: &DeclarationStore) -> Result<OutputSummary, OutputError> {
        *self.writes.lock().unwrap_or_else(|p| p.into_inner()) += 1;

        if self.fail {
            return Err(OutputError::WriteFailed {
                path: self.describe(),
                message: "writer configured to fail".to_string(),
            });
        }

        let mut outputs = self.outputs();
        let mut summary = OutputSummary {
            destination: self.describe(),
            ..OutputSummary::default()
        };

        for kind in DeclarationKind::ALL {
            let lines: Vec<String> = store.texts(kind).map(str::to_string).collect();
            summary.records_written += lines.len();
            summary.bytes_written += lines.iter().map(|l| l.len() + 1).sum::<usize>();
            outputs.insert(kind.logical_name(), lines);
        }

        Ok(summary)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
