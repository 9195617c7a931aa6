use crate::file_processor::FileMetadata;
use crate::lexical::ScanMetrics;
use crate::output::OutputSummary;
use crate::store::{DeclarationKind, DeclarationRecord, DeclarationStore};
use crate::log_success;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// One scanned buffer: the filled store, its metrics and, for files, what the reader saw
#[derive(Debug, Clone)]
pub struct CatalogResult {
    pub store: DeclarationStore,
    pub metrics: ScanMetrics,
    pub file_metadata: Option<FileMetadata>,
    pub processing_duration: Duration,
}

impl CatalogResult {
    pub fn new(
        store: DeclarationStore,
        metrics: ScanMetrics,
        file_metadata: Option<FileMetadata>,
        processing_duration: Duration,
    ) -> Self {
        Self {
            store,
            metrics,
            file_metadata,
            processing_duration,
        }
    }

    /// Record count per kind as scanned, stable after the store is cleared
    pub fn count(&self, kind: DeclarationKind) -> usize {
        match kind {
            DeclarationKind::Constant => self.metrics.constants,
            DeclarationKind::Variable => self.metrics.variables,
            DeclarationKind::Function => self.metrics.functions,
        }
    }

    pub fn total_records(&self) -> usize {
        self.metrics.records()
    }

    pub fn report(&self) -> CatalogReport {
        CatalogReport {
            path: self
                .file_metadata
                .as_ref()
                .map(|m| m.path.display().to_string()),
            counts: DeclarationKind::ALL
                .iter()
                .map(|kind| (kind.logical_name(), self.count(*kind)))
                .collect(),
            metrics: self.metrics.clone(),
            records: self.store.in_source_order().into_iter().cloned().collect(),
            duration_ms: self.processing_duration.as_secs_f64() * 1000.0,
            output: None,
        }
    }

    pub fn log_success(&self) {
        let file = self
            .file_metadata
            .as_ref()
            .map(|m| m.path.display().to_string())
            .unwrap_or_else(|| "<buffer>".to_string());

        log_success!(crate::logging::codes::success::FILE_CATALOGED, "File cataloged",
            "file" => file,
            "constants" => self.metrics.constants,
            "variables" => self.metrics.variables,
            "functions" => self.metrics.functions,
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}

/// Serializable per-file summary
#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub counts: BTreeMap<&'static str, usize>,
    pub metrics: ScanMetrics,
    pub records: Vec<DeclarationRecord>,
    pub duration_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSummary>,
}

impl CatalogReport {
    pub fn with_output(mut self, output: OutputSummary) -> Self {
        self.output = Some(output);
        self
    }
}
