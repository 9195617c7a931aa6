//! Catalog pipeline: read a file, scan it into a fresh store, optionally write it out

mod error;
mod result;
mod validation;

pub use error::PipelineError;
pub use result::{CatalogReport, CatalogResult};
pub use validation::validate_pipeline;

use crate::config::runtime::{RuntimeConfig, ScanPreferences};
use crate::file_processor::FileProcessor;
use crate::lexical;
use crate::logging;
use crate::output::{CatalogWriter, OutputError, OutputSummary};
use crate::store::DeclarationStore;
use crate::{log_error, log_info};
use std::path::Path;
use std::time::Instant;

/// Scan an in-memory buffer into a fresh store
pub fn catalog_source(source: &str) -> CatalogResult {
    catalog_source_with_preferences(source, ScanPreferences::default())
}

pub fn catalog_source_with_preferences(source: &str, preferences: ScanPreferences) -> CatalogResult {
    let start_time = Instant::now();
    let mut store = DeclarationStore::new();
    let metrics = lexical::scan_source_with_preferences(source, &mut store, preferences);
    CatalogResult::new(store, metrics, None, start_time.elapsed())
}

/// Read and scan one file with default runtime preferences
pub fn process_file(file_path: &Path) -> Result<CatalogResult, PipelineError> {
    process_file_with_config(file_path, &RuntimeConfig::default())
}

pub fn process_file_with_config(
    file_path: &Path,
    config: &RuntimeConfig,
) -> Result<CatalogResult, PipelineError> {
    process_file_with_id(file_path, 0, config)
}

/// Read and scan one file inside its logging context. An unreadable file never reaches the scanner.
pub(crate) fn process_file_with_id(
    file_path: &Path,
    file_id: usize,
    config: &RuntimeConfig,
) -> Result<CatalogResult, PipelineError> {
    logging::with_file_context(file_path.to_path_buf(), file_id, || {
        let start_time = Instant::now();

        log_info!("Cataloging file", "file" => file_path.display());

        let processor = FileProcessor::from_preferences(&config.file_processor);
        let file_result = processor.process_file(file_path)?;

        let mut store = DeclarationStore::new();
        let metrics =
            lexical::scan_file_result(&file_result, &mut store, config.scanning.clone());

        let result = CatalogResult::new(
            store,
            metrics,
            Some(file_result.metadata),
            start_time.elapsed(),
        );
        result.log_success();

        Ok(result)
    })
}

/// Hand a catalog to the output collaborator. The store is only read.
pub fn write_catalog(
    result: &CatalogResult,
    writer: &dyn CatalogWriter,
) -> Result<OutputSummary, OutputError> {
    writer.write_catalog(&result.store)
}

/// Read, scan and write one file with default runtime preferences
pub fn process_and_write(
    file_path: &Path,
    writer: &dyn CatalogWriter,
) -> Result<(CatalogResult, OutputSummary), PipelineError> {
    process_and_write_with_config(file_path, &RuntimeConfig::default(), writer)
}

/// Read, scan and write one file. On success the store has been drained and cleared;
/// metrics keep the counts. On output failure the filled catalog is returned inside the error.
pub fn process_and_write_with_config(
    file_path: &Path,
    config: &RuntimeConfig,
    writer: &dyn CatalogWriter,
) -> Result<(CatalogResult, OutputSummary), PipelineError> {
    process_and_write_with_id(file_path, 0, config, writer)
}

pub(crate) fn process_and_write_with_id(
    file_path: &Path,
    file_id: usize,
    config: &RuntimeConfig,
    writer: &dyn CatalogWriter,
) -> Result<(CatalogResult, OutputSummary), PipelineError> {
    let result = process_file_with_id(file_path, file_id, config)?;
    finish_write(file_path, file_id, result, writer)
}

/// Read, scan and write one file, returning a report taken before the store is cleared
pub fn process_and_report(
    file_path: &Path,
    config: &RuntimeConfig,
    writer: &dyn CatalogWriter,
) -> Result<CatalogReport, PipelineError> {
    let result = process_file_with_id(file_path, 0, config)?;
    let report = result.report();
    let (_, output) = finish_write(file_path, 0, result, writer)?;
    Ok(report.with_output(output))
}

fn finish_write(
    file_path: &Path,
    file_id: usize,
    mut result: CatalogResult,
    writer: &dyn CatalogWriter,
) -> Result<(CatalogResult, OutputSummary), PipelineError> {
    match write_catalog(&result, writer) {
        Ok(summary) => {
            result.store.clear_all();
            Ok((result, summary))
        }
        Err(source) => {
            logging::with_file_context(file_path.to_path_buf(), file_id, || {
                log_error!(source.error_code(), "Catalog could not be written",
                    "destination" => writer.describe(),
                    "records" => result.total_records()
                );
            });
            Err(PipelineError::Output {
                source,
                catalog: Box::new(result),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{FileCatalogWriter, MemoryCatalogWriter};
    use crate::store::DeclarationKind;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_catalog_source() {
        let result = catalog_source("const int X = 5;\nint y = 2;\nvoid f() { int z = 1; }");
        assert_eq!(result.total_records(), 3);
        assert!(result.file_metadata.is_none());

        let report = result.report();
        assert_eq!(report.counts["functions"], 1);
        assert_eq!(report.records.len(), 3);
        assert!(report.path.is_none());
    }

    #[test]
    fn test_process_file_reads_and_scans() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.c");
        fs::write(&path, "int a = {1,2};\nvoid g() { if (1) { } }\n").unwrap();

        let result = process_file(&path).unwrap();
        assert_eq!(
            result.store.texts(DeclarationKind::Variable).collect::<Vec<_>>(),
            vec!["int a = {1,2};"]
        );
        assert_eq!(result.count(DeclarationKind::Function), 1);
        assert_eq!(
            result.file_metadata.as_ref().map(|m| m.file_name()),
            Some("demo.c".to_string())
        );
    }

    #[test]
    fn test_missing_file_never_scans() {
        let dir = tempdir().unwrap();
        let result = process_file(&dir.path().join("gone.c"));
        assert_matches!(result, Err(PipelineError::FileProcessing(_)));
    }

    #[test]
    fn test_process_and_write_clears_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.c");
        fs::write(&path, "const int A = 1;\nint b;\n").unwrap();

        let writer = MemoryCatalogWriter::new();
        let (result, summary) = process_and_write(&path, &writer).unwrap();

        assert_eq!(summary.records_written, 2);
        assert!(result.store.is_empty());
        assert_eq!(result.total_records(), 2);
        assert_eq!(writer.written(DeclarationKind::Constant), vec!["const int A = 1;"]);
    }

    #[test]
    fn test_output_failure_keeps_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.c");
        fs::write(&path, "int b;\n").unwrap();

        let error = process_and_write(&path, &MemoryCatalogWriter::failing()).unwrap_err();
        assert_eq!(error.error_code(), crate::logging::codes::output::OUTPUT_WRITE_FAILED);

        let catalog = error.into_catalog().unwrap();
        assert_eq!(catalog.store.count(DeclarationKind::Variable), 1);
    }

    #[test]
    fn test_process_and_write_to_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.c");
        fs::write(&path, "void f() {}\n").unwrap();

        let writer = FileCatalogWriter::new(dir.path().join("output_files"));
        process_and_write(&path, &writer).unwrap();

        assert_eq!(
            fs::read_to_string(writer.destination(DeclarationKind::Function)).unwrap(),
            "void f() {}\n"
        );
        assert_eq!(
            fs::read_to_string(writer.destination(DeclarationKind::Constant)).unwrap(),
            ""
        );
    }

    #[test]
    fn test_process_and_report_keeps_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.c");
        fs::write(&path, "const int A = 1;\nvoid f() { }\nint b;\n").unwrap();

        let writer = MemoryCatalogWriter::new();
        let report = process_and_report(&path, &RuntimeConfig::default(), &writer).unwrap();

        assert_eq!(report.records.len(), 3);
        assert_eq!(report.counts["variables"], 1);
        assert_eq!(report.output.as_ref().map(|o| o.records_written), Some(3));
        assert_eq!(writer.write_count(), 1);

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["records"][1]["text"], "void f() { }");
        assert_eq!(json["counts"]["functions"], 1);
        assert!(json["path"].as_str().unwrap().ends_with("demo.c"));
    }

    #[test]
    fn test_process_and_report_output_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.c");
        fs::write(&path, "int b;\n").unwrap();

        let writer = MemoryCatalogWriter::failing();
        let result = process_and_report(&path, &RuntimeConfig::default(), &writer);
        assert_matches!(result, Err(PipelineError::Output { .. }));
    }

    #[test]
    fn test_validate_pipeline() {
        assert!(validate_pipeline().is_ok());
    }

    #[test]
    fn test_pipeline_error_creation() {
        let error = PipelineError::pipeline_error("Test error");
        assert_matches!(error, PipelineError::Pipeline { ref message } if message == "Test error");
        assert!(error.into_catalog().is_none());
    }
}
