//! Directory cataloging
//!
//! Discovers `.c`/`.h` files under a directory and catalogs each one with its
//! own store, sequentially or on worker threads. Per-file catalogs are written
//! under `<output_dir>/<path relative to the directory>/`.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::runtime::RuntimeConfig;
use crate::file_processor::is_c_source_path;
use crate::logging::codes;
use crate::output::{FileCatalogWriter, OutputSummary};
use crate::pipeline::{self, CatalogResult, PipelineError};
use crate::store::DeclarationKind;
use crate::{log_debug, log_error, log_info, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    /// Keep only the first N files after sorting
    pub max_files: Option<usize>,
    pub progress_reporting: bool,
    pub fail_fast: bool,
    /// Write each file's catalog under the configured output directory
    pub write_output: bool,
    pub runtime: RuntimeConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(4),
            recursive: true,
            max_files: None,
            progress_reporting: false,
            fail_fast: false,
            write_output: true,
            runtime: RuntimeConfig::default(),
        }
    }
}

/// A successfully cataloged file
#[derive(Debug)]
pub struct FileCatalog {
    pub path: PathBuf,
    pub result: CatalogResult,
    pub output: Option<OutputSummary>,
}

#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<FileCatalog>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    /// Records of one kind across every cataloged file
    pub fn count(&self, kind: DeclarationKind) -> usize {
        self.successful_files
            .iter()
            .map(|file| file.result.count(kind))
            .sum()
    }

    pub fn total_records(&self) -> usize {
        DeclarationKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }

    pub fn add_success(&mut self, catalog: FileCatalog) {
        self.successful_files.push(catalog);
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: PipelineError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    pub fn merge(&mut self, other: BatchResults) {
        self.successful_files.extend(other.successful_files);
        self.failed_files.extend(other.failed_files);
        self.files_processed += other.files_processed;
    }

    fn sort_by_path(&mut self) {
        self.successful_files.sort_by(|a, b| a.path.cmp(&b.path));
        self.failed_files.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn summary(&self) -> String {
        format!(
            "Cataloged {} of {} files ({:.1}%), {} failed, {} declarations, {:.2}s total",
            self.success_count(),
            self.files_processed,
            self.success_rate() * 100.0,
            self.failure_count(),
            self.total_records(),
            self.processing_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No C source files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("Too many files found: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("IO error during directory traversal: {error}")]
    IoError { error: String },

    #[error("Worker thread error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            BatchError::DirectoryNotFound { .. } => codes::batch::DIRECTORY_NOT_FOUND,
            BatchError::NoFilesFound { .. } => codes::batch::NO_SOURCE_FILES,
            BatchError::TooManyFiles { .. } => codes::batch::TOO_MANY_FILES,
            BatchError::IoError { .. } => codes::batch::DIRECTORY_READ_FAILED,
            BatchError::ThreadError { .. } => codes::batch::WORKER_FAILURE,
        }
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Sorted `.c`/`.h` files under `dir_path`
pub fn discover_c_sources(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, BatchError> {
    log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        let error = BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        };
        log_error!(error.error_code(), "Directory not found", "path" => dir_path.display());
        return Err(error);
    }

    let mut files = Vec::new();
    visit_directory(dir_path, &mut files, config.recursive)?;

    if files.is_empty() {
        let error = BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        };
        log_error!(error.error_code(), "No C source files found", "path" => dir_path.display());
        return Err(error);
    }

    if files.len() > MAX_FILES_PER_BATCH {
        let error = BatchError::TooManyFiles {
            count: files.len(),
            max: MAX_FILES_PER_BATCH,
        };
        log_error!(error.error_code(), "Directory holds more files than one batch allows",
            "files_found" => files.len(),
            "limit" => MAX_FILES_PER_BATCH
        );
        return Err(error);
    }

    files.sort();

    if let Some(max_files) = config.max_files {
        if files.len() > max_files {
            log_info!("Reached maximum file limit",
                "files_found" => files.len(),
                "limit" => max_files
            );
            files.truncate(max_files);
        }
    }

    log_success!(codes::success::FILE_DISCOVERY_COMPLETE, "File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

fn visit_directory(
    dir_path: &Path,
    files: &mut Vec<PathBuf>,
    recursive: bool,
) -> Result<(), BatchError> {
    let entries = fs::read_dir(dir_path).map_err(|e| {
        let error = BatchError::IoError {
            error: format!("{}: {}", dir_path.display(), e),
        };
        log_error!(error.error_code(), "Failed to read directory",
            "path" => dir_path.display(),
            "io_error" => e
        );
        error
    })?;

    for entry in entries {
        let path = entry
            .map_err(|e| BatchError::IoError {
                error: e.to_string(),
            })?
            .path();

        if path.is_dir() {
            if recursive {
                visit_directory(&path, files, recursive)?;
            }
        } else if is_c_source_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn is_c_source_file(path: &Path) -> bool {
    path.is_file() && is_c_source_path(path)
}

/// Per-file output directory: the file's path relative to the batch root
pub fn output_dir_for(output_root: &Path, batch_root: &Path, file_path: &Path) -> PathBuf {
    match file_path.strip_prefix(batch_root) {
        Ok(relative) if !relative.as_os_str().is_empty() => output_root.join(relative),
        _ => output_root.join(file_path.file_name().unwrap_or(file_path.as_os_str())),
    }
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

fn catalog_one(
    batch_root: &Path,
    file_path: &Path,
    file_id: usize,
    config: &BatchConfig,
) -> Result<FileCatalog, PipelineError> {
    if !config.write_output {
        let result = pipeline::process_file_with_id(file_path, file_id, &config.runtime)?;
        return Ok(FileCatalog {
            path: file_path.to_path_buf(),
            result,
            output: None,
        });
    }

    let writer = FileCatalogWriter::new(output_dir_for(
        &config.runtime.output.output_dir,
        batch_root,
        file_path,
    ))
    .with_format(config.runtime.output.format)
    .with_source(file_path);

    let (result, output) =
        pipeline::process_and_write_with_id(file_path, file_id, &config.runtime, &writer)?;

    Ok(FileCatalog {
        path: file_path.to_path_buf(),
        result,
        output: Some(output),
    })
}

fn record_outcome(
    results: &mut BatchResults,
    file_path: &Path,
    outcome: Result<FileCatalog, PipelineError>,
) -> bool {
    match outcome {
        Ok(catalog) => {
            results.add_success(catalog);
            true
        }
        Err(error) => {
            log_debug!("File cataloging failed",
                "file" => file_path.display(),
                "error" => error
            );
            results.add_failure(file_path.to_path_buf(), error);
            false
        }
    }
}

pub fn process_directory_sequential(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();

    log_info!("Starting sequential batch cataloging", "directory" => dir_path.display());

    let files = discover_c_sources(dir_path, config)?;
    let mut results = BatchResults::new();
    results.files_discovered = files.len();

    for (file_id, file_path) in files.iter().enumerate() {
        if config.progress_reporting {
            println!(
                "Cataloging file {} of {}: {}",
                file_id + 1,
                files.len(),
                file_path.display()
            );
        }

        let outcome = catalog_one(dir_path, file_path, file_id, config);
        if !record_outcome(&mut results, file_path, outcome) && config.fail_fast {
            log_info!("Fail-fast enabled, stopping batch", "file" => file_path.display());
            break;
        }
    }

    results.processing_duration = start_time.elapsed();
    log_batch_complete(&results, 1);

    Ok(results)
}

/// Catalog files on up to `max_threads` scoped workers. Results are sorted by path.
pub fn process_directory_parallel(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let threads = config.max_threads.clamp(1, MAX_WORKER_THREADS);

    log_info!("Starting parallel batch cataloging",
        "directory" => dir_path.display(),
        "max_threads" => threads
    );

    let files = discover_c_sources(dir_path, config)?;
    let mut results = BatchResults::new();
    results.files_discovered = files.len();

    let per_worker = files.len().div_ceil(threads);
    let stop = AtomicBool::new(false);

    let partials: Vec<thread::Result<BatchResults>> = thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(per_worker.max(1))
            .enumerate()
            .map(|(worker_id, chunk)| {
                let stop = &stop;
                scope.spawn(move || {
                    let mut partial = BatchResults::new();
                    for (local_id, file_path) in chunk.iter().enumerate() {
                        if stop.load(Ordering::Relaxed) {
                            break;
                        }
                        let file_id = worker_id * per_worker + local_id;
                        let outcome = catalog_one(dir_path, file_path, file_id, config);
                        if !record_outcome(&mut partial, file_path, outcome) && config.fail_fast {
                            stop.store(true, Ordering::Relaxed);
                        }
                    }
                    partial
                })
            })
            .collect();

        handles.into_iter().map(|handle| handle.join()).collect()
    });

    for partial in partials {
        let partial = partial.map_err(|_| {
            let error = BatchError::ThreadError {
                message: "worker panicked while cataloging".to_string(),
            };
            log_error!(error.error_code(), "Worker thread panicked");
            error
        })?;
        results.merge(partial);
    }

    results.sort_by_path();
    results.processing_duration = start_time.elapsed();
    log_batch_complete(&results, threads);

    Ok(results)
}

fn log_batch_complete(results: &BatchResults, threads: usize) {
    log_success!(codes::success::BATCH_COMPLETE, "Batch cataloging completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "declarations" => results.total_records(),
        "threads" => threads,
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );
}

pub fn process_directory_with_config(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    if config.max_threads <= 1 {
        process_directory_sequential(dir_path, config)
    } else {
        process_directory_parallel(dir_path, config)
    }
}
