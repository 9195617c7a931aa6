//! Per-file collection of error and warning events with cargo-style output

use super::events::LogEvent;
use crate::config::compile_time::logging::{LOG_BUFFER_SIZE, MAX_LOG_EVENTS_PER_FILE};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// The file a thread is currently cataloging
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub dropped_events: usize,
    pub total_processing_time: Duration,
}

impl ProcessingSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }
}

/// Thread-safe event collector keyed by file path
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    file_contexts: Mutex<BTreeMap<PathBuf, FileProcessingContext>>,
    dropped_events: Mutex<usize>,
    processing_start: Instant,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            file_contexts: Mutex::new(BTreeMap::new()),
            dropped_events: Mutex::new(0),
            processing_start: Instant::now(),
        }
    }

    /// Record an event for a file. Events past the per-file or global limits are counted, not stored.
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = lock(&self.file_events);
        let total: usize = events.values().map(Vec::len).sum();

        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE && total < LOG_BUFFER_SIZE {
            file_events.push(event);
        } else {
            *lock(&self.dropped_events) += 1;
        }
    }

    pub fn record_file_context(&self, context: FileProcessingContext) {
        lock(&self.file_contexts).insert(context.file_path.clone(), context);
    }

    pub fn get_file_events(&self, file_path: &Path) -> Vec<LogEvent> {
        lock(&self.file_events)
            .get(file_path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_file_errors(&self, file_path: &Path) -> Vec<LogEvent> {
        lock(&self.file_events)
            .get(file_path)
            .map(|events| events.iter().filter(|e| e.is_error()).cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_file_warnings(&self, file_path: &Path) -> Vec<LogEvent> {
        lock(&self.file_events)
            .get(file_path)
            .map(|events| events.iter().filter(|e| e.is_warning()).cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        lock(&self.file_events).clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = lock(&self.file_events);
        let contexts = lock(&self.file_contexts);

        let mut summary = ProcessingSummary {
            dropped_events: *lock(&self.dropped_events),
            total_processing_time: self.processing_start.elapsed(),
            ..ProcessingSummary::default()
        };

        for path in contexts.keys().chain(events.keys().filter(|p| !contexts.contains_key(*p))) {
            let file_events = events.get(path).map(Vec::as_slice).unwrap_or(&[]);
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();

            summary.total_files += 1;
            if errors > 0 {
                summary.failed_files += 1;
            } else if warnings > 0 {
                summary.files_with_warnings += 1;
                summary.successful_files += 1;
            } else {
                summary.successful_files += 1;
            }

            summary.total_errors += errors;
            summary.total_warnings += warnings;
        }

        summary
    }

    pub fn total_event_count(&self) -> usize {
        lock(&self.file_events).values().map(Vec::len).sum()
    }

    pub fn clear(&self) {
        lock(&self.file_events).clear();
        lock(&self.file_contexts).clear();
        *lock(&self.dropped_events) = 0;
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Render collected errors and warnings grouped by file, cargo style
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        let reportable: Vec<_> = events
            .iter()
            .filter(|e| e.is_error() || e.is_warning())
            .collect();

        if reportable.is_empty() {
            continue;
        }

        output.push_str(&format!("Cataloging {}...\n", file_path.display()));

        for event in reportable {
            let label = if event.is_error() { "error" } else { "warning" };
            let location = event
                .span
                .as_ref()
                .map(|s| {
                    format!(
                        "\n  --> {}:{}:{}",
                        file_path.display(),
                        s.start().line,
                        s.start().column
                    )
                })
                .unwrap_or_default();

            output.push_str(&format!(
                "{}[{}]: {}{}\n",
                label,
                event.code.as_str(),
                event.message,
                location
            ));

            for (key, value) in &event.context {
                if key != "file" && key != "file_id" {
                    output.push_str(&format!("  = {}: {}\n", key, value));
                }
            }

            if event.is_error() {
                let action = event.recommended_action();
                if action != "No specific action available" {
                    output.push_str(&format!("  = help: {}\n", action));
                }
            }
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.total_errors > 0 {
        output.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }
    if summary.total_warnings > 0 {
        output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }
    if summary.dropped_events > 0 {
        output.push_str(&format!(
            "Events dropped over limit: {}\n",
            summary.dropped_events
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_events_grouped_by_file() {
        let collector = ErrorCollector::new();
        let a = PathBuf::from("a.c");
        let b = PathBuf::from("b.c");

        collector.record_event(&a, LogEvent::error(codes::file_processing::IO_ERROR, "boom"));
        collector.record_event(&a, LogEvent::warning("careful"));
        collector.record_event(&b, LogEvent::warning("careful"));

        assert_eq!(collector.get_file_errors(&a).len(), 1);
        assert_eq!(collector.get_file_warnings(&a).len(), 1);
        assert_eq!(collector.get_file_events(&b).len(), 1);
        assert_eq!(collector.total_event_count(), 3);

        let summary = collector.get_summary();
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.files_with_warnings, 1);
        assert_eq!(summary.total_errors, 1);
        assert_eq!(summary.total_warnings, 2);
    }

    #[test]
    fn test_files_without_events_count_as_successful() {
        let collector = ErrorCollector::new();
        collector.record_file_context(FileProcessingContext::new(PathBuf::from("ok.c"), 0));

        let summary = collector.get_summary();
        assert_eq!(summary.total_files, 1);
        assert_eq!(summary.successful_files, 1);
        assert!(!summary.has_errors());
    }

    #[test]
    fn test_per_file_limit() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("noisy.c");

        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 5 {
            collector.record_event(&path, LogEvent::warning("noise"));
        }

        assert_eq!(collector.get_file_events(&path).len(), MAX_LOG_EVENTS_PER_FILE);
        assert_eq!(collector.get_summary().dropped_events, 5);
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let path = PathBuf::from("src/main.c");
        let span = Span::point(Position::new(40, 4, 1));

        collector.record_event(
            &path,
            LogEvent::warning_with_code(
                codes::scanning::TRUNCATED_DECLARATION,
                "Declaration truncated at end of input",
            )
            .with_span(span)
            .with_context("lead_word", "int"),
        );

        let output = format_cargo_style_errors(&collector);
        assert!(output.contains("Cataloging src/main.c..."));
        assert!(output.contains("warning[W021]: Declaration truncated at end of input"));
        assert!(output.contains("--> src/main.c:4:1"));
        assert!(output.contains("= lead_word: int"));
        assert!(output.contains("Total warnings: 1"));
    }

    #[test]
    fn test_clear() {
        let collector = ErrorCollector::new();
        collector.record_event(Path::new("x.c"), LogEvent::warning("w"));
        collector.clear();
        assert_eq!(collector.total_event_count(), 0);
    }
}
