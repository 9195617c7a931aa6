//! Input collaborator: one complete text buffer per path, or a distinguishable failure

mod processor;

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT_FOR_ANALYSIS,
};
use crate::config::runtime::FileProcessorPreferences;
use std::path::Path;

pub use processor::{
    FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError, C_SOURCE_EXTENSIONS,
};

/// Read a file with default settings
pub fn process_file(file_path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

pub fn create_processor() -> FileProcessor {
    FileProcessor::new()
}

pub fn create_processor_from_preferences(prefs: &FileProcessorPreferences) -> FileProcessor {
    FileProcessor::from_preferences(prefs)
}

/// Whether a path names a `.c` or `.h` file (case-insensitive)
pub fn is_c_source_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| C_SOURCE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn get_max_file_size() -> u64 {
    MAX_FILE_SIZE
}

pub fn get_large_file_threshold() -> u64 {
    LARGE_FILE_THRESHOLD
}

pub fn get_max_line_count() -> usize {
    MAX_LINE_COUNT_FOR_ANALYSIS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_source_detection() {
        assert!(is_c_source_path(Path::new("src/main.c")));
        assert!(is_c_source_path(Path::new("include/api.H")));
        assert!(!is_c_source_path(Path::new("lib.cpp")));
        assert!(!is_c_source_path(Path::new("Makefile")));
    }

    #[test]
    fn test_limits_exposed() {
        assert!(get_large_file_threshold() <= get_max_file_size());
        assert!(get_max_line_count() > 0);
    }

    #[test]
    fn test_preferences_carry_through() {
        let prefs = FileProcessorPreferences {
            require_c_extension: false,
            enable_performance_logging: true,
        };
        let processor = create_processor_from_preferences(&prefs);
        assert!(!processor.require_c_extension);
        assert!(processor.enable_performance_logging);
        assert!(create_processor().require_c_extension);
    }
}
