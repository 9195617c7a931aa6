//! Lexical scanning and declaration classification
//!
//! [`scanner`] is the character cursor; [`classifier`] drives it over a buffer
//! and fills a caller-supplied [`DeclarationStore`].

pub mod classifier;
pub mod scanner;

use crate::config::runtime::ScanPreferences;
use crate::file_processor::FileProcessingResult;
use crate::store::DeclarationStore;
use crate::log_debug;

pub use classifier::{
    braces_balanced, find_matching_brace, lookahead_type_lead, DeclarationClassifier, ScanMetrics,
    TypeLeadShape, BASE_TYPE_KEYWORDS, CONST_KEYWORD,
};
pub use scanner::{CommentClose, Scanner};

/// Scan a buffer with default preferences
pub fn scan_source(source: &str, store: &mut DeclarationStore) -> ScanMetrics {
    DeclarationClassifier::new().scan(source, store)
}

pub fn scan_source_with_preferences(
    source: &str,
    store: &mut DeclarationStore,
    preferences: ScanPreferences,
) -> ScanMetrics {
    DeclarationClassifier::with_preferences(preferences).scan(source, store)
}

/// Scan the buffer produced by the file processor
pub fn scan_file_result(
    file_result: &FileProcessingResult,
    store: &mut DeclarationStore,
    preferences: ScanPreferences,
) -> ScanMetrics {
    log_debug!("Starting declaration scan",
        "file" => file_result.metadata.path.display(),
        "size_bytes" => file_result.metadata.size,
        "line_count" => file_result.metadata.line_count
    );

    scan_source_with_preferences(&file_result.source, store, preferences)
}

pub fn create_classifier() -> DeclarationClassifier {
    DeclarationClassifier::new()
}

pub fn create_classifier_with_preferences(preferences: ScanPreferences) -> DeclarationClassifier {
    DeclarationClassifier::with_preferences(preferences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DeclarationKind;

    #[test]
    fn test_scan_source_fills_caller_store() {
        let mut store = DeclarationStore::new();
        let metrics = scan_source("int x;\nint y;", &mut store);

        assert_eq!(metrics.variables, 2);
        assert_eq!(store.count(DeclarationKind::Variable), 2);
    }

    #[test]
    fn test_classifier_reusable_across_buffers() {
        let mut classifier = create_classifier();
        let mut first = DeclarationStore::new();
        let mut second = DeclarationStore::new();

        classifier.scan("void f() {}", &mut first);
        let metrics = classifier.scan("const int A = 1;", &mut second);

        assert_eq!(metrics.functions, 0);
        assert_eq!(metrics.constants, 1);
        assert_eq!(first.count(DeclarationKind::Function), 1);
        assert_eq!(second.count(DeclarationKind::Function), 0);
    }

    #[test]
    fn test_reporting_preference_does_not_change_records() {
        let source = "int ok;\nvoid broken() {";
        let quiet = ScanPreferences {
            report_skipped_constructs: false,
            include_positions_in_logs: false,
        };
        let loud = ScanPreferences {
            report_skipped_constructs: true,
            include_positions_in_logs: true,
        };

        let mut a = DeclarationStore::new();
        let mut b = DeclarationStore::new();
        let ma = scan_source_with_preferences(source, &mut a, quiet);
        let mb = create_classifier_with_preferences(loud).scan(source, &mut b);

        assert_eq!(a, b);
        assert_eq!(ma, mb);
        assert_eq!(ma.unterminated_function_bodies, 1);
    }
}
