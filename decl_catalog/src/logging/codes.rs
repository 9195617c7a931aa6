//! Error, warning and success codes with their classification metadata
//!
//! Every code the catalog emits is declared here and registered with a category,
//! severity, recoverability and a recommended action.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// Input collaborator failures
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const TOO_MANY_LINES: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Constructs the scanner skips without emitting a record
pub mod scanning {
    use super::Code;

    pub const UNTERMINATED_BLOCK_COMMENT: Code = Code::new("W020");
    pub const TRUNCATED_DECLARATION: Code = Code::new("W021");
    pub const UNTERMINATED_FUNCTION_BODY: Code = Code::new("W022");
    pub const LARGE_CATALOG: Code = Code::new("W023");
}

/// Output collaborator failures
pub mod output {
    use super::Code;

    pub const OUTPUT_DIRECTORY_UNAVAILABLE: Code = Code::new("E040");
    pub const OUTPUT_WRITE_FAILED: Code = Code::new("E041");
    pub const OUTPUT_SERIALIZATION_FAILED: Code = Code::new("E042");
}

pub mod batch {
    use super::Code;

    pub const DIRECTORY_NOT_FOUND: Code = Code::new("E060");
    pub const NO_SOURCE_FILES: Code = Code::new("E061");
    pub const DIRECTORY_READ_FAILED: Code = Code::new("E062");
    pub const WORKER_FAILURE: Code = Code::new("E063");
    pub const TOO_MANY_FILES: Code = Code::new("E064");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const SCAN_COMPLETE: Code = Code::new("I020");
    pub const CATALOG_WRITTEN: Code = Code::new("I040");
    pub const FILE_CATALOGED: Code = Code::new("I050");
    pub const FILE_DISCOVERY_COMPLETE: Code = Code::new("I060");
    pub const BATCH_COMPLETE: Code = Code::new("I061");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        use Severity::*;

        let entries = vec![
            // System
            ErrorMetadata::new(
                "ERR001",
                "System",
                Critical,
                false,
                true,
                "Critical internal error",
                "File a bug report with the input that triggered it",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Critical,
                false,
                true,
                "Logging or runtime initialization failed",
                "Check that initialization runs once per process",
            ),
            ErrorMetadata::new(
                "ERR003",
                "System",
                High,
                false,
                true,
                "Runtime configuration could not be loaded",
                "Fix the configuration file or remove the --config flag",
            ),
            // File processing
            ErrorMetadata::new(
                "E005",
                "FileProcessing",
                High,
                false,
                true,
                "Input file does not exist",
                "Check the path passed to the catalog",
            ),
            ErrorMetadata::new(
                "E006",
                "FileProcessing",
                Medium,
                false,
                true,
                "Input is not a C source (.c) or header (.h) file",
                "Pass a .c or .h file or disable the extension requirement",
            ),
            ErrorMetadata::new(
                "E007",
                "FileProcessing",
                High,
                false,
                true,
                "Input exceeds the compile-time size limit",
                "Split the file or build with a profile that allows larger inputs",
            ),
            ErrorMetadata::new(
                "E008",
                "FileProcessing",
                High,
                false,
                true,
                "Input exceeds the compile-time line limit",
                "Split the file or build with a profile that allows more lines",
            ),
            ErrorMetadata::new(
                "E009",
                "FileProcessing",
                High,
                false,
                true,
                "Input file cannot be read due to permissions",
                "Grant read permission on the file",
            ),
            ErrorMetadata::new(
                "E010",
                "FileProcessing",
                Medium,
                false,
                true,
                "Input file is not valid UTF-8",
                "Convert the file to UTF-8",
            ),
            ErrorMetadata::new(
                "E011",
                "FileProcessing",
                High,
                false,
                true,
                "I/O failure while reading the input",
                "Check the file system and retry",
            ),
            ErrorMetadata::new(
                "E012",
                "FileProcessing",
                Medium,
                false,
                true,
                "Input path is empty or not a regular file",
                "Pass the path of a regular file",
            ),
            // Scanning
            ErrorMetadata::new(
                "W020",
                "Scanning",
                Low,
                true,
                false,
                "Block comment reaches end of input without */",
                "Close the comment if the trailing text should be cataloged",
            ),
            ErrorMetadata::new(
                "W021",
                "Scanning",
                Low,
                true,
                false,
                "Type keyword without ';', '=' or '{' before end of input",
                "Complete the declaration",
            ),
            ErrorMetadata::new(
                "W022",
                "Scanning",
                Low,
                true,
                false,
                "Function body is not closed before end of input",
                "Balance the braces of the function body",
            ),
            ErrorMetadata::new(
                "W023",
                "Scanning",
                Low,
                true,
                false,
                "Catalog holds more records than the large-catalog threshold",
                "No action needed unless the count is unexpected",
            ),
            // Output
            ErrorMetadata::new(
                "E040",
                "Output",
                High,
                true,
                false,
                "Output directory cannot be created or is not a directory",
                "Choose a writable output directory",
            ),
            ErrorMetadata::new(
                "E041",
                "Output",
                High,
                true,
                false,
                "Writing a catalog file failed",
                "Check free space and permissions on the output directory",
            ),
            ErrorMetadata::new(
                "E042",
                "Output",
                Medium,
                true,
                false,
                "Catalog manifest could not be serialized",
                "Use the text output format",
            ),
            // Batch
            ErrorMetadata::new(
                "E060",
                "Batch",
                High,
                false,
                true,
                "Input directory does not exist",
                "Check the directory path",
            ),
            ErrorMetadata::new(
                "E061",
                "Batch",
                Medium,
                false,
                true,
                "No .c or .h files found in the directory",
                "Point the catalog at a directory containing C sources",
            ),
            ErrorMetadata::new(
                "E062",
                "Batch",
                High,
                false,
                true,
                "Directory traversal failed",
                "Check directory permissions",
            ),
            ErrorMetadata::new(
                "E063",
                "Batch",
                Critical,
                false,
                true,
                "A batch worker thread panicked",
                "Rerun with --threads 1 and file a bug report",
            ),
            ErrorMetadata::new(
                "E064",
                "Batch",
                Medium,
                false,
                true,
                "Directory holds more files than the batch limit",
                "Use --max-files or catalog subdirectories separately",
            ),
            // Success
            ErrorMetadata::new(
                "I004",
                "Success",
                Low,
                true,
                false,
                "Logging initialized",
                "None",
            ),
            ErrorMetadata::new(
                "I006",
                "Success",
                Low,
                true,
                false,
                "Input file read",
                "None",
            ),
            ErrorMetadata::new(
                "I020",
                "Success",
                Low,
                true,
                false,
                "Scan completed",
                "None",
            ),
            ErrorMetadata::new(
                "I040",
                "Success",
                Low,
                true,
                false,
                "Catalog written",
                "None",
            ),
            ErrorMetadata::new(
                "I050",
                "Success",
                Low,
                true,
                false,
                "File cataloged",
                "None",
            ),
            ErrorMetadata::new(
                "I060",
                "Success",
                Low,
                true,
                false,
                "Source discovery completed",
                "None",
            ),
            ErrorMetadata::new(
                "I061",
                "Success",
                Low,
                true,
                false,
                "Batch completed",
                "None",
            ),
        ];

        entries.into_iter().map(|meta| (meta.code, meta)).collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Codes that must carry metadata for the catalog to start
pub fn required_codes() -> &'static [Code] {
    &[
        system::INTERNAL_ERROR,
        file_processing::FILE_NOT_FOUND,
        file_processing::INVALID_ENCODING,
        scanning::TRUNCATED_DECLARATION,
        output::OUTPUT_WRITE_FAILED,
        batch::NO_SOURCE_FILES,
        success::SCAN_COMPLETE,
    ]
}
