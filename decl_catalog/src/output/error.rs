use crate::logging::codes;

/// Failures while persisting a catalog. The store being written is never modified.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OutputError {
    #[error("Output directory unavailable: {path}: {message}")]
    DirectoryUnavailable { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Failed to serialize catalog manifest: {message}")]
    SerializationFailed { message: String },
}

impl OutputError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            OutputError::DirectoryUnavailable { .. } => codes::output::OUTPUT_DIRECTORY_UNAVAILABLE,
            OutputError::WriteFailed { .. } => codes::output::OUTPUT_WRITE_FAILED,
            OutputError::SerializationFailed { .. } => codes::output::OUTPUT_SERIALIZATION_FAILED,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}
