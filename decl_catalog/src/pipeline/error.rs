use super::result::CatalogResult;
use crate::file_processor::FileProcessorError;
use crate::logging::codes;
use crate::output::OutputError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    /// The scan finished but the catalog could not be persisted; the scanned catalog is kept intact
    #[error("Catalog output failed: {source}")]
    Output {
        #[source]
        source: OutputError,
        catalog: Box<CatalogResult>,
    },

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PipelineError::FileProcessing(e) => e.error_code(),
            PipelineError::Output { source, .. } => source.error_code(),
            PipelineError::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// The in-memory catalog that survived an output failure
    pub fn into_catalog(self) -> Option<CatalogResult> {
        match self {
            PipelineError::Output { catalog, .. } => Some(*catalog),
            _ => None,
        }
    }
}
