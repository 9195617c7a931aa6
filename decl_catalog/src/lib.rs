//! Cataloging lexer for C sources
//!
//! A single pass over a source buffer sorts top-level declarations into three
//! ordered collections: constants, variables and functions. Around the scan sit
//! a file reader, catalog writers, a per-file pipeline and a directory batch runner.

#[macro_use]
pub mod logging;

pub mod batch;
pub mod config;
pub mod file_processor;
pub mod lexical;
pub mod output;
pub mod pipeline;
pub mod store;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults, FileCatalog};
pub use config::runtime::RuntimeConfig;
pub use lexical::{DeclarationClassifier, ScanMetrics, Scanner};
pub use output::{CatalogWriter, FileCatalogWriter, OutputError, OutputSummary};
pub use pipeline::{CatalogReport, CatalogResult, PipelineError};
pub use store::{DeclarationKind, DeclarationRecord, DeclarationStore};
pub use utils::{Position, Span};
