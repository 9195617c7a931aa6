//! Output collaborator: persists each declaration kind to its fixed destination

mod error;
mod writer;

pub use error::OutputError;
pub use writer::{
    render_lines, CatalogManifest, CatalogWriter, FileCatalogWriter, MemoryCatalogWriter,
    OutputSummary, MANIFEST_FILE_NAME,
};
