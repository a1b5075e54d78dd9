//! Glyph catalog metadata loading.

use std::path::Path;

use pageshell_domain::error::ValidationError;
use pageshell_domain::icon::ChunkTable;

/// Read and validate the partition table stored at `path`.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file cannot be read, is not valid JSON, or
/// describes an empty, unsorted or non-contiguous table.
pub fn load_chunk_table(path: &Path) -> Result<ChunkTable, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    parse_chunk_table(&content)
}

fn parse_chunk_table(content: &str) -> Result<ChunkTable, CatalogError> {
    let table: ChunkTable = serde_json::from_str(content)?;
    table.validate()?;
    Ok(table)
}

/// Catalog metadata errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog metadata")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog metadata")]
    Json(#[from] serde_json::Error),
    #[error("invalid catalog metadata: {0}")]
    Invalid(#[from] ValidationError),
}
