//! File I/O for input documents and composed sheets

use crate::types::*;
use std::path::Path;

/// Read one input document into memory
pub async fn load_document(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    log::debug!("Read {} ({} bytes)", path.as_ref().display(), bytes.len());
    Ok(bytes)
}

/// Read several input documents, in order
pub async fn load_multiple_documents(paths: &[impl AsRef<Path>]) -> Result<Vec<Vec<u8>>> {
    let mut documents = Vec::new();
    for path in paths {
        documents.push(load_document(path).await?);
    }
    Ok(documents)
}

/// Write an encoded sheet to disk
pub async fn save_document(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path.as_ref(), bytes).await?;
    log::info!("Wrote {} ({} bytes)", path.as_ref().display(), bytes.len());
    Ok(())
}
