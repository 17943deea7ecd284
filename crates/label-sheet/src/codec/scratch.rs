//! Scoped scratch files

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// A uniquely named temporary file holding one input document.
///
/// The file is deleted when the value is dropped, on every exit path.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Write `contents` to a new scratch file whose name ends with `suffix`
    pub fn create(contents: &[u8], suffix: &str) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("label-sheet-")
            .suffix(suffix)
            .tempfile()?;
        file.write_all(contents)?;
        file.flush()?;
        log::debug!("Scratch file {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
