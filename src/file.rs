//! Reading configuration sources from disk.
//!
//! A missing optional file is skipped. A missing required file, or any other
//! I/O error, fails the load.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::SectionfigError;

/// A file registered as a configuration source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub required: bool,
}

/// Read one source. Returns `None` for a missing optional file.
pub fn read_source(source: &SourceFile) -> Result<Option<String>, SectionfigError> {
    match std::fs::read_to_string(&source.path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound && !source.required => {
            tracing::debug!(path = %source.path.display(), "optional config file not found");
            Ok(None)
        }
        Err(e) => Err(io_error(&source.path, e)),
    }
}

fn io_error(path: &Path, source: io::Error) -> SectionfigError {
    SectionfigError::IoError {
        path: path.to_path_buf(),
        source,
    }
}
