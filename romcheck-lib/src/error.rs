use thiserror::Error;

/// Errors reading an archive's entry list.
///
/// These are per-file: the orchestrator records them against the archive
/// and carries on with the rest of the scan.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid 7z archive: {0}")]
    SevenZip(#[from] sevenz_rust::Error),

    #[error("Unsupported archive type: {0}")]
    Unsupported(String),
}

impl ArchiveError {
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}

/// Errors that abort a directory test run.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read ROM directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("ROM test cancelled")]
    Cancelled,
}
