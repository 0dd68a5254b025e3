use thiserror::Error;

use romcheck_lib::{CatalogError, TestError};

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// DAT catalog could not be loaded
    #[error("DAT error: {0}")]
    Catalog(#[from] CatalogError),

    /// ROM test run aborted
    #[error("{0}")]
    Test(#[from] TestError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
