use thiserror::Error;

/// Errors surfaced by the grade engine.
///
/// Field-level parse anomalies are deliberately absent: an unparseable score
/// becomes a not-a-number marker on the record and never aborts a load.
#[derive(Debug, Error)]
pub enum GradebookError {
    /// The input could not be split into a header and a body at all.
    #[error("failed to load grade data: {0}")]
    LoadFailure(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid class filter {0:?}: expected \"all\" or a class number")]
    InvalidClassFilter(String),
}

