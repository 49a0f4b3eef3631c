use thiserror::Error;

/// Load-time failures. These are fatal at startup: the pipeline cannot
/// serve without valid structures. Query-path conditions (no match, missing
/// entities, empty corpus) are ordinary values, never errors.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("duplicate knowledge entry id: {0}")]
    DuplicateId(String),
}
