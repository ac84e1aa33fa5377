use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModuleIdError {
    #[error("Module ID must be exactly {expected} characters long (got {found}).")]
    Length { found: usize, expected: usize },
}

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("CSV missing 'KO' or 'E-value' column in the header.")]
    MissingColumns,
    #[error("failed to read annotation CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read annotation file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    InvalidModuleId(#[from] ModuleIdError),
    #[error("error fetching {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Module {0} not found in nodes data.")]
    MissingNodes(String),
    #[error("Module {0} not found in adjacency data.")]
    MissingAdjacency(String),
}
