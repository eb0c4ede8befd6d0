// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Everything the pipeline can fail with. Degraded source rows are not errors;
/// they become placeholders in the assembled dataset.
#[derive(Debug, Error)]
pub enum VocabError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("could not parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("could not persist file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unrecognised dataset format for {}", .0.display())]
    UnknownFormat(PathBuf),

    #[error("dataset has no matched signs to sample from")]
    EmptyDataset,

    #[error("no playable example available after {attempts} attempts")]
    NoPlayableExample { attempts: usize },
}

pub type Result<T> = std::result::Result<T, VocabError>;
