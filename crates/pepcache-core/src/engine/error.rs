use super::config::ConfigError;
use crate::core::io::fasta::FastaError;
use crate::core::models::ids::{KeyError, PeptideKey};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid identifier: {0}")]
    Key(#[from] KeyError),

    #[error("FASTA error: {0}")]
    Fasta(#[from] FastaError),

    #[error("Failed to lock '{path}': {source}", path = path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read score table '{path}': {source}", path = path.display())]
    ScoreTable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Refusing to cache an empty sequence for peptide '{0}'")]
    EmptySequence(PeptideKey),
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
