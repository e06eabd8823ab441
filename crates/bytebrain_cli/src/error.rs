use std::io;

use bytebrain::error::NetworkError;
use bytebrain::topology::ParseTopologyError;
use bytebrain_games::brain_io::BrainIoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("invalid topology: {0}")]
    Topology(#[from] ParseTopologyError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("game I/O error: {0}")]
    BrainIo(#[from] BrainIoError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
