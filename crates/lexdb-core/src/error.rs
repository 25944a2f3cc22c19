use thiserror::Error;

use crate::types::ChunkId;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Duplicate chunk id: {0}")]
    DuplicateChunkId(ChunkId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
