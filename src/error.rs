use std::path::PathBuf;
use std::{io, result};

use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("block size must be a positive number of bytes, got {0}")]
    InvalidBlockSize(usize),
    #[error("failed to create {}", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write failed")]
    Write(#[source] io::Error),
    #[error("failed to remove {}", .path.display())]
    RemoveTempFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
