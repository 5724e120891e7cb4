use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub const DEFAULT_BLOCK_SIZE: usize = 4096;
pub const DEFAULT_FILENAME: &str = "0slask0.zro";

/// Writes smaller than this are not attempted, the device is considered full.
pub const MIN_AMOUNT: usize = 256;

/// Settings for a single run, fixed before the first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    block_size: usize,
    quiet: bool,
    path: PathBuf,
    limit: Option<u64>,
}

impl Config {
    pub fn new(block_size: usize, quiet: bool, path: PathBuf, limit: Option<u64>) -> Result<Self> {
        if block_size == 0 {
            return Err(Error::InvalidBlockSize(block_size));
        }

        Ok(Self {
            block_size,
            quiet,
            path,
            limit,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Upper bound on bytes written, `None` fills until the device is full.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            quiet: false,
            path: PathBuf::from(DEFAULT_FILENAME),
            limit: None,
        }
    }
}
