#[macro_use]
extern crate log;
#[cfg(unix)]
extern crate libc;

pub mod config;
mod error;
pub mod space;
pub mod temp_file;
pub mod writer;

pub use config::Config;
pub use error::*;
pub use temp_file::TempFile;
pub use writer::{Summary, ZeroWriter};

#[cfg(test)]
extern crate better_panic;

#[cfg(test)]
pub(crate) fn tests_init() {
    better_panic::install();
}
