extern crate better_panic;
extern crate clap;
#[macro_use]
extern crate log;
extern crate zerofill;

mod utils;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use zerofill::config::{DEFAULT_BLOCK_SIZE, DEFAULT_FILENAME};
use zerofill::{Config, TempFile, ZeroWriter};

use utils::cleanup::{cleanup, install_signal_handler};
use utils::progress::display_progress;

#[derive(Parser)]
#[clap(
    name = "zerofill",
    version,
    about = "Fill free disk space with zeroes, then delete the file to release it"
)]
struct Options {
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: u32,

    #[clap(short, long, help = "No progress report during zeroing, a bit faster")]
    pub quiet: bool,

    #[clap(
        short = 'b',
        long = "blocksize",
        default_value_t = DEFAULT_BLOCK_SIZE,
        parse(try_from_str = utils::parse_block_size),
        help = "Amount of zeroes to write at each pass (K, M, G suffixes accepted)"
    )]
    pub block_size: usize,

    #[clap(
        short,
        long,
        parse(try_from_str = utils::parse_size),
        help = "Stop after writing this many bytes even if space is left"
    )]
    pub limit: Option<u64>,

    #[clap(name = "file", default_value = DEFAULT_FILENAME, parse(from_os_str))]
    pub file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    better_panic::install();
    let o = Options::parse_from(utils::normalize_args(env::args_os()));
    utils::setup_logging(o.verbose).context("failed to set up logging")?;

    let config = Config::new(o.block_size, o.quiet, o.file, o.limit)?;
    info!("started at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let temp = Arc::new(TempFile::new(config.path()));
    install_signal_handler(Arc::clone(&temp), config.quiet())?;

    let file = temp.open().context("failed to open tempfile")?;
    println!("Using tempfile: '{}'", temp.path().display());

    let quiet = config.quiet();
    let result = ZeroWriter::new(file, &config).run(|n| {
        if !quiet {
            display_progress(n)
        }
    });

    let summary = match result {
        Ok(s) => s,
        Err(e) => {
            cleanup(&temp)?;
            return Err(e).context("failed to fill tempfile");
        }
    };

    if !quiet {
        println!();
    }
    println!(
        "Duration: {:?} ; Performance: {:.3} bytes/sec",
        summary.elapsed,
        summary.bytes_per_second()
    );
    info!(
        "filled {} ({} bytes)",
        utils::size_to_string(summary.bytes_written),
        summary.bytes_written
    );

    cleanup(&temp)
}
