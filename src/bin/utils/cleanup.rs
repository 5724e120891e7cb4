use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use zerofill::TempFile;

/// Deletes the tempfile, reporting on stdout. Safe to call from every exit
/// path, only the first call does anything.
pub fn cleanup(temp: &TempFile) -> anyhow::Result<()> {
    if temp.is_removed() {
        return Ok(());
    }

    print!("Removing tempfile...");
    io::stdout().flush()?;
    temp.remove().context("failed to remove tempfile")?;
    println!("Done");

    Ok(())
}

/// Spawns a listener that cleans up and exits with status 1 on SIGINT or
/// SIGTERM.
#[cfg(unix)]
pub fn install_signal_handler(temp: Arc<TempFile>, quiet: bool) -> anyhow::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;
    use std::{process, thread};

    let mut signals =
        Signals::new(&[SIGINT, SIGTERM]).context("failed to register signal handler")?;
    thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            debug!("received signal {}", sig);
            if !quiet {
                println!();
            }
            println!("Cleaning up");
            if let Err(e) = cleanup(&temp) {
                eprintln!("Error: {:?}", e);
            }
            process::exit(1);
        }
    });

    Ok(())
}

#[cfg(not(unix))]
pub fn install_signal_handler(_temp: Arc<TempFile>, _quiet: bool) -> anyhow::Result<()> {
    warn!("cleanup on interrupt is not supported on this platform");
    Ok(())
}
