use std::io::{self, Write};

/// Overwrites the current console line with the running total.
pub fn display_progress(bytes_written: u64) {
    print!("Written: {} bytes        \r", bytes_written);
    // Losing a progress update is harmless.
    let _ = io::stdout().flush();
}
