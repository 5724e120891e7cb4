use std::cmp::min;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::config::{Config, MIN_AMOUNT};
use crate::space::is_no_space;
use crate::{Error, Result};

/// Outcome of a completed fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub bytes_written: u64,
    pub elapsed: Duration,
    /// Chunk size in use when the loop stopped.
    pub final_amount: usize,
}

impl Summary {
    /// Average throughput, 0 when the run was too short to measure.
    pub fn bytes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.bytes_written as f64 / secs
        } else {
            0.0
        }
    }
}

/// Appends zeroes to `output` until it reports no space left.
pub struct ZeroWriter<W> {
    output: W,
    zeroes: Vec<u8>,
    amount: usize,
    bytes_written: u64,
    limit: Option<u64>,
    started: Instant,
}

impl<W: Write> ZeroWriter<W> {
    pub fn new(output: W, config: &Config) -> Self {
        Self {
            output,
            zeroes: vec![0u8; config.block_size()],
            amount: config.block_size(),
            bytes_written: 0,
            limit: config.limit(),
            started: Instant::now(),
        }
    }

    /// Runs the write loop. `on_progress` gets the running total after every
    /// attempt that got bytes onto the device.
    ///
    /// A no-space error is the normal way out: whenever the device took less
    /// than requested the chunk is halved, and once it drops below
    /// [`MIN_AMOUNT`] the device counts as full. Any other error aborts the run.
    pub fn run<F: FnMut(u64)>(mut self, mut on_progress: F) -> Result<Summary> {
        info!(
            "writing zeroes in chunks of {} bytes{}",
            self.amount,
            match self.limit {
                Some(limit) => format!(", at most {} bytes", limit),
                None => String::new(),
            }
        );

        loop {
            let chunk = match self.limit {
                Some(limit) => {
                    let left = limit.saturating_sub(self.bytes_written);
                    if left == 0 {
                        debug!("limit of {} bytes reached", limit);
                        break;
                    }
                    min(self.amount as u64, left) as usize
                }
                None => self.amount,
            };

            let (n, err) = write_chunk(&mut self.output, &self.zeroes[..chunk]);
            self.bytes_written += n as u64;
            if n > 0 {
                on_progress(self.bytes_written);
            }

            if let Some(e) = err {
                if !is_no_space(&e) {
                    error!("write failed after {} bytes: {}", self.bytes_written, e);
                    return Err(Error::Write(e));
                }

                // Zero-byte attempts count as short too.
                if n != chunk {
                    self.amount /= 2;
                    debug!("no space left, {} of {} bytes written, chunk now {}", n, chunk, self.amount);
                }

                if self.amount < MIN_AMOUNT {
                    break;
                }
            }
        }

        let summary = Summary {
            bytes_written: self.bytes_written,
            elapsed: self.started.elapsed(),
            final_amount: self.amount,
        };
        info!("wrote {} bytes in {:?}", summary.bytes_written, summary.elapsed);

        Ok(summary)
    }
}

/// Writes as much of `buf` as the device takes. Returns how many bytes went
/// through along with the error that stopped it, if any.
fn write_chunk<W: Write>(output: &mut W, mut buf: &[u8]) -> (usize, Option<io::Error>) {
    let mut written = 0;
    while !buf.is_empty() {
        match output.write(buf) {
            Ok(0) => return (written, Some(io::Error::from(io::ErrorKind::WriteZero))),
            Ok(n) => {
                written += n;
                buf = &buf[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return (written, Some(e)),
        }
    }

    (written, None)
}
