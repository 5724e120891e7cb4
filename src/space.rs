use std::io;

#[cfg(unix)]
const NO_SPACE_CODES: &[i32] = &[libc::ENOSPC];

// ERROR_HANDLE_DISK_FULL, ERROR_DISK_FULL
#[cfg(windows)]
const NO_SPACE_CODES: &[i32] = &[39, 112];

#[cfg(not(any(unix, windows)))]
const NO_SPACE_CODES: &[i32] = &[];

/// Returns true when `e` means the volume has no allocatable space left.
/// Anything not recognized here must be treated as fatal.
pub fn is_no_space(e: &io::Error) -> bool {
    match e.raw_os_error() {
        Some(code) => NO_SPACE_CODES.contains(&code),
        None => false,
    }
}

/// The error a full device reports on this platform.
pub fn no_space_error() -> io::Error {
    match NO_SPACE_CODES.first() {
        Some(&code) => io::Error::from_raw_os_error(code),
        None => io::Error::new(io::ErrorKind::Other, "no space left on device"),
    }
}
