use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::{Error, Result};

/// The file being filled with zeroes.
///
/// Shared between the write loop and the signal listener, whichever path
/// ends the run first is the one that deletes it. The other one blocks until
/// the delete has finished.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
    removed: Mutex<bool>,
}

impl TempFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            removed: Mutex::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens for appending, creating the file if missing. Owner-only
    /// permissions on unix.
    pub fn open(&self) -> Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).append(true).create(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        options.open(&self.path).map_err(|source| Error::CreateFile {
            path: self.path.clone(),
            source,
        })
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // The flag stays meaningful even if a holder panicked.
        self.removed.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Waits for a delete in progress on another thread.
    pub fn is_removed(&self) -> bool {
        *self.lock()
    }

    /// Deletes the file. Only the first call touches the filesystem, it
    /// returns `Ok(true)`; later calls return `Ok(false)`.
    pub fn remove(&self) -> Result<bool> {
        let mut removed = self.lock();
        if *removed {
            return Ok(false);
        }
        *removed = true;

        debug!("removing {}", self.path.display());
        fs::remove_file(&self.path).map_err(|source| Error::RemoveTempFile {
            path: self.path.clone(),
            source,
        })?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_appends() {
        crate::tests_init();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zeroes");
        fs::write(&path, b"abc").unwrap();

        let t = TempFile::new(&path);
        let mut f = t.open().unwrap();
        f.write_all(&[0u8; 5]).unwrap();
        drop(f);

        assert_eq!(fs::read(&path).unwrap(), b"abc\0\0\0\0\0");
    }

    #[test]
    #[cfg(unix)]
    fn test_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;
        crate::tests_init();

        let dir = tempfile::tempdir().unwrap();
        let t = TempFile::new(dir.path().join("zeroes"));
        drop(t.open().unwrap());

        let mode = fs::metadata(t.path()).unwrap().permissions().mode();
        // umask can only clear bits
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn test_open_failure() {
        crate::tests_init();

        let dir = tempfile::tempdir().unwrap();
        let t = TempFile::new(dir.path().join("missing").join("zeroes"));
        assert!(matches!(t.open(), Err(Error::CreateFile { .. })));
    }

    #[test]
    fn test_remove_once() {
        crate::tests_init();

        let dir = tempfile::tempdir().unwrap();
        let t = TempFile::new(dir.path().join("zeroes"));
        drop(t.open().unwrap());

        assert!(!t.is_removed());
        assert!(t.remove().unwrap());
        assert!(t.is_removed());
        assert!(!t.path().exists());
        assert!(!t.remove().unwrap());
    }

    #[test]
    fn test_concurrent_remove_waits_for_delete() {
        use std::sync::Arc;
        use std::thread;
        crate::tests_init();

        let dir = tempfile::tempdir().unwrap();
        let t = Arc::new(TempFile::new(dir.path().join("zeroes")));
        drop(t.open().unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let t = Arc::clone(&t);
                thread::spawn(move || {
                    let deleted = t.remove().unwrap();
                    // Losers return only once the file is gone.
                    assert!(!t.path().exists());
                    deleted
                })
            })
            .collect();

        let deleted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&d| d)
            .count();
        assert_eq!(deleted, 1);
        assert!(t.is_removed());
    }

    #[test]
    fn test_remove_missing_file_fails() {
        crate::tests_init();

        let dir = tempfile::tempdir().unwrap();
        let t = TempFile::new(dir.path().join("zeroes"));
        assert!(matches!(t.remove(), Err(Error::RemoveTempFile { .. })));
    }
}
