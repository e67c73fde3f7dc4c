//! Temporary PCM files and all-or-nothing header writes.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

static TEMP_COUNTER: AtomicU32 = AtomicU32::new(0);
const MAX_TEMP_ATTEMPTS: usize = 64;

/// Error type for output files.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to replace {path}: {source}")]
    Rename {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file in the system temp directory that is removed when dropped.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Create a new empty file with the given extension, e.g. `raw`.
    /// The file is created exclusively, so an existing file or symlink at the chosen name is
    /// never reused.
    ///
    /// # Errors
    ///
    /// Any I/O error other than a name collision, or running out of attempts.
    pub fn create(extension: &str) -> io::Result<Self> {
        let dir = std::env::temp_dir();
        for _ in 0..MAX_TEMP_ATTEMPTS {
            let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos())
                .unwrap_or_default();
            let path = dir.join(format!(
                "pcmarray-{}-{n}-{nanos:08x}.{extension}",
                process::id()
            ));

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(TempFile { path }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "no unused temporary file name found",
        ))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed temporary file {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove temporary file {}: {e}",
                self.path.display()
            ),
        }
    }
}

/// Write `contents` to `path` so that readers see either the old file or the complete new one.
/// The data goes to a sibling file first, which is renamed over `path` once fully written.
/// The sibling is created exclusively and a leftover file or symlink at its name is an error.
///
/// # Errors
///
/// * `OutputError::Write` - The sibling file could not be created or written.
/// * `OutputError::Rename` - The sibling file could not be moved into place.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), OutputError> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(format!(".{}.partial", process::id()));
    let partial = PathBuf::from(partial);

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&partial) {
        Ok(file) => file,
        Err(source) => {
            return Err(OutputError::Write {
                path: path.to_owned(),
                source,
            })
        }
    };
    let written = file.write_all(contents).and_then(|()| file.sync_all());
    drop(file);
    if let Err(source) = written {
        let _ = fs::remove_file(&partial);
        return Err(OutputError::Write {
            path: path.to_owned(),
            source,
        });
    }

    if let Err(source) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        return Err(OutputError::Rename {
            path: path.to_owned(),
            source,
        });
    }
    Ok(())
}
