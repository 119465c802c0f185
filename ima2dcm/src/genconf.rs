use crate::args::ensure_directory;
use crate::error::Error;
use ima_config::{DEFAULT_CONFIG, DEFAULT_CONFIG_FILE_NAME};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Write the embedded configuration, verbatim, to `dir/default-config.json`.
///
/// Never overwrites an existing file. Returns the path of the new file.
pub fn generate_config(dir: &Path) -> Result<PathBuf, Error> {
    ensure_directory(dir)?;
    let path = dir.join(DEFAULT_CONFIG_FILE_NAME);
    let write_error = |source| Error::ConfigWrite {
        path: path.clone(),
        source,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                Error::ConfigExists(path.clone())
            } else {
                write_error(e)
            }
        })?;
    file.write_all(DEFAULT_CONFIG.as_bytes())
        .map_err(write_error)?;
    tracing::info!(path = %path.display(), "wrote default configuration");
    Ok(path)
}
