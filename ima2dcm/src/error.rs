use crate::args::ArgumentFormatError;
use crate::convert::EncodeError;
use crate::pixels::PixelReadError;
use ima_config::ConfigParseError;
use std::path::PathBuf;

/// Where a configuration was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Embedded,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Embedded => f.write_str("embedded default configuration"),
        }
    }
}

/// Any failure of the converter. None of them are retried.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    ArgumentFormat(#[from] ArgumentFormatError),

    #[error("cannot determine the current working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    #[error("input directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("cannot create directory {}: {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("cannot read configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration in {config}: {source}")]
    ConfigParse {
        config: ConfigSource,
        source: ConfigParseError,
    },

    #[error("refusing to overwrite existing file {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("cannot write configuration file {}: {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot list input directory {}: {source}", .path.display())]
    ListDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot read pixels of {}: {source}", .path.display())]
    PixelRead {
        path: PathBuf,
        source: PixelReadError,
    },

    #[error("cannot convert {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: EncodeError,
    },
}
