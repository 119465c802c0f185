use super::{KNOWN_FLAGS, RawArgs};
use crate::error::{ConfigSource, Error};
use ima_config::ImaConfig;
use std::path::{Path, PathBuf};

/// What the program was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Print usage.
    Help,
    /// Write the embedded configuration into the given directory.
    GenerateConfig(PathBuf),
    /// Convert a directory of IMA files.
    Convert(ConversionRequest),
}

/// A fully resolved conversion: both directories exist and the
/// configuration has been loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config: ImaConfig,
}

impl Command {
    /// Interpret collected arguments. Relative paths are resolved against `cwd`.
    ///
    /// `--help` wins over `--genconf`, which wins over a conversion. Neither
    /// of them touches the input, output or configuration flags.
    pub fn interpret(args: &RawArgs, cwd: &Path) -> Result<Self, Error> {
        for name in args.names().filter(|n| !KNOWN_FLAGS.contains(n)) {
            tracing::warn!(flag = name, "ignoring unknown flag");
        }
        if args.contains("help") {
            Ok(Command::Help)
        } else if args.contains("genconf") {
            let dir = resolve_dir(args, "genconf", cwd);
            Ok(Command::GenerateConfig(dir))
        } else {
            ConversionRequest::resolve(args, cwd).map(Command::Convert)
        }
    }
}

impl ConversionRequest {
    /// Resolve the input directory, then the output directory, then the
    /// configuration, stopping at the first failure.
    pub fn resolve(args: &RawArgs, cwd: &Path) -> Result<Self, Error> {
        let input_dir = resolve_input_dir(args, cwd)?;
        let output_dir = resolve_output_dir(args, cwd)?;
        let config = resolve_config(args, cwd)?;
        Ok(Self {
            input_dir,
            output_dir,
            config,
        })
    }
}

fn resolve_dir(args: &RawArgs, name: &str, cwd: &Path) -> PathBuf {
    args.non_empty(name)
        .map(|value| cwd.join(value))
        .unwrap_or_else(|| cwd.to_path_buf())
}

fn resolve_input_dir(args: &RawArgs, cwd: &Path) -> Result<PathBuf, Error> {
    let dir = resolve_dir(args, "in", cwd);
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(Error::DirectoryNotFound(dir))
    }
}

fn resolve_output_dir(args: &RawArgs, cwd: &Path) -> Result<PathBuf, Error> {
    let dir = resolve_dir(args, "out", cwd);
    ensure_directory(&dir)?;
    Ok(dir)
}

/// Create `dir` and its parents unless it is already a directory.
pub(crate) fn ensure_directory(dir: &Path) -> Result<(), Error> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
        path: dir.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %dir.display(), "created directory");
    Ok(())
}

fn resolve_config(args: &RawArgs, cwd: &Path) -> Result<ImaConfig, Error> {
    let Some(value) = args.non_empty("config") else {
        tracing::info!("using embedded default configuration");
        return ImaConfig::embedded_default().map_err(|source| Error::ConfigParse {
            config: ConfigSource::Embedded,
            source,
        });
    };
    let path = cwd.join(value);
    if !path.exists() {
        return Err(Error::ConfigNotFound(path));
    }
    let text = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;
    let config = ImaConfig::parse(&text).map_err(|source| Error::ConfigParse {
        config: ConfigSource::File(path.clone()),
        source,
    })?;
    tracing::info!(path = %path.display(), "loaded configuration");
    Ok(config)
}
