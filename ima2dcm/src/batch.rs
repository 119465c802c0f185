use crate::args::ConversionRequest;
use crate::convert::Converter;
use crate::encode::{DICOM_EXTENSION, write_dicom};
use crate::error::Error;
use crate::identity::ConversionIdentity;
use crate::pixels::PixelBlock;
use std::path::{Path, PathBuf};

/// File name extension of IMA files, compared case-insensitively.
pub const IMA_EXTENSION: &str = "ima";

/// A source file and the DICOM file written from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Conversion of every IMA file in a directory into one DICOM series.
///
/// Files are processed one after another. The first failure stops the
/// batch; files written before it are left in place.
pub struct Batch<'a> {
    request: &'a ConversionRequest,
    identity: ConversionIdentity,
}

impl<'a> Batch<'a> {
    /// Create a batch with a new study and series.
    pub fn new(request: &'a ConversionRequest) -> Self {
        Self::with_identity(request, ConversionIdentity::generate())
    }

    pub fn with_identity(request: &'a ConversionRequest, identity: ConversionIdentity) -> Self {
        Self { request, identity }
    }

    pub fn identity(&self) -> &ConversionIdentity {
        &self.identity
    }

    /// Convert every IMA file of the input directory, in file name order.
    ///
    /// `on_converted` is called after each file is written.
    pub fn run<F>(&self, mut on_converted: F) -> Result<Vec<ConvertedFile>, Error>
    where
        F: FnMut(&ConvertedFile),
    {
        let sources = list_ima_files(&self.request.input_dir)?;
        if sources.is_empty() {
            tracing::warn!(
                path = %self.request.input_dir.display(),
                "no IMA files found"
            );
        }
        let converter = Converter::new(&self.request.config, &self.identity);
        let mut converted = Vec::with_capacity(sources.len());
        for source in sources {
            let destination = output_path(&self.request.output_dir, &source);
            convert_file(&converter, &source, &destination)?;
            let file = ConvertedFile {
                source,
                destination,
            };
            on_converted(&file);
            converted.push(file);
        }
        Ok(converted)
    }
}

/// Convert the IMA file at `source` and write it to `destination`.
pub fn convert_file(converter: &Converter, source: &Path, destination: &Path) -> Result<(), Error> {
    let pixels = PixelBlock::read_file(source).map_err(|e| Error::PixelRead {
        path: source.to_path_buf(),
        source: e,
    })?;
    let encode_error = |e| Error::Encode {
        path: source.to_path_buf(),
        source: e,
    };
    let obj = converter.convert(pixels).map_err(encode_error)?;
    write_dicom(obj, destination).map_err(encode_error)?;
    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        "converted"
    );
    Ok(())
}

/// List the files in `dir` with the IMA extension, sorted by name.
pub fn list_ima_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let list_error = |source| Error::ListDirectory {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_error)? {
        let path = entry.map_err(list_error)?.path();
        if path.is_file() && has_ima_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_ima_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(IMA_EXTENSION))
}

/// Path of the DICOM file written for `source`: same base name, `.dcm` extension.
pub fn output_path(output_dir: &Path, source: &Path) -> PathBuf {
    let name = source.file_name().unwrap_or(source.as_os_str());
    output_dir.join(name).with_extension(DICOM_EXTENSION)
}
