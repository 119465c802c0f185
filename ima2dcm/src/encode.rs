use crate::convert::EncodeError;
use dicom::dictionary_std::uids;
use dicom::object::{FileDicomObject, FileMetaTableBuilder, InMemDicomObject};
use std::path::Path;

/// File name extension of converted images.
pub const DICOM_EXTENSION: &str = "dcm";

/// Wrap a data set in a DICOM file with Explicit VR Little Endian transfer syntax.
///
/// The media storage SOP class and instance UIDs of the file meta group
/// are taken from the data set.
fn to_file_object(
    obj: InMemDicomObject,
) -> Result<FileDicomObject<InMemDicomObject>, EncodeError> {
    let meta = FileMetaTableBuilder::new().transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN);
    obj.with_meta(meta)
        .map_err(|e| EncodeError::FileMeta(e.to_string()))
}

/// Encode a data set and write it to `path`, replacing any existing file.
pub fn write_dicom(obj: InMemDicomObject, path: &Path) -> Result<(), EncodeError> {
    to_file_object(obj)?
        .write_to_file(path)
        .map_err(|e| EncodeError::Write(e.to_string()))
}
