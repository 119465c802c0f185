//! Conversion of legacy CT scanner IMA images to DICOM.
//!
//! An IMA file is a 512×512 raster of 16-bit samples at the end of an
//! otherwise opaque file. For every IMA file of an input directory:
//!
//! 1. [PixelBlock] reads the raster and corrects its byte order
//! 2. [Converter] builds a DICOM data set from it, adding the attributes
//!    set in the [ImaConfig](ima_config::ImaConfig)
//! 3. [write_dicom] encodes the data set to a `.dcm` file
//!
//! All images of one run share the study and series UIDs of a
//! [ConversionIdentity]. [Batch] drives the loop and [Command] turns
//! command-line arguments into a [ConversionRequest].

mod args;
mod batch;
mod convert;
mod encode;
mod error;
mod genconf;
mod identity;
mod logging;
mod pixels;

pub use args::{ArgumentFormatError, Command, ConversionRequest, RawArgs, USAGE};
pub use batch::{Batch, ConvertedFile, IMA_EXTENSION, convert_file, list_ima_files, output_path};
pub use convert::{Converter, EncodeError, parse_pixel_spacing};
pub use encode::{DICOM_EXTENSION, write_dicom};
pub use error::{ConfigSource, Error};
pub use genconf::generate_config;
pub use identity::{ConversionIdentity, Uid};
pub use logging::init_logging;
pub use pixels::{
    IMA_HEIGHT, IMA_WIDTH, PIXEL_BLOCK_SIZE, PixelBlock, PixelReadError, swap_byte_order,
};
