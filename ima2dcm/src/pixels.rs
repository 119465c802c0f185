//! Reading the raw pixel block of an IMA file.
//!
//! IMA files carry an undocumented header followed by a fixed-size raster of
//! 16-bit samples which always sits at the very end of the file. Nothing in
//! the header is interpreted: the raster is located by counting back from the
//! end.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Width of the IMA raster in pixels.
pub const IMA_WIDTH: usize = 512;
/// Height of the IMA raster in pixels.
pub const IMA_HEIGHT: usize = 512;
/// Size of the trailing pixel block in bytes.
pub const PIXEL_BLOCK_SIZE: usize = IMA_WIDTH * IMA_HEIGHT * 2;

/// Failure to read the pixel block of an IMA file.
#[derive(thiserror::Error, Debug)]
pub enum PixelReadError {
    #[error("file is {len} bytes, too short for a pixel block of {} bytes", PIXEL_BLOCK_SIZE)]
    TooShort { len: u64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The 16-bit samples of one IMA image, in little-endian byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBlock(Vec<u8>);

impl PixelBlock {
    /// Read the pixel block at the end of the file at `path`.
    pub fn read_file(path: &Path) -> Result<Self, PixelReadError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    /// Read the last [PIXEL_BLOCK_SIZE] bytes of `reader` and correct their byte order.
    ///
    /// Fails if the source is shorter than a pixel block; the result is
    /// never padded.
    pub fn read_from<R: Read + Seek>(mut reader: R) -> Result<Self, PixelReadError> {
        let len = reader.seek(SeekFrom::End(0))?;
        if len < PIXEL_BLOCK_SIZE as u64 {
            return Err(PixelReadError::TooShort { len });
        }
        reader.seek(SeekFrom::Start(len - PIXEL_BLOCK_SIZE as u64))?;
        let mut data = vec![0u8; PIXEL_BLOCK_SIZE];
        reader.read_exact(&mut data)?;
        swap_byte_order(&mut data);
        Ok(Self(data))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Swap the two bytes of every 16-bit sample in place.
///
/// IMA samples are stored big-endian and there is no marker to say
/// otherwise, so the swap is always applied. A trailing odd byte is left
/// untouched.
pub fn swap_byte_order(data: &mut [u8]) {
    data.chunks_exact_mut(2).for_each(|sample| sample.swap(0, 1));
}
