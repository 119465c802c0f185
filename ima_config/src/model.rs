use compact_str::CompactString;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Descriptive DICOM attributes to write into every converted image.
///
/// Every field is independently optional: [None] means the attribute is
/// left out of the output, there is no fallback value. A key which is
/// missing from the configuration document and a key set to `null` are
/// the same thing.
///
/// Field names follow the DICOM keywords of the attributes they control.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ImaConfig {
    /// (0028,0010) Rows
    #[serde(default, deserialize_with = "strict_u16")]
    pub rows: Option<u16>,
    /// (0028,0011) Columns
    #[serde(default, deserialize_with = "strict_u16")]
    pub columns: Option<u16>,

    /// (0028,0002) Samples per Pixel
    #[serde(default, deserialize_with = "strict_u16")]
    pub samples_per_pixel: Option<u16>,
    /// (0028,0004) Photometric Interpretation, e.g. `MONOCHROME2`
    pub photometric_interpretation: Option<CompactString>,
    /// (0028,0100) Bits Allocated
    #[serde(default, deserialize_with = "strict_u16")]
    pub bits_allocated: Option<u16>,
    /// (0028,0101) Bits Stored
    #[serde(default, deserialize_with = "strict_u16")]
    pub bits_stored: Option<u16>,
    /// (0028,0102) High Bit
    #[serde(default, deserialize_with = "strict_u16")]
    pub high_bit: Option<u16>,
    /// (0028,0103) Pixel Representation: 0 is unsigned, 1 is two's complement.
    #[serde(default, deserialize_with = "strict_u16")]
    pub pixel_representation: Option<u16>,

    /// (0028,1053) Rescale Slope
    pub rescale_slope: Option<f64>,
    /// (0028,1052) Rescale Intercept
    pub rescale_intercept: Option<f64>,

    /// (0028,1050) Window Center
    pub window_center: Option<f64>,
    /// (0028,1051) Window Width
    pub window_width: Option<f64>,

    /// (0018,0050) Slice Thickness
    pub slice_thickness: Option<f64>,
    /// (0018,0088) Spacing Between Slices
    pub spacing_between_slices: Option<f64>,
    /// (0028,0030) Pixel Spacing as written in the configuration: `"row,col"`.
    ///
    /// The text is only split into numbers when an image is converted.
    pub pixel_spacing: Option<String>,

    /// (0008,0060) Modality, e.g. `CT`
    pub modality: Option<CompactString>,
}

/// Deserialize an optional US value, rejecting negative, fractional and
/// out of range numbers instead of truncating them.
fn strict_u16<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
    Ok(Option::<StrictU16>::deserialize(deserializer)?.map(|v| v.0))
}

struct StrictU16(u16);

impl<'de> Deserialize<'de> for StrictU16 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StrictU16Visitor)
    }
}

struct StrictU16Visitor;

impl Visitor<'_> for StrictU16Visitor {
    type Value = StrictU16;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer between 0 and 65535")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u16::try_from(v)
            .map(StrictU16)
            .map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        u16::try_from(v)
            .map(StrictU16)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }
}
