//! Building the DICOM data set of one converted image.

use crate::identity::{ConversionIdentity, Uid};
use crate::pixels::PixelBlock;
use dicom::core::value::C;
use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::dictionary_std::{tags, uids};
use dicom::object::InMemDicomObject;
use ima_config::ImaConfig;

/// An attribute value which cannot be encoded.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EncodeError {
    #[error("PixelSpacing must be two numbers written as \"row,col\", got {0:?}")]
    MalformedPixelSpacing(String),
    #[error("{tag} must be a finite number, got {value}")]
    NonFiniteDecimal { tag: Tag, value: f64 },
    #[error("cannot create DICOM file meta information: {0}")]
    FileMeta(String),
    #[error("cannot write DICOM file: {0}")]
    Write(String),
}

/// Converts IMA pixel blocks into DICOM data sets.
///
/// The configuration and [ConversionIdentity] are borrowed for the whole
/// batch, so every image converted by the same [Converter] belongs to the
/// same study and series.
pub struct Converter<'a> {
    config: &'a ImaConfig,
    identity: &'a ConversionIdentity,
}

impl<'a> Converter<'a> {
    pub fn new(config: &'a ImaConfig, identity: &'a ConversionIdentity) -> Self {
        Self { config, identity }
    }

    /// Create the data set of a CT image with a new SOP instance UID.
    ///
    /// Always present: SOPClassUID, SOPInstanceUID, StudyInstanceUID,
    /// SeriesInstanceUID and PixelData. Everything else is written only if
    /// it is set in the configuration. Configured geometry is not checked
    /// against the pixel block.
    pub fn convert(&self, pixels: PixelBlock) -> Result<InMemDicomObject, EncodeError> {
        let mut obj = InMemDicomObject::new_empty();
        put_uid(&mut obj, tags::SOP_CLASS_UID, uids::CT_IMAGE_STORAGE);
        put_uid(&mut obj, tags::SOP_INSTANCE_UID, Uid::generate().as_str());
        put_uid(
            &mut obj,
            tags::STUDY_INSTANCE_UID,
            self.identity.study_instance_uid.as_str(),
        );
        put_uid(
            &mut obj,
            tags::SERIES_INSTANCE_UID,
            self.identity.series_instance_uid.as_str(),
        );
        self.put_configured(&mut obj)?;
        obj.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OW,
            PrimitiveValue::U8(C::from_vec(pixels.into_bytes())),
        ));
        Ok(obj)
    }

    fn put_configured(&self, obj: &mut InMemDicomObject) -> Result<(), EncodeError> {
        let c = self.config;
        put_us(obj, tags::ROWS, c.rows);
        put_us(obj, tags::COLUMNS, c.columns);

        put_us(obj, tags::SAMPLES_PER_PIXEL, c.samples_per_pixel);
        put_cs(
            obj,
            tags::PHOTOMETRIC_INTERPRETATION,
            c.photometric_interpretation.as_deref(),
        );
        put_us(obj, tags::BITS_ALLOCATED, c.bits_allocated);
        put_us(obj, tags::BITS_STORED, c.bits_stored);
        put_us(obj, tags::HIGH_BIT, c.high_bit);
        put_us(obj, tags::PIXEL_REPRESENTATION, c.pixel_representation);

        put_ds(obj, tags::RESCALE_SLOPE, c.rescale_slope)?;
        put_ds(obj, tags::RESCALE_INTERCEPT, c.rescale_intercept)?;

        put_ds(obj, tags::WINDOW_CENTER, c.window_center)?;
        put_ds(obj, tags::WINDOW_WIDTH, c.window_width)?;

        put_ds(obj, tags::SLICE_THICKNESS, c.slice_thickness)?;
        put_ds(obj, tags::SPACING_BETWEEN_SLICES, c.spacing_between_slices)?;
        if let Some(text) = &c.pixel_spacing {
            let (row, col) = parse_pixel_spacing(text)?;
            let values = [
                format_decimal_string(tags::PIXEL_SPACING, row)?,
                format_decimal_string(tags::PIXEL_SPACING, col)?,
            ];
            obj.put(DataElement::new(
                tags::PIXEL_SPACING,
                VR::DS,
                PrimitiveValue::Strs(values.into_iter().collect()),
            ));
        }

        put_cs(obj, tags::MODALITY, c.modality.as_deref());
        Ok(())
    }
}

/// Parse pixel spacing written as `"row,col"`, e.g. `"0.488,0.488"`.
pub fn parse_pixel_spacing(text: &str) -> Result<(f64, f64), EncodeError> {
    let malformed = || EncodeError::MalformedPixelSpacing(text.to_string());
    let mut parts = text.split(',').map(|s| s.trim().parse::<f64>());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(row)), Some(Ok(col)), None) if row.is_finite() && col.is_finite() => {
            Ok((row, col))
        }
        _ => Err(malformed()),
    }
}

fn put_uid(obj: &mut InMemDicomObject, tag: Tag, uid: &str) {
    obj.put(DataElement::new(tag, VR::UI, PrimitiveValue::from(uid)));
}

fn put_us(obj: &mut InMemDicomObject, tag: Tag, value: Option<u16>) {
    if let Some(value) = value {
        obj.put(DataElement::new(tag, VR::US, PrimitiveValue::from(value)));
    }
}

fn put_ds(obj: &mut InMemDicomObject, tag: Tag, value: Option<f64>) -> Result<(), EncodeError> {
    if let Some(value) = value {
        let text = format_decimal_string(tag, value)?;
        obj.put(DataElement::new(tag, VR::DS, PrimitiveValue::from(text)));
    }
    Ok(())
}

/// Longest text allowed in one DS (decimal string) value.
const DS_MAX_LEN: usize = 16;

/// Write a number as a DS value of at most 16 characters.
///
/// The shortest round-trip form is used when it fits. Otherwise the fixed
/// or exponent form closest to `value` which fits is used.
///
/// Ref: <https://dicom.nema.org/medical/dicom/current/output/chtml/part05/sect_6.2.html>
fn format_decimal_string(tag: Tag, value: f64) -> Result<String, EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::NonFiniteDecimal { tag, value });
    }
    let shortest = value.to_string();
    if shortest.len() <= DS_MAX_LEN {
        return Ok(shortest);
    }
    let fixed = (0..DS_MAX_LEN).map(|p| format!("{value:.p$}"));
    let exponent = (0..DS_MAX_LEN).map(|p| format!("{value:.p$e}"));
    fixed
        .chain(exponent)
        .filter(|text| text.len() <= DS_MAX_LEN)
        .filter_map(|text| {
            let parsed = text.parse::<f64>().ok().filter(|v| v.is_finite())?;
            Some(((parsed - value).abs(), text))
        })
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, text)| text)
        .ok_or(EncodeError::NonFiniteDecimal { tag, value })
}

fn put_cs(obj: &mut InMemDicomObject, tag: Tag, value: Option<&str>) {
    if let Some(value) = value {
        obj.put(DataElement::new(tag, VR::CS, PrimitiveValue::from(value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::PIXEL_BLOCK_SIZE;
    use compact_str::CompactString;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const FIXED_TAGS: [Tag; 5] = [
        tags::SOP_CLASS_UID,
        tags::SOP_INSTANCE_UID,
        tags::STUDY_INSTANCE_UID,
        tags::SERIES_INSTANCE_UID,
        tags::PIXEL_DATA,
    ];

    fn zeroes() -> PixelBlock {
        PixelBlock::read_from(std::io::Cursor::new(vec![0u8; PIXEL_BLOCK_SIZE])).unwrap()
    }

    fn text(obj: &InMemDicomObject, tag: Tag) -> String {
        obj.element(tag)
            .unwrap()
            .to_str()
            .unwrap()
            .trim_end_matches(['\0', ' '])
            .to_string()
    }

    #[test]
    fn test_empty_config_has_only_fixed_attributes() {
        let config = ImaConfig::default();
        let identity = ConversionIdentity::generate();
        let obj = Converter::new(&config, &identity).convert(zeroes()).unwrap();
        let mut actual: Vec<Tag> = obj.iter().map(|e| e.header().tag).collect();
        actual.sort();
        let mut expected = FIXED_TAGS.to_vec();
        expected.sort();
        assert_eq!(actual, expected);
        assert_eq!(text(&obj, tags::SOP_CLASS_UID), uids::CT_IMAGE_STORAGE);
    }

    #[test]
    fn test_rows_and_columns_only() {
        let config = ImaConfig {
            rows: Some(512),
            columns: Some(512),
            ..Default::default()
        };
        let identity = ConversionIdentity::generate();
        let obj = Converter::new(&config, &identity).convert(zeroes()).unwrap();
        assert_eq!(obj.element(tags::ROWS).unwrap().to_int::<u16>().unwrap(), 512);
        assert_eq!(obj.element(tags::COLUMNS).unwrap().to_int::<u16>().unwrap(), 512);
        assert!(obj.element(tags::MODALITY).is_err());
        let pixel_data = obj.element(tags::PIXEL_DATA).unwrap().to_bytes().unwrap();
        assert_eq!(pixel_data.as_ref(), vec![0u8; PIXEL_BLOCK_SIZE].as_slice());
    }

    #[test]
    fn test_every_configured_attribute() {
        let config = ImaConfig {
            rows: Some(512),
            columns: Some(256),
            samples_per_pixel: Some(1),
            photometric_interpretation: Some(CompactString::new("MONOCHROME2")),
            bits_allocated: Some(16),
            bits_stored: Some(12),
            high_bit: Some(11),
            pixel_representation: Some(1),
            rescale_slope: Some(1.0),
            rescale_intercept: Some(-1024.0),
            window_center: Some(40.0),
            window_width: Some(400.0),
            slice_thickness: Some(5.0),
            spacing_between_slices: Some(2.5),
            pixel_spacing: Some("0.488, 0.5".to_string()),
            modality: Some(CompactString::new("CT")),
        };
        let identity = ConversionIdentity::generate();
        let obj = Converter::new(&config, &identity).convert(zeroes()).unwrap();

        let us = |tag| obj.element(tag).unwrap().to_int::<u16>().unwrap();
        assert_eq!(us(tags::COLUMNS), 256);
        assert_eq!(us(tags::SAMPLES_PER_PIXEL), 1);
        assert_eq!(us(tags::BITS_ALLOCATED), 16);
        assert_eq!(us(tags::BITS_STORED), 12);
        assert_eq!(us(tags::HIGH_BIT), 11);
        assert_eq!(us(tags::PIXEL_REPRESENTATION), 1);

        let ds = |tag| obj.element(tag).unwrap().to_float64().unwrap();
        assert_eq!(ds(tags::RESCALE_SLOPE), 1.0);
        assert_eq!(ds(tags::RESCALE_INTERCEPT), -1024.0);
        assert_eq!(ds(tags::WINDOW_CENTER), 40.0);
        assert_eq!(ds(tags::WINDOW_WIDTH), 400.0);
        assert_eq!(ds(tags::SLICE_THICKNESS), 5.0);
        assert_eq!(ds(tags::SPACING_BETWEEN_SLICES), 2.5);

        let spacing = obj
            .element(tags::PIXEL_SPACING)
            .unwrap()
            .to_multi_float64()
            .unwrap();
        assert_eq!(spacing, vec![0.488, 0.5]);

        assert_eq!(text(&obj, tags::PHOTOMETRIC_INTERPRETATION), "MONOCHROME2");
        assert_eq!(text(&obj, tags::MODALITY), "CT");
        assert_eq!(obj.iter().count(), FIXED_TAGS.len() + 16);
    }

    #[test]
    fn test_shared_study_and_series() {
        let config = ImaConfig::default();
        let identity = ConversionIdentity::generate();
        let converter = Converter::new(&config, &identity);
        let first = converter.convert(zeroes()).unwrap();
        let second = converter.convert(zeroes()).unwrap();

        for tag in [tags::STUDY_INSTANCE_UID, tags::SERIES_INSTANCE_UID] {
            assert_eq!(text(&first, tag), text(&second, tag));
        }
        assert_eq!(
            text(&first, tags::STUDY_INSTANCE_UID),
            identity.study_instance_uid.as_str()
        );
        assert_ne!(
            text(&first, tags::SOP_INSTANCE_UID),
            text(&second, tags::SOP_INSTANCE_UID)
        );
    }

    #[test]
    fn test_malformed_pixel_spacing() {
        let config = ImaConfig {
            pixel_spacing: Some("0.488".to_string()),
            ..Default::default()
        };
        let identity = ConversionIdentity::generate();
        let actual = Converter::new(&config, &identity).convert(zeroes());
        assert_eq!(
            actual.unwrap_err(),
            EncodeError::MalformedPixelSpacing("0.488".to_string())
        );
    }

    #[rstest]
    #[case(0.488, "0.488")]
    #[case(-1024.0, "-1024")]
    #[case(1.23456789012345678, "1.23456789012346")]
    #[case(-1234567.891234567, "-1234567.8912346")]
    #[case(1e20, "1e20")]
    #[case(1e-20, "1e-20")]
    #[case(123456789012345678.0, "1.23456789012e17")]
    fn test_decimal_string_fits(#[case] value: f64, #[case] expected: &str) {
        let actual = format_decimal_string(tags::RESCALE_SLOPE, value).unwrap();
        assert!(actual.len() <= DS_MAX_LEN);
        assert_eq!(actual, expected)
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_non_finite_decimal_is_error(#[case] value: f64) {
        let config = ImaConfig {
            window_center: Some(value),
            ..Default::default()
        };
        let identity = ConversionIdentity::generate();
        let actual = Converter::new(&config, &identity).convert(zeroes());
        assert!(
            matches!(
                actual,
                Err(EncodeError::NonFiniteDecimal { tag, .. }) if tag == tags::WINDOW_CENTER
            ),
            "{actual:?}"
        )
    }

    #[test]
    fn test_long_decimals_are_shortened() {
        let config = ImaConfig {
            rescale_slope: Some(1.23456789012345678),
            window_width: Some(1e20),
            pixel_spacing: Some("0.48828125000000001,123456.789012345678".to_string()),
            ..Default::default()
        };
        let identity = ConversionIdentity::generate();
        let obj = Converter::new(&config, &identity).convert(zeroes()).unwrap();
        for tag in [tags::RESCALE_SLOPE, tags::WINDOW_WIDTH, tags::PIXEL_SPACING] {
            for value in text(&obj, tag).split('\\') {
                assert!(value.len() <= DS_MAX_LEN, "{tag} = {value:?}");
            }
        }
        let ds = |tag| obj.element(tag).unwrap().to_float64().unwrap();
        assert_eq!(ds(tags::WINDOW_WIDTH), 1e20);
        assert!((ds(tags::RESCALE_SLOPE) - 1.23456789012345678).abs() < 1e-13);
    }

    #[rstest]
    #[case("0.488,0.488", (0.488, 0.488))]
    #[case("1,2", (1.0, 2.0))]
    #[case(" 0.7 , 0.9 ", (0.7, 0.9))]
    fn test_parse_pixel_spacing(#[case] input: &str, #[case] expected: (f64, f64)) {
        assert_eq!(parse_pixel_spacing(input), Ok(expected))
    }

    #[rstest]
    #[case("")]
    #[case("0.488")]
    #[case("0.488,")]
    #[case("0.488,0.488,1")]
    #[case("a,b")]
    #[case("0.488\\0.488")]
    #[case("NaN,1")]
    fn test_parse_pixel_spacing_invalid(#[case] input: &str) {
        assert!(parse_pixel_spacing(input).is_err())
    }
}
