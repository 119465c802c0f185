use uuid::Uuid;

/// A DICOM unique identifier (UI value representation).
///
/// Ref: <https://dicom.nema.org/medical/dicom/current/output/chtml/part05/chapter_9.html>
#[nutype::nutype(
    validate(predicate = is_valid_uid),
    derive(Clone, Debug, Display, Eq, PartialEq, Hash, AsRef)
)]
pub struct Uid(String);

fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty()
        && uid.len() <= 64
        && uid.split('.').all(|component| {
            !component.is_empty()
                && component.chars().all(|c| c.is_ascii_digit())
                && (component == "0" || !component.starts_with('0'))
        })
}

impl Uid {
    /// Generate a new UID under the `2.25` root, derived from a random UUID.
    ///
    /// Ref: <https://dicom.nema.org/medical/dicom/current/output/chtml/part05/sect_B.2.html>
    pub fn generate() -> Self {
        let uid = format!("2.25.{}", Uuid::new_v4().as_u128());
        // a u128 has at most 39 decimal digits, so the UID is always valid
        Self::try_new(uid).unwrap_or_else(|_| unreachable!())
    }

    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

/// Study and series UIDs shared by every image converted in one run.
///
/// One input directory becomes one study with one series. Create this
/// once per run and lend it to every conversion: the UIDs must never be
/// regenerated between files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionIdentity {
    pub study_instance_uid: Uid,
    pub series_instance_uid: Uid,
}

impl ConversionIdentity {
    pub fn generate() -> Self {
        Self {
            study_instance_uid: Uid::generate(),
            series_instance_uid: Uid::generate(),
        }
    }
}
