//! Configuration of the DICOM attributes written by the IMA converter.

mod loader;
mod model;

pub use crate::loader::*;
pub use crate::model::*;
