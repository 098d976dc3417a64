//! # Fieldmark Domain Models
//!
//! Core data types shared by the field extraction library and the upload
//! service.
//!
//! ## Key Models
//!
//! - **Field**: a named group of values collected from a marker-delimited sheet
//! - **FieldSelection**: a field with the single value a user picked for it
//! - **NomenclatureRequest**: a list of selections joined into one name
//!
//! All models serialize with serde; request models validate with the
//! validator crate.

pub mod field;
pub mod nomenclature;


pub use field::*;
pub use nomenclature::*;
