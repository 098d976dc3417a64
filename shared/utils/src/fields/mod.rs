//! Field Extraction Module
//!
//! Restructures a marker-delimited sheet into named fields. A row whose
//! first cell is wrapped in `**` opens a new field; the cells of every
//! following row are collected as that field's values until the next
//! marker row.

pub mod diagnostics;
pub mod extractor;
pub mod nomenclature;
pub mod parser;

pub use diagnostics::{Diagnostic, DiagnosticSink, NullSink, RecordingSink, TracingSink};
pub use extractor::{extract, extract_fields, marker_name, MARKER};
pub use nomenclature::compose_nomenclature;
pub use parser::{decode_rows, DecodeError, ParsedSheet, SheetParser};
