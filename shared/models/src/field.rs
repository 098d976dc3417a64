//! Field domain model.
//!
//! A field is a named group of values collected from a marker-delimited
//! sheet: a `**Name**` row opens the field and every following row
//! contributes values until the next marker row.

use serde::{Deserialize, Serialize};

/// A named field together with the values collected for it, in the order
/// they were encountered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Field {
    pub name: String,
    pub values: Vec<String>,
}

impl Field {
    /// Create an empty field with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Build a field with a fixed set of values.
    pub fn with_values<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }
}
