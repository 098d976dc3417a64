//! Nomenclature request models.
//!
//! A nomenclature is built by picking at most one value per field and
//! joining the picks with a separator.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One field with the value picked for it, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSelection {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl FieldSelection {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            value: value.map(str::to_string),
        }
    }

    /// The picked value, if both the field name and the value are non-blank.
    pub fn picked_value(&self) -> Option<&str> {
        if self.name.trim().is_empty() {
            return None;
        }
        self.value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct NomenclatureRequest {
    #[validate(length(max = 256, message = "At most 256 selections are allowed"))]
    pub selections: Vec<FieldSelection>,
    #[validate(length(max = 16, message = "Separator must be at most 16 characters"))]
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    "-".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NomenclatureResponse {
    pub nomenclature: String,
}
