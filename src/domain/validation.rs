use serde::{Deserialize, Serialize};

/// Field names used to tag validation errors.
pub mod fields {
    pub const FILE: &str = "file";
    pub const CSV: &str = "csv";
    pub const SELECTED_COLUMN: &str = "selectedColumn";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const QR: &str = "qr";
}

/// A single validation failure, tagged with the field it belongs to.
///
/// Errors are not unique: every validation pass appends its own, and
/// consumers filter by `field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_for(&self, field: &str) -> bool {
        self.field == field
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
