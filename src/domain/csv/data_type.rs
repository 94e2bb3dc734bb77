// ============================================================
// COLUMN DATA TYPE ENUM
// ============================================================
// Inferred kind of values held in a CSV column

use serde::{Deserialize, Serialize};

/// Data type inferred from a column's non-empty values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Free text, or a column with no non-empty values
    Text,

    /// Integers or decimals
    Number,

    /// `local@domain.tld` addresses
    Email,

    /// `http://` or `https://` links
    Url,

    /// Some values matched a typed pattern, but none reached the threshold
    Mixed,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Number => "number",
            DataType::Email => "email",
            DataType::Url => "url",
            DataType::Mixed => "mixed",
        }
    }

    /// Hint shown next to a column when picking QR content
    pub fn description(&self) -> &'static str {
        match self {
            DataType::Text => "Plain text values",
            DataType::Number => "Numeric values",
            DataType::Email => "Email addresses",
            DataType::Url => "Web links",
            DataType::Mixed => "A mix of numbers, emails, links and text",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
