use serde::{Deserialize, Serialize};

/// Output dimensions for generated barcodes, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for BarcodeConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
        }
    }
}

/// Which CSV column feeds the QR codes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSelectionConfig {
    pub selected_column: Option<String>,
    pub omit_header_row: bool,
    /// Mirrors the current parsed headers
    pub available_columns: Vec<String>,
}

impl ColumnSelectionConfig {
    pub fn with_selected(mut self, column: impl Into<String>) -> Self {
        self.selected_column = Some(column.into());
        self
    }

    pub fn has_selection(&self) -> bool {
        self.selected_column.is_some()
    }
}

/// Wizard stages, in the order the user walks through them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormStep {
    #[default]
    Upload,
    Preview,
    ColumnSelect,
    #[serde(alias = "dimensions")]
    Customization,
    Ready,
}

impl FormStep {
    pub const ALL: [FormStep; 5] = [
        FormStep::Upload,
        FormStep::Preview,
        FormStep::ColumnSelect,
        FormStep::Customization,
        FormStep::Ready,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormStep::Upload => "upload",
            FormStep::Preview => "preview",
            FormStep::ColumnSelect => "column-select",
            FormStep::Customization => "customization",
            FormStep::Ready => "ready",
        }
    }

    pub fn next(&self) -> Option<FormStep> {
        let idx = Self::ALL.iter().position(|s| s == self)?;
        Self::ALL.get(idx + 1).copied()
    }

    pub fn previous(&self) -> Option<FormStep> {
        let idx = Self::ALL.iter().position(|s| s == self)?;
        idx.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl std::fmt::Display for FormStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppMode {
    #[default]
    Form,
    QrDisplay,
}
