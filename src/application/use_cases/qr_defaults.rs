//! Default QR styling, presets, and the option catalogues shown in the
//! customization step.

use serde::Serialize;

use crate::domain::qr::{QrStylingConfig, StyleOptions};

/// One selectable value of an enumerated style field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleOption {
    pub value: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

const fn option(value: &'static str, label: &'static str, description: &'static str) -> StyleOption {
    StyleOption {
        value,
        label,
        description,
    }
}

pub const DOT_TYPE_OPTIONS: [StyleOption; 6] = [
    option("square", "Square", "Classic square dots"),
    option("rounded", "Rounded", "Rounded square dots"),
    option("dots", "Dots", "Circular dots"),
    option("classy", "Classy", "Stylized squares"),
    option("classy-rounded", "Classy Rounded", "Stylized rounded squares"),
    option("extra-rounded", "Extra Rounded", "Very rounded squares"),
];

pub const CORNER_SQUARE_TYPE_OPTIONS: [StyleOption; 3] = [
    option("square", "Square", "Square corners"),
    option("extra-rounded", "Rounded", "Rounded corners"),
    option("dot", "Dot", "Circular corners"),
];

pub const CORNER_DOT_TYPE_OPTIONS: [StyleOption; 2] = [
    option("square", "Square", "Square corner dots"),
    option("dot", "Dot", "Circular corner dots"),
];

pub const ERROR_CORRECTION_LEVELS: [StyleOption; 4] = [
    option("L", "Low (7%)", "Recovers 7% of data"),
    option("M", "Medium (15%)", "Recovers 15% of data"),
    option("Q", "Quartile (25%)", "Recovers 25% of data"),
    option("H", "High (30%)", "Recovers 30% of data"),
];

/// Whether `value` is one of the catalogue's values
pub fn is_option(options: &[StyleOption], value: &str) -> bool {
    options.iter().any(|o| o.value == value)
}

/// Styling applied before the user customizes anything
pub fn default_qr_config() -> QrStylingConfig {
    QrStylingConfig::default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QrPreset {
    Classic,
    Modern,
    Colorful,
    Minimal,
}

impl QrPreset {
    pub const ALL: [QrPreset; 4] = [
        QrPreset::Classic,
        QrPreset::Modern,
        QrPreset::Colorful,
        QrPreset::Minimal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            QrPreset::Classic => "classic",
            QrPreset::Modern => "modern",
            QrPreset::Colorful => "colorful",
            QrPreset::Minimal => "minimal",
        }
    }

    pub fn config(&self) -> QrStylingConfig {
        let base = default_qr_config();
        match self {
            QrPreset::Classic => base,
            QrPreset::Modern => QrStylingConfig {
                dots_options: StyleOptions::new("#1a1a1a", "rounded"),
                corners_square_options: StyleOptions::new("#1a1a1a", "extra-rounded"),
                ..base
            },
            QrPreset::Colorful => QrStylingConfig {
                dots_options: StyleOptions::new("#3b82f6", "classy"),
                corners_square_options: StyleOptions::new("#ef4444", "extra-rounded"),
                ..base
            },
            QrPreset::Minimal => QrStylingConfig {
                dots_options: StyleOptions::new("#374151", "dots"),
                corners_square_options: StyleOptions::new("#374151", "dot"),
                corners_dot_options: StyleOptions::new("#374151", "dot"),
                ..base
            },
        }
    }
}
