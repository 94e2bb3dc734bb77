// ============================================================
// QR STYLING TYPES
// ============================================================
// Styling parameters handed to the QR renderer, plus the wizard's
// customization state around them.
//
// Enumerated style fields stay plain strings so that values typed by the
// user can be held and then rejected by the validators.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOptions {
    pub color: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl StyleOptions {
    pub fn new(color: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    pub hide_background_dots: bool,
    /// Image size as a ratio of the QR size
    pub image_size: f64,
    /// Margin around the image in pixels
    pub margin: i32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            hide_background_dots: true,
            image_size: 0.2,
            margin: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrOptions {
    /// 0 lets the renderer pick the smallest version that fits
    pub type_number: u8,
    pub mode: String,
    pub error_correction_level: String,
}

/// Full styling configuration for one QR code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrStylingConfig {
    pub width: u32,
    pub height: u32,
    pub data: String,
    /// Embedded image: a `data:image/...;base64,` URI or an http(s) URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub dots_options: StyleOptions,
    pub corners_square_options: StyleOptions,
    pub corners_dot_options: StyleOptions,
    pub background_options: BackgroundOptions,
    #[serde(default)]
    pub image_options: ImageOptions,
    pub qr_options: QrOptions,
}

impl Default for QrStylingConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            data: String::new(),
            image: None,
            dots_options: StyleOptions::new("#000000", "square"),
            corners_square_options: StyleOptions::new("#000000", "square"),
            corners_dot_options: StyleOptions::new("#000000", "square"),
            background_options: BackgroundOptions {
                color: "#ffffff".to_string(),
            },
            image_options: ImageOptions::default(),
            qr_options: QrOptions {
                type_number: 0,
                mode: "Byte".to_string(),
                error_correction_level: "M".to_string(),
            },
        }
    }
}

impl QrStylingConfig {
    /// Side length used for readability checks
    pub fn qr_size(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// Outcome of validating a styling configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl QrValidation {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Styling config together with preview and validity bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCustomizationState {
    pub config: QrStylingConfig,
    pub preview_data: String,
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl Default for QrCustomizationState {
    fn default() -> Self {
        Self {
            config: QrStylingConfig::default(),
            preview_data: String::new(),
            is_valid: false,
            errors: Vec::new(),
        }
    }
}

/// Partial update for [`QrCustomizationState`]; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCustomizationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<QrStylingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl QrCustomizationUpdate {
    pub fn config(config: QrStylingConfig) -> Self {
        Self {
            config: Some(config),
            ..Default::default()
        }
    }

    pub fn preview(preview_data: impl Into<String>) -> Self {
        Self {
            preview_data: Some(preview_data.into()),
            ..Default::default()
        }
    }

    pub fn validation(validation: QrValidation) -> Self {
        Self {
            is_valid: Some(validation.is_valid),
            errors: Some(validation.errors),
            ..Default::default()
        }
    }

    /// Whether this update carries validity information
    pub fn touches_validation(&self) -> bool {
        self.is_valid.is_some() || self.errors.is_some()
    }

    pub fn apply_to(self, state: &mut QrCustomizationState) {
        if let Some(config) = self.config {
            state.config = config;
        }
        if let Some(preview_data) = self.preview_data {
            state.preview_data = preview_data;
        }
        if let Some(is_valid) = self.is_valid {
            state.is_valid = is_valid;
        }
        if let Some(errors) = self.errors {
            state.errors = errors;
        }
    }
}
