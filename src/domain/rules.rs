// ============================================================
// VALIDATION RULES
// ============================================================
// Thresholds shared by the file checks, column analyzer and QR validators

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::Validate;

pub const MIB: u64 = 1024 * 1024;

/// Every tunable bound used by the wizard validators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_ordered_bounds"))]
#[serde(default)]
pub struct ValidationRules {
    /// Largest accepted CSV upload in bytes (default: 5 MiB)
    #[validate(range(min = 1))]
    pub max_csv_file_bytes: u64,

    /// Barcode width/height bounds, inclusive (default: 50 - 500)
    #[validate(range(min = 1))]
    pub barcode_min_dimension: u32,
    pub barcode_max_dimension: u32,

    /// QR width/height bounds, inclusive (default: 100 - 1000)
    #[validate(range(min = 1))]
    pub qr_min_dimension: u32,
    pub qr_max_dimension: u32,

    /// Embedded image size as a ratio of the QR size (default: 0.1 - 0.5)
    #[validate(range(min = 0.0, max = 1.0))]
    pub image_size_min: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub image_size_max: f64,

    /// Largest margin around the embedded image, in pixels (default: 50)
    #[validate(range(min = 0))]
    pub image_margin_max: i32,

    /// Embedded image pixel bounds per side (default: 50 - 2000)
    #[validate(range(min = 1))]
    pub image_min_pixels: u32,
    pub image_max_pixels: u32,

    /// Largest embedded image file in bytes (default: 5 MiB)
    #[validate(range(min = 1))]
    pub max_image_file_bytes: u64,

    /// Image-to-QR ratio above which readability suffers (default: 0.3)
    #[validate(range(min = 0.0, max = 1.0))]
    pub readability_max_ratio: f64,

    /// Non-empty values inspected when inferring a column type (default: 20)
    #[validate(range(min = 1))]
    pub type_detection_sample: usize,

    /// Share of sampled values that must match a pattern (default: 0.8)
    #[validate(range(min = 0.0, max = 1.0))]
    pub type_match_threshold: f64,

    /// Sample values kept per column (default: 5)
    pub sample_value_count: usize,

    /// Longest QR payload after sanitizing, in characters (default: 2000)
    #[validate(range(min = 1))]
    pub max_qr_data_length: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_csv_file_bytes: 5 * MIB,
            barcode_min_dimension: 50,
            barcode_max_dimension: 500,
            qr_min_dimension: 100,
            qr_max_dimension: 1000,
            image_size_min: 0.1,
            image_size_max: 0.5,
            image_margin_max: 50,
            image_min_pixels: 50,
            image_max_pixels: 2000,
            max_image_file_bytes: 5 * MIB,
            readability_max_ratio: 0.3,
            type_detection_sample: 20,
            type_match_threshold: 0.8,
            sample_value_count: 5,
            max_qr_data_length: 2000,
        }
    }
}

impl ValidationRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size limit rendered the way user-facing messages show it
    pub fn max_csv_file_megabytes(&self) -> f64 {
        megabytes(self.max_csv_file_bytes)
    }

    pub fn max_image_file_megabytes(&self) -> f64 {
        megabytes(self.max_image_file_bytes)
    }
}

/// Byte count in MiB; `Display` drops a zero fraction, so 5 MiB prints as `5`
pub fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / MIB as f64
}

fn validate_ordered_bounds(rules: &ValidationRules) -> Result<(), validator::ValidationError> {
    let pairs = [
        (
            "barcode dimension",
            f64::from(rules.barcode_min_dimension),
            f64::from(rules.barcode_max_dimension),
        ),
        (
            "qr dimension",
            f64::from(rules.qr_min_dimension),
            f64::from(rules.qr_max_dimension),
        ),
        ("image size", rules.image_size_min, rules.image_size_max),
        (
            "image pixels",
            f64::from(rules.image_min_pixels),
            f64::from(rules.image_max_pixels),
        ),
    ];

    for (name, min, max) in pairs {
        if min > max {
            let mut err = validator::ValidationError::new("ordered_bounds");
            err.message = Some(Cow::Owned(format!(
                "{} minimum ({}) exceeds maximum ({})",
                name, min, max
            )));
            return Err(err);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ValidationRules::default().validate().is_ok());
        assert_eq!(ValidationRules::default().max_csv_file_megabytes(), 5.0);
    }

    #[test]
    fn test_megabytes_keep_fractions() {
        assert_eq!(megabytes(5 * MIB).to_string(), "5");
        assert_eq!(megabytes(MIB / 2).to_string(), "0.5");
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let rules = ValidationRules {
            barcode_min_dimension: 600,
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_ratio_out_of_range_rejected() {
        let rules = ValidationRules {
            type_match_threshold: 1.5,
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }
}
