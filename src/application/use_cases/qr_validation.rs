//! QR styling validator
//!
//! Checks dimensions, colors, image options and the enumerated style fields.
//! Every check runs independently and appends its own message.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::csv::UploadedFile;
use crate::domain::qr::{QrStylingConfig, QrValidation};
use crate::domain::rules::ValidationRules;

use super::qr_defaults::{
    is_option, CORNER_DOT_TYPE_OPTIONS, CORNER_SQUARE_TYPE_OPTIONS, DOT_TYPE_OPTIONS,
    ERROR_CORRECTION_LEVELS,
};

static HEX_COLOR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap());

static RGB_COLOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^rgba?\(\s*\d+\s*,\s*\d+\s*,\s*\d+\s*(,\s*[\d.]+)?\s*\)$").unwrap()
});

static IMAGE_DATA_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^data:image/(png|jpeg|jpg|gif|svg\+xml|webp);base64,").unwrap()
});

/// CSS color names accepted besides hex and rgb(a)
pub const CSS_COLOR_NAMES: [&str; 9] = [
    "transparent",
    "white",
    "black",
    "red",
    "green",
    "blue",
    "yellow",
    "cyan",
    "magenta",
];

/// MIME types accepted for embedded image files
pub const ALLOWED_IMAGE_MIME_TYPES: [&str; 6] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/svg+xml",
    "image/webp",
];

/// Hex (`#rgb`/`#rrggbb`), an allowed CSS name, or `rgb(...)`/`rgba(...)`
pub fn is_valid_color(color: &str) -> bool {
    HEX_COLOR_PATTERN.is_match(color)
        || CSS_COLOR_NAMES.contains(&color.to_lowercase().as_str())
        || RGB_COLOR_PATTERN.is_match(color)
}

/// Strip control characters and cap the payload length
pub fn sanitize_qr_data(data: &str, max_len: usize) -> String {
    data.trim()
        .chars()
        .filter(|c| !matches!(*c, '\u{0}'..='\u{1F}' | '\u{7F}'))
        .take(max_len)
        .collect()
}

/// Validate an embedded image reference; empty means no image
pub fn validate_image_url(image_url: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if image_url.trim().is_empty() {
        return errors;
    }

    if image_url.starts_with("data:") {
        if !IMAGE_DATA_URL_PATTERN.is_match(image_url) {
            errors.push("Invalid image data format".to_string());
        }
    } else {
        match url::Url::parse(image_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(_) => errors.push("Image URL must use HTTP or HTTPS protocol".to_string()),
            Err(_) => errors.push("Invalid image URL format".to_string()),
        }
    }

    errors
}

/// Validator for QR styling configuration
pub struct QrConfigValidator {
    rules: ValidationRules,
}

impl QrConfigValidator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn validate(&self, config: &QrStylingConfig) -> QrValidation {
        let rules = &self.rules;
        let mut errors = Vec::new();

        // Size
        if !self.qr_dimension_in_range(config.width) {
            errors.push(format!(
                "Width must be between {} and {}",
                rules.qr_min_dimension, rules.qr_max_dimension
            ));
        }
        if !self.qr_dimension_in_range(config.height) {
            errors.push(format!(
                "Height must be between {} and {}",
                rules.qr_min_dimension, rules.qr_max_dimension
            ));
        }

        // Colors
        if !is_valid_color(&config.dots_options.color) {
            errors.push("Invalid dot color format. Use hex colors like #000000".to_string());
        }
        if !is_valid_color(&config.corners_square_options.color) {
            errors.push(
                "Invalid corner square color format. Use hex colors like #000000".to_string(),
            );
        }
        if !is_valid_color(&config.corners_dot_options.color) {
            errors.push("Invalid corner dot color format. Use hex colors like #000000".to_string());
        }
        if !is_valid_color(&config.background_options.color) {
            errors.push("Invalid background color format. Use hex colors like #ffffff".to_string());
        }

        // Image options
        let image_size = config.image_options.image_size;
        if image_size < rules.image_size_min || image_size > rules.image_size_max {
            errors.push(format!(
                "Image size must be between {} and {}",
                rules.image_size_min, rules.image_size_max
            ));
        }
        let margin = config.image_options.margin;
        if margin < 0 || margin > rules.image_margin_max {
            errors.push(format!(
                "Image margin must be between 0 and {}",
                rules.image_margin_max
            ));
        }

        if !self.validate_image_readability(config.qr_size(), image_size) {
            errors.push(
                "Image size may affect QR code readability. Consider using a smaller image."
                    .to_string(),
            );
        }

        if let Some(image) = config.image.as_deref() {
            errors.extend(validate_image_url(image));
        }

        // Enumerated styles
        if !is_option(&DOT_TYPE_OPTIONS, &config.dots_options.kind) {
            errors.push("Invalid dot type selected".to_string());
        }
        if !is_option(&CORNER_SQUARE_TYPE_OPTIONS, &config.corners_square_options.kind) {
            errors.push("Invalid corner square type selected".to_string());
        }
        if !is_option(&CORNER_DOT_TYPE_OPTIONS, &config.corners_dot_options.kind) {
            errors.push("Invalid corner dot type selected".to_string());
        }
        if !is_option(&ERROR_CORRECTION_LEVELS, &config.qr_options.error_correction_level) {
            errors.push("Invalid error correction level selected".to_string());
        }

        QrValidation::from_errors(errors)
    }

    fn qr_dimension_in_range(&self, value: u32) -> bool {
        value >= self.rules.qr_min_dimension && value <= self.rules.qr_max_dimension
    }

    /// True when the image covers at most the safe share of the QR code
    pub fn validate_image_readability(&self, qr_size: u32, image_size: f64) -> bool {
        let qr_size = f64::from(qr_size);
        qr_size * image_size <= qr_size * self.rules.readability_max_ratio
    }

    /// Suggested image size ratio for a QR code of `qr_size` pixels
    pub fn image_size_recommendation(&self, qr_size: u32) -> f64 {
        let ratio: f64 = if qr_size > 300 { 0.25 } else { 0.2 };
        ratio.min(self.rules.image_size_max)
    }

    pub fn validate_image_file(&self, file: &UploadedFile) -> Vec<String> {
        let mut errors = Vec::new();

        if file.size() > self.rules.max_image_file_bytes {
            errors.push(format!(
                "Image file size must not exceed {}MB",
                self.rules.max_image_file_megabytes()
            ));
        }

        if !ALLOWED_IMAGE_MIME_TYPES.contains(&file.mime_type.as_str()) {
            errors.push(
                "Invalid image format. Only PNG, JPG, GIF, SVG, and WebP are supported".to_string(),
            );
        }

        errors
    }

    pub fn validate_image_dimensions(&self, width: u32, height: u32) -> Vec<String> {
        let mut errors = Vec::new();
        let (min, max) = (self.rules.image_min_pixels, self.rules.image_max_pixels);

        if width < min || height < min {
            errors.push(format!(
                "Image dimensions must be at least {}x{} pixels",
                min, min
            ));
        }

        if width > max || height > max {
            errors.push(format!(
                "Image dimensions must not exceed {}x{} pixels",
                max, max
            ));
        }

        errors
    }

    /// Sanitize using the configured length cap
    pub fn sanitize(&self, data: &str) -> String {
        sanitize_qr_data(data, self.rules.max_qr_data_length)
    }
}

impl Default for QrConfigValidator {
    fn default() -> Self {
        Self::new(ValidationRules::default())
    }
}
