//! Upload form checks and wizard navigation gates

use crate::domain::csv::{ColumnStats, UploadedFile};
use crate::domain::form::{BarcodeConfig, ColumnSelectionConfig, FormStep};
use crate::domain::rules::ValidationRules;
use crate::domain::validation::{fields, ValidationError};

use super::column_selection::validate_column_selection;

/// What the navigation gates look at
#[derive(Debug, Clone, Copy)]
pub struct StepGateInput<'a> {
    pub has_file: bool,
    pub row_count: usize,
    pub column_config: &'a ColumnSelectionConfig,
    pub barcode: BarcodeConfig,
}

/// Validator for the barcode form
pub struct FormValidator {
    min_dimension: u32,
    max_dimension: u32,
}

impl FormValidator {
    pub fn new(rules: &ValidationRules) -> Self {
        Self {
            min_dimension: rules.barcode_min_dimension,
            max_dimension: rules.barcode_max_dimension,
        }
    }

    fn in_range(&self, value: u32) -> bool {
        value >= self.min_dimension && value <= self.max_dimension
    }

    /// Width and height must both fall inside the barcode bounds
    pub fn validate_dimensions(&self, config: &BarcodeConfig) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !self.in_range(config.width) {
            errors.push(ValidationError::new(
                fields::WIDTH,
                format!(
                    "Width must be between {} and {} pixels",
                    self.min_dimension, self.max_dimension
                ),
            ));
        }

        if !self.in_range(config.height) {
            errors.push(ValidationError::new(
                fields::HEIGHT,
                format!(
                    "Height must be between {} and {} pixels",
                    self.min_dimension, self.max_dimension
                ),
            ));
        }

        errors
    }

    /// File presence, dimensions and, when provided, the column selection
    pub fn validate_form(
        &self,
        file: Option<&UploadedFile>,
        config: &BarcodeConfig,
        column: Option<(&ColumnSelectionConfig, &[ColumnStats])>,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if file.is_none() {
            errors.push(ValidationError::new(fields::FILE, "Please select a CSV file"));
        }

        errors.extend(self.validate_dimensions(config));

        if let Some((column_config, column_stats)) = column {
            errors.extend(validate_column_selection(column_config, column_stats));
        }

        errors
    }

    /// Whether the wizard may move on to `next_step`
    pub fn can_proceed_to_step(&self, next_step: FormStep, input: &StepGateInput<'_>) -> bool {
        match next_step {
            FormStep::Upload => true,
            FormStep::Preview => input.has_file,
            FormStep::ColumnSelect => input.has_file && input.row_count > 0,
            FormStep::Customization => input.column_config.has_selection(),
            FormStep::Ready => {
                input.column_config.has_selection()
                    && self.in_range(input.barcode.width)
                    && self.in_range(input.barcode.height)
            }
        }
    }
}

impl Default for FormValidator {
    fn default() -> Self {
        Self::new(&ValidationRules::default())
    }
}
