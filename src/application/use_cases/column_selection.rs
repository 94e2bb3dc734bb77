//! Column selection checks
//!
//! Errors block the column-select step; warnings are advisory hints shown
//! next to the chosen column.

use crate::domain::csv::ColumnStats;
use crate::domain::form::ColumnSelectionConfig;
use crate::domain::validation::{fields, ValidationError};

/// Validate the selected column against the analyzed columns
pub fn validate_column_selection(
    config: &ColumnSelectionConfig,
    column_stats: &[ColumnStats],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(selected) = config.selected_column.as_deref() else {
        errors.push(ValidationError::new(
            fields::SELECTED_COLUMN,
            "Please select a column for barcode data",
        ));
        return errors;
    };

    let Some(stats) = column_stats.iter().find(|s| s.name == selected) else {
        errors.push(ValidationError::new(
            fields::SELECTED_COLUMN,
            "Selected column does not exist in the CSV data",
        ));
        return errors;
    };

    if stats.is_all_empty() {
        errors.push(ValidationError::new(
            fields::SELECTED_COLUMN,
            "Selected column contains no data",
        ));
    }

    errors
}

/// Data-quality warnings for the selected column
pub fn column_warnings(stats: &ColumnStats, selected_column: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    if stats.name != selected_column {
        return warnings;
    }

    let empty_percentage = stats.empty_percentage();
    if empty_percentage > 50.0 {
        warnings.push(format!("{:.1}% of values are empty", empty_percentage));
    }

    if stats.unique_count == 1 && stats.total_count > 1 {
        warnings.push("All values are identical".to_string());
    }

    if (stats.unique_count as f64) < stats.total_count as f64 * 0.1 && stats.total_count > 10 {
        warnings.push("Many duplicate values detected".to_string());
    }

    warnings
}
