// ============================================================
// COLUMN STATISTICS
// ============================================================
// Per-column summary derived from parsed rows

use super::DataType;
use serde::{Deserialize, Serialize};

/// Read-only summary of one column, recomputed whenever rows change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    /// Header name
    pub name: String,

    /// First few non-empty values in row order
    pub sample_values: Vec<String>,

    /// Values that are empty after trimming
    pub empty_count: usize,

    /// All values, empty or not
    pub total_count: usize,

    /// Distinct non-empty trimmed values
    pub unique_count: usize,

    /// Inferred type tag
    pub data_type: DataType,
}

impl ColumnStats {
    pub fn non_empty_count(&self) -> usize {
        self.total_count - self.empty_count
    }

    /// True when every value in the column is empty
    pub fn is_all_empty(&self) -> bool {
        self.empty_count == self.total_count
    }

    /// Share of empty values as a percentage (0.0 - 100.0)
    pub fn empty_percentage(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.empty_count as f64 / self.total_count as f64 * 100.0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({}): {} values, {} empty, {} unique",
            self.name, self.data_type, self.total_count, self.empty_count, self.unique_count
        )
    }
}
