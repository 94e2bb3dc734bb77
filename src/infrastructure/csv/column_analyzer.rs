// ============================================================
// COLUMN ANALYZER
// ============================================================
// Per-column statistics and type inference over parsed rows

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::csv::{ColumnStats, CsvRow, DataType};
use crate::domain::rules::ValidationRules;

static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+\.?\d*$").unwrap());

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://.+").unwrap());

/// Column analyzer for parsed CSV rows
pub struct ColumnAnalyzer {
    /// Non-empty values inspected for type detection
    type_sample: usize,

    /// Share of sampled values that must match a pattern
    threshold: f64,

    /// Sample values kept per column
    sample_values: usize,
}

impl ColumnAnalyzer {
    pub fn new(rules: &ValidationRules) -> Self {
        Self {
            type_sample: rules.type_detection_sample,
            threshold: rules.type_match_threshold,
            sample_values: rules.sample_value_count,
        }
    }

    /// Analyze every column of the row set
    ///
    /// Columns come from the first row's keys; an empty row set yields no stats.
    /// Pure: the same rows always produce the same stats.
    pub fn analyze(&self, rows: &[CsvRow]) -> Vec<ColumnStats> {
        let Some(first) = rows.first() else {
            return Vec::new();
        };

        first
            .keys()
            .map(|header| self.analyze_column(header, rows))
            .collect()
    }

    fn analyze_column(&self, header: &str, rows: &[CsvRow]) -> ColumnStats {
        let values: Vec<&str> = rows.iter().map(|row| row.get(header).unwrap_or("")).collect();
        let non_empty: Vec<&str> = values
            .iter()
            .copied()
            .filter(|v| !v.trim().is_empty())
            .collect();
        let unique: HashSet<&str> = non_empty.iter().map(|v| v.trim()).collect();

        ColumnStats {
            name: header.to_string(),
            sample_values: non_empty
                .iter()
                .take(self.sample_values)
                .map(|v| v.to_string())
                .collect(),
            empty_count: values.len() - non_empty.len(),
            total_count: values.len(),
            unique_count: unique.len(),
            data_type: self.detect_data_type(&non_empty),
        }
    }

    /// Infer a type tag from non-empty values
    pub fn detect_data_type(&self, values: &[&str]) -> DataType {
        if values.is_empty() {
            return DataType::Text;
        }

        let mut number_count = 0usize;
        let mut email_count = 0usize;
        let mut url_count = 0usize;

        let sample = &values[..values.len().min(self.type_sample)];
        for value in sample {
            let trimmed = value.trim();
            if NUMBER_PATTERN.is_match(trimmed) {
                number_count += 1;
            }
            if EMAIL_PATTERN.is_match(trimmed) {
                email_count += 1;
            }
            if URL_PATTERN.is_match(trimmed) {
                url_count += 1;
            }
        }

        let threshold = sample.len() as f64 * self.threshold;

        if number_count as f64 >= threshold {
            DataType::Number
        } else if email_count as f64 >= threshold {
            DataType::Email
        } else if url_count as f64 >= threshold {
            DataType::Url
        } else if number_count > 0 || email_count > 0 || url_count > 0 {
            DataType::Mixed
        } else {
            DataType::Text
        }
    }

    /// Human-readable report of all columns
    pub fn get_analysis_report(&self, rows: &[CsvRow]) -> String {
        self.analyze(rows)
            .iter()
            .map(ColumnStats::summary)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ColumnAnalyzer {
    fn default() -> Self {
        Self::new(&ValidationRules::default())
    }
}
