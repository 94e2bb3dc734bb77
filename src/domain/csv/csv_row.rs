// ============================================================
// CSV ROW TYPES
// ============================================================
// Data structures representing parsed CSV content

use serde::{Deserialize, Serialize};

/// A single cell of a data row, keyed by its header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvField {
    /// Header the value belongs to
    pub name: String,

    /// Cell value, untrimmed
    pub value: String,
}

impl CsvField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether the value is empty once whitespace is removed
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// A data row: an ordered mapping from header to cell value.
///
/// Keys are unique. Inserting an existing header overwrites its value but
/// keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    pub fields: Vec<CsvField>,
}

impl CsvRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from headers and raw cells. Missing cells become empty strings.
    pub fn from_cells(headers: &[String], cells: &[String]) -> Self {
        let mut row = Self::new();
        for (idx, header) in headers.iter().enumerate() {
            let value = cells.get(idx).cloned().unwrap_or_default();
            row.insert(header.clone(), value);
        }
        row
    }

    pub fn insert(&mut self, name: String, value: String) {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => existing.value = value,
            None => self.fields.push(CsvField { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Header names in declared order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Result of parsing an uploaded CSV file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCsvData {
    /// Column names, either read from the first row or synthesized
    pub headers: Vec<String>,

    /// Data rows keyed by header
    pub rows: Vec<CsvRow>,

    /// Every record as read, including a consumed header row
    pub raw_rows: Vec<Vec<String>>,

    /// Whether the first raw row was used as headers
    pub has_headers: bool,
}

impl ParsedCsvData {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column in row order; rows lacking the column yield an empty string
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.rows.iter().map(move |row| row.get(column).unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_cells_pads_short_rows() {
        let row = CsvRow::from_cells(&headers(&["a", "b", "c"]), &["1".to_string()]);

        assert_eq!(row.len(), 3);
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("b"), Some(""));
        assert_eq!(row.get("c"), Some(""));
    }

    #[test]
    fn test_duplicate_header_keeps_position_last_value_wins() {
        let row = CsvRow::from_cells(
            &headers(&["id", "name", "id"]),
            &["1".to_string(), "x".to_string(), "2".to_string()],
        );

        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(row.get("id"), Some("2"));
    }

    #[test]
    fn test_column_values_missing_column() {
        let data = ParsedCsvData {
            headers: headers(&["a"]),
            rows: vec![CsvRow::from_cells(&headers(&["a"]), &["v".to_string()])],
            raw_rows: vec![vec!["v".to_string()]],
            has_headers: false,
        };

        assert_eq!(data.column_values("a").collect::<Vec<_>>(), vec!["v"]);
        assert_eq!(data.column_values("zzz").collect::<Vec<_>>(), vec![""]);
    }
}
