// ============================================================
// CSV PARSER
// ============================================================
// Pre-check uploads, decode them, and parse CSV with header handling

use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info, warn};

use crate::domain::csv::{mime_type_for, CsvRow, ParsedCsvData, UploadedFile};
use crate::domain::error::{AppError, Result};
use crate::domain::form::ColumnSelectionConfig;
use crate::domain::rules::{megabytes, ValidationRules};
use crate::domain::validation::{fields, ValidationError};

/// MIME types accepted for CSV uploads
pub const ALLOWED_CSV_MIME_TYPES: [&str; 3] = ["text/csv", "text/plain", "application/csv"];

/// File extensions accepted for CSV uploads
pub const ALLOWED_CSV_EXTENSIONS: [&str; 2] = ["csv", "txt"];

/// Delimiters tried during detection, in order of preference
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b'\t', b'|', b';'];

/// Parsed data together with the errors collected while producing it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvParseOutcome {
    pub data: ParsedCsvData,
    pub errors: Vec<ValidationError>,
}

impl CsvParseOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// CSV parser for wizard uploads
pub struct CsvParser {
    /// Fixed delimiter; detected from the content when unset
    delimiter: Option<u8>,

    /// Largest accepted upload in bytes
    max_file_bytes: u64,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::with_rules(&ValidationRules::default())
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: &ValidationRules) -> Self {
        Self {
            delimiter: None,
            max_file_bytes: rules.max_csv_file_bytes,
        }
    }

    /// Set a fixed delimiter instead of detecting one
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Check an upload before parsing it
    pub fn validate_file(&self, file: Option<&UploadedFile>) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let Some(file) = file else {
            errors.push(ValidationError::new(fields::FILE, "Please select a file"));
            return errors;
        };

        if file.size() == 0 {
            errors.push(ValidationError::new(fields::FILE, "File is empty"));
        }

        if file.size() > self.max_file_bytes {
            errors.push(ValidationError::new(
                fields::FILE,
                format!(
                    "File size must be less than {}MB",
                    megabytes(self.max_file_bytes)
                ),
            ));
        }

        let has_valid_type = ALLOWED_CSV_MIME_TYPES.contains(&file.mime_type.as_str());
        let has_valid_extension = file
            .extension()
            .is_some_and(|ext| ALLOWED_CSV_EXTENSIONS.contains(&ext.as_str()));

        if !has_valid_type && !has_valid_extension {
            errors.push(ValidationError::new(fields::FILE, "Please select a CSV file"));
        }

        if !errors.is_empty() {
            warn!(file = %file.name, count = errors.len(), "Rejected CSV upload");
        }

        errors
    }

    /// Parse an uploaded file
    ///
    /// With `omit_header_row` the first record becomes the headers; otherwise
    /// headers are synthesized as `Column 1..Column N`.
    pub fn parse(&self, file: &UploadedFile, omit_header_row: bool) -> CsvParseOutcome {
        let content = decode_content(&file.content);
        self.parse_content(&content, omit_header_row)
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str, omit_header_row: bool) -> CsvParseOutcome {
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| Self::detect_delimiter(content));

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let mut errors = Vec::new();
        let mut raw_rows: Vec<Vec<String>> = Vec::new();

        for (index, result) in reader.records().enumerate() {
            match result {
                Ok(record) => raw_rows.push(record.iter().map(str::to_string).collect()),
                Err(e) => {
                    let row = e
                        .position()
                        .map(|p| p.line())
                        .unwrap_or(index as u64 + 1);
                    warn!(row, error = %e, "Skipping unreadable CSV record");
                    let is_io = matches!(e.kind(), csv::ErrorKind::Io(_));
                    errors.push(ValidationError::new(
                        fields::CSV,
                        format!("Row {}: {}", row, e),
                    ));
                    if is_io {
                        break;
                    }
                }
            }
        }

        // The reader folds an unclosed quote into one trailing field without complaint
        if let Some(row) = unterminated_quote_line(content, delimiter) {
            warn!(row, "CSV quoted field is never closed");
            errors.push(ValidationError::new(
                fields::CSV,
                format!("Row {}: Quoted field unterminated", row),
            ));
        }

        if raw_rows.is_empty() {
            errors.push(ValidationError::new(fields::CSV, "CSV file contains no data"));
            return CsvParseOutcome {
                data: ParsedCsvData::empty(),
                errors,
            };
        }

        let data = Self::build_parsed_data(raw_rows, omit_header_row);

        info!(
            headers = data.headers.len(),
            rows = data.rows.len(),
            has_headers = data.has_headers,
            delimiter = %(delimiter as char),
            "Parsed CSV content"
        );

        CsvParseOutcome { data, errors }
    }

    fn build_parsed_data(raw_rows: Vec<Vec<String>>, omit_header_row: bool) -> ParsedCsvData {
        let (headers, data_start): (Vec<String>, usize) = if omit_header_row {
            let headers = raw_rows
                .first()
                .map(|first| {
                    first
                        .iter()
                        .enumerate()
                        .map(|(idx, cell)| {
                            let trimmed = cell.trim();
                            if trimmed.is_empty() {
                                synthesized_header(idx)
                            } else {
                                trimmed.to_string()
                            }
                        })
                        .collect()
                })
                .unwrap_or_default();
            (headers, 1)
        } else {
            let max_columns = raw_rows.iter().map(Vec::len).max().unwrap_or(0);
            ((0..max_columns).map(synthesized_header).collect(), 0)
        };

        let rows = raw_rows
            .iter()
            .skip(data_start)
            .map(|cells| CsvRow::from_cells(&headers, cells))
            .collect();

        ParsedCsvData {
            headers,
            rows,
            raw_rows,
            has_headers: omit_header_row,
        }
    }

    /// Detect delimiter from content (comma, tab, pipe, semicolon)
    pub fn detect_delimiter(content: &str) -> u8 {
        let sample_lines: Vec<_> = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(10)
            .collect();

        if sample_lines.is_empty() {
            return b',';
        }

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        for &delimiter in &DELIMITER_CANDIDATES {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        debug!(delimiter = %(best_delimiter as char), score = best_score, "Detected CSV delimiter");
        best_delimiter
    }
}

/// Line on which a still-open quoted field started, if the content ends inside one
///
/// Quotes only open a field when they are its first byte, as the reader treats them.
fn unterminated_quote_line(content: &str, delimiter: u8) -> Option<u64> {
    let bytes = content.as_bytes();
    let mut line: u64 = 1;
    let mut field_start = true;
    let mut open_since: Option<u64> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if open_since.is_some() {
            if b == b'"' {
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 1;
                } else {
                    open_since = None;
                }
            } else if b == b'\n' {
                line += 1;
            }
        } else if b == b'"' && field_start {
            open_since = Some(line);
            field_start = false;
        } else if b == delimiter {
            field_start = true;
        } else if b == b'\n' {
            line += 1;
            field_start = true;
        } else if b != b'\r' {
            field_start = false;
        }
        i += 1;
    }

    open_since
}

/// `Column <n>` with a 1-based index
fn synthesized_header(index: usize) -> String {
    format!("Column {}", index + 1)
}

/// Decode raw bytes, stripping a UTF-8 BOM and falling back to Windows-1252
pub fn decode_content(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (decoded, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
            if had_errors {
                warn!("CSV content contained bytes outside Windows-1252");
            }
            decoded.into_owned()
        }
    }
}

/// Read a file from disk into an upload, inferring its MIME type from the extension
pub fn read_upload(path: &Path) -> Result<UploadedFile> {
    let content = std::fs::read(path).map_err(|e| {
        AppError::IoError(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = mime_type_for(&name);

    Ok(UploadedFile::new(name, mime_type, content))
}

/// Non-empty values of the selected column, in row order
pub fn process_selected_column_data(
    parsed: &ParsedCsvData,
    column_config: &ColumnSelectionConfig,
) -> Vec<String> {
    let Some(column) = column_config.selected_column.as_deref() else {
        return Vec::new();
    };

    parsed
        .column_values(column)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::MIB;

    fn csv_file(name: &str, mime: &str, content: &str) -> UploadedFile {
        UploadedFile::new(name, mime, content.as_bytes().to_vec())
    }

    #[test]
    fn test_parse_with_header_row() {
        let parser = CsvParser::new();
        let outcome = parser.parse_content("name,email\nAlice,a@x.io\nBob,b@x.io", true);

        assert!(outcome.is_ok());
        let data = outcome.data;
        assert_eq!(data.headers, vec!["name", "email"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.raw_rows.len(), 3);
        assert!(data.has_headers);
        assert_eq!(data.rows[1].get("email"), Some("b@x.io"));
        assert_eq!(data.headers.len(), data.raw_rows[0].len());
        assert_eq!(data.rows.len(), data.raw_rows.len() - 1);
    }

    #[test]
    fn test_parse_without_header_row_uses_widest_row() {
        let parser = CsvParser::new();
        let outcome = parser.parse_content("a\nb,c,d\ne,f", false);

        let data = outcome.data;
        assert_eq!(data.headers, vec!["Column 1", "Column 2", "Column 3"]);
        assert_eq!(data.rows.len(), data.raw_rows.len());
        assert!(!data.has_headers);
        assert_eq!(data.rows[0].get("Column 1"), Some("a"));
        assert_eq!(data.rows[0].get("Column 3"), Some(""));
        assert_eq!(data.rows[2].get("Column 2"), Some("f"));
    }

    #[test]
    fn test_blank_header_cells_are_named_by_position() {
        let parser = CsvParser::new();
        let outcome = parser.parse_content("id, ,name\n1,2,3", true);

        assert_eq!(outcome.data.headers, vec!["id", "Column 2", "name"]);
        assert_eq!(outcome.data.rows[0].get("Column 2"), Some("2"));
    }

    #[test]
    fn test_header_cells_are_trimmed_values_are_not() {
        let parser = CsvParser::new();
        let outcome = parser.parse_content(" sku ,qty\n  A-1 ,3", true);

        assert_eq!(outcome.data.headers, vec!["sku", "qty"]);
        assert_eq!(outcome.data.rows[0].get("sku"), Some("  A-1 "));
    }

    #[test]
    fn test_empty_content_reports_no_data() {
        let parser = CsvParser::new();
        let outcome = parser.parse_content("", true);

        assert_eq!(outcome.data, ParsedCsvData::empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].field, "csv");
        assert_eq!(outcome.errors[0].message, "CSV file contains no data");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let parser = CsvParser::new();
        let outcome = parser.parse_content("h\n\nv1\n\nv2\n", true);

        assert_eq!(outcome.data.rows.len(), 2);
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let parser = CsvParser::new();
        let outcome = parser.parse_content("a,b\n", true);

        assert!(outcome.is_ok());
        assert_eq!(outcome.data.headers, vec!["a", "b"]);
        assert!(outcome.data.rows.is_empty());
        assert_eq!(outcome.data.raw_rows.len(), 1);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(CsvParser::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(CsvParser::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(CsvParser::detect_delimiter("a\tb\nc\td"), b'\t');
        assert_eq!(CsvParser::detect_delimiter("single\ncolumn"), b',');
    }

    #[test]
    fn test_semicolon_file_parses_columns() {
        let parser = CsvParser::new();
        let outcome = parser.parse_content("x;y\n1;2", true);

        assert_eq!(outcome.data.headers, vec!["x", "y"]);
        assert_eq!(outcome.data.rows[0].get("y"), Some("2"));
    }

    #[test]
    fn test_fixed_delimiter_overrides_detection() {
        let parser = CsvParser::new().with_delimiter(b',');
        let outcome = parser.parse_content("a;b\n1;2", true);

        assert_eq!(outcome.data.headers, vec!["a;b"]);
    }

    #[test]
    fn test_validate_file_rules() {
        let parser = CsvParser::new();

        let missing = parser.validate_file(None);
        assert_eq!(missing[0].message, "Please select a file");

        let ok = csv_file("data.csv", "text/csv", "a,b");
        assert!(parser.validate_file(Some(&ok)).is_empty());

        // Extension alone is enough
        let by_extension = csv_file("data.TXT", "application/octet-stream", "a");
        assert!(parser.validate_file(Some(&by_extension)).is_empty());

        // MIME type alone is enough
        let by_type = csv_file("export", "application/csv", "a");
        assert!(parser.validate_file(Some(&by_type)).is_empty());

        let empty_image = csv_file("photo.png", "image/png", "");
        let messages: Vec<_> = parser
            .validate_file(Some(&empty_image))
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["File is empty", "Please select a CSV file"]);
    }

    #[test]
    fn test_validate_file_size_limit() {
        let parser = CsvParser::new();
        let limit = ValidationRules::default().max_csv_file_bytes as usize;

        let at_limit = UploadedFile::new("big.csv", "text/csv", vec![b'a'; limit]);
        assert!(parser.validate_file(Some(&at_limit)).is_empty());

        let over = UploadedFile::new("big.csv", "text/csv", vec![b'a'; limit + 1]);
        let errors = parser.validate_file(Some(&over));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "File size must be less than 5MB");
    }

    #[test]
    fn test_unterminated_quote_is_reported() {
        let parser = CsvParser::new();
        let outcome = parser.parse_content("id,note\n1,\"open\n2,b\n3,c", true);

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].field, "csv");
        assert_eq!(outcome.errors[0].message, "Row 2: Quoted field unterminated");
    }

    #[test]
    fn test_well_formed_quotes_pass() {
        let parser = CsvParser::new();
        let outcome = parser.parse_content(
            "id,note\n1,\"say \"\"hi\"\"\"\n2,\"multi\nline\"\n3,plain",
            true,
        );

        assert!(outcome.is_ok());
        assert_eq!(outcome.data.rows.len(), 3);
        assert_eq!(outcome.data.rows[0].get("note"), Some("say \"hi\""));
        assert_eq!(outcome.data.rows[1].get("note"), Some("multi\nline"));
    }

    #[test]
    fn test_quote_scan_only_opens_at_field_start() {
        assert_eq!(unterminated_quote_line("a,b\"c\nd,e", b','), None);
        assert_eq!(unterminated_quote_line("a;\"x\"\"\n", b';'), Some(1));
        assert_eq!(unterminated_quote_line("a|b\r\n\"c|d", b'|'), Some(2));
    }

    #[test]
    fn test_sub_megabyte_limit_message() {
        let rules = ValidationRules {
            max_csv_file_bytes: MIB / 2,
            ..Default::default()
        };
        let parser = CsvParser::with_rules(&rules);

        let over = UploadedFile::new("big.csv", "text/csv", vec![b'a'; (MIB / 2) as usize + 1]);
        let errors = parser.validate_file(Some(&over));
        assert_eq!(errors[0].message, "File size must be less than 0.5MB");
    }

    #[test]
    fn test_decode_content_handles_bom_and_latin1() {
        assert_eq!(decode_content(b"\xEF\xBB\xBFa,b"), "a,b");
        assert_eq!(decode_content(b"caf\xE9"), "café");
    }

    #[test]
    fn test_parse_uploaded_file() {
        let parser = CsvParser::new();
        let file = csv_file("test.csv", "text/csv", "test,data\n1,sample");
        let outcome = parser.parse(&file, true);

        assert_eq!(outcome.data.headers, vec!["test", "data"]);
        assert_eq!(outcome.data.rows[0].get("data"), Some("sample"));
    }

    #[test]
    fn test_process_selected_column_data() {
        let parser = CsvParser::new();
        let data = parser.parse_content("code,note\nA1,x\n  ,y\nB2,z", true).data;

        let none_selected = ColumnSelectionConfig::default();
        assert!(process_selected_column_data(&data, &none_selected).is_empty());

        let config = ColumnSelectionConfig::default().with_selected("code");
        assert_eq!(process_selected_column_data(&data, &config), vec!["A1", "B2"]);

        let unknown = ColumnSelectionConfig::default().with_selected("missing");
        assert!(process_selected_column_data(&data, &unknown).is_empty());
    }
}
