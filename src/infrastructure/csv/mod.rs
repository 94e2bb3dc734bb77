// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Upload checks, decoding, parsing, and column analysis

mod column_analyzer;
mod csv_parser;

pub use column_analyzer::ColumnAnalyzer;
pub use csv_parser::{
    decode_content, process_selected_column_data, read_upload, CsvParseOutcome, CsvParser,
    ALLOWED_CSV_EXTENSIONS, ALLOWED_CSV_MIME_TYPES,
};
