// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Core types and value objects for uploaded CSV data
// No I/O, no async, no external dependencies

mod column_stats;
mod csv_row;
mod data_type;
mod uploaded_file;

pub use column_stats::ColumnStats;
pub use csv_row::{CsvField, CsvRow, ParsedCsvData};
pub use data_type::DataType;
pub use uploaded_file::{mime_type_for, FileInfo, UploadedFile};
