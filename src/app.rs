use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::application::store::ApplicationStore;
use crate::domain::csv::UploadedFile;
use crate::domain::error::Result;
use crate::domain::rules::ValidationRules;
use crate::domain::validation::ValidationError;
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::csv::{read_upload, CsvParser};

/// Install the global subscriber; `RUST_LOG` overrides the `info` default
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Store and upload flow built from layered configuration
pub fn bootstrap(config_file: Option<&Path>) -> Result<(ApplicationStore, UploadFlow)> {
    let rules = ConfigService::new(config_file).load_rules()?;
    let flow = UploadFlow::new(&rules);
    Ok((ApplicationStore::with_rules(rules), flow))
}

/// Drives the upload step: pre-check, parse, then hand the result to the store
pub struct UploadFlow {
    parser: CsvParser,
}

impl Default for UploadFlow {
    fn default() -> Self {
        Self::new(&ValidationRules::default())
    }
}

impl UploadFlow {
    pub fn new(rules: &ValidationRules) -> Self {
        Self {
            parser: CsvParser::with_rules(rules),
        }
    }

    pub fn parser(&self) -> &CsvParser {
        &self.parser
    }

    /// Load `file` into the store, honouring the store's `omit_header_row`
    ///
    /// Rejected files leave the previous upload in place and only record the
    /// errors. Returns every error reported for this upload.
    pub fn load(&self, store: &mut ApplicationStore, file: UploadedFile) -> Vec<ValidationError> {
        let errors = self.parser.validate_file(Some(&file));
        if !errors.is_empty() {
            store.set_errors(errors.clone(), true);
            return errors;
        }

        store.set_is_loading(true);
        let outcome = self
            .parser
            .parse(&file, store.column_config().omit_header_row);
        info!(
            file = %file.name,
            rows = outcome.data.rows.len(),
            errors = outcome.errors.len(),
            "Parsed upload"
        );

        store.set_errors(outcome.errors.clone(), true);
        store.set_selected_file(Some(file), true);
        store.set_parsed_csv_data(outcome.data, true);
        store.set_is_loading(false);

        outcome.errors
    }

    pub fn load_path(&self, store: &mut ApplicationStore, path: &Path) -> Result<Vec<ValidationError>> {
        let file = read_upload(path)?;
        Ok(self.load(store, file))
    }

    /// Toggle header handling and re-parse the current upload, if any
    pub fn set_omit_header_row(
        &self,
        store: &mut ApplicationStore,
        omit_header_row: bool,
    ) -> Vec<ValidationError> {
        let mut config = store.column_config().clone();
        config.omit_header_row = omit_header_row;
        store.set_column_config(config, true);

        let Some(file) = store.selected_file().cloned() else {
            return Vec::new();
        };

        let outcome = self.parser.parse(&file, omit_header_row);
        store.set_errors(outcome.errors.clone(), true);
        store.set_parsed_csv_data(outcome.data, true);
        outcome.errors
    }
}
