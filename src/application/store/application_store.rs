// ============================================================
// APPLICATION STORE
// ============================================================
// Sole owner of wizard state. Every mutation updates state, optionally
// emits one event, then runs the cascades that keep dependent fields in
// step before returning.

use serde::Serialize;
use tracing::{debug, warn};

use super::event_bus::EventBus;
use crate::application::use_cases::column_selection::validate_column_selection;
use crate::application::use_cases::qr_validation::QrConfigValidator;
use crate::domain::csv::{ColumnStats, CsvRow, FileInfo, ParsedCsvData, UploadedFile};
use crate::domain::error::Result;
use crate::domain::event::{AppStateEvent, EventPayload, EventType};
use crate::domain::form::{AppMode, BarcodeConfig, ColumnSelectionConfig, FormStep};
use crate::domain::qr::{QrCustomizationState, QrCustomizationUpdate, QrValidation};
use crate::domain::rules::ValidationRules;
use crate::domain::validation::{fields, ValidationError};
use crate::infrastructure::csv::{process_selected_column_data, ColumnAnalyzer};

pub const NO_QR_DATA_MESSAGE: &str = "No data available for QR generation";

/// Batch of field updates applied by [`ApplicationStore::update_state`]
///
/// `None` leaves a field untouched. `file: Some(None)` clears the file.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub file: Option<Option<UploadedFile>>,
    pub parsed_data: Option<ParsedCsvData>,
    pub column_config: Option<ColumnSelectionConfig>,
    pub qr_customization: Option<QrCustomizationUpdate>,
    pub errors: Option<Vec<ValidationError>>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file: Option<UploadedFile>) -> Self {
        self.file = Some(file);
        self
    }

    pub fn parsed_data(mut self, data: ParsedCsvData) -> Self {
        self.parsed_data = Some(data);
        self
    }

    pub fn column_config(mut self, config: ColumnSelectionConfig) -> Self {
        self.column_config = Some(config);
        self
    }

    pub fn qr_customization(mut self, update: QrCustomizationUpdate) -> Self {
        self.qr_customization = Some(update);
        self
    }

    pub fn errors(mut self, errors: Vec<ValidationError>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Wire names of the fields this batch touches
    pub fn field_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.file.is_some() {
            names.push("selectedFile");
        }
        if self.parsed_data.is_some() {
            names.push("parsedCsvData");
        }
        if self.column_config.is_some() {
            names.push("columnConfig");
        }
        if self.qr_customization.is_some() {
            names.push("qrCustomization");
        }
        if self.errors.is_some() {
            names.push("errors");
        }
        names.into_iter().map(String::from).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }
}

/// Where the user stands in the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStatus {
    pub file_uploaded: bool,
    pub data_ready: bool,
    pub column_selected: bool,
    pub qr_customized: bool,
    pub ready_to_generate: bool,
}

/// Read-only copy of every field and derived value
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub app_mode: AppMode,
    pub current_step: FormStep,
    pub selected_file: Option<FileInfo>,
    pub parsed_csv_data: ParsedCsvData,
    pub barcode_config: BarcodeConfig,
    pub column_config: ColumnSelectionConfig,
    pub qr_customization: QrCustomizationState,
    pub errors: Vec<ValidationError>,
    pub is_loading: bool,
    pub column_stats: Vec<ColumnStats>,
    pub processed_data: Vec<String>,
    pub can_proceed_from_preview: bool,
    pub can_proceed_from_column_select: bool,
    pub can_proceed_from_qr_customization: bool,
    pub file_upload_valid: bool,
    pub form_valid: bool,
    pub progress: ProgressStatus,
}

pub struct ApplicationStore {
    rules: ValidationRules,
    analyzer: ColumnAnalyzer,
    events: EventBus,

    app_mode: AppMode,
    current_step: FormStep,
    selected_file: Option<UploadedFile>,
    parsed_csv_data: ParsedCsvData,
    barcode_config: BarcodeConfig,
    column_config: ColumnSelectionConfig,
    qr_customization: QrCustomizationState,
    errors: Vec<ValidationError>,
    is_loading: bool,
}

impl Default for ApplicationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationStore {
    pub fn new() -> Self {
        Self::with_rules(ValidationRules::default())
    }

    pub fn with_rules(rules: ValidationRules) -> Self {
        Self {
            analyzer: ColumnAnalyzer::new(&rules),
            rules,
            events: EventBus::new(),
            app_mode: AppMode::default(),
            current_step: FormStep::default(),
            selected_file: None,
            parsed_csv_data: ParsedCsvData::empty(),
            barcode_config: BarcodeConfig::default(),
            column_config: ColumnSelectionConfig::default(),
            qr_customization: QrCustomizationState::default(),
            errors: Vec::new(),
            is_loading: false,
        }
    }

    // ============================================================
    // EVENTS
    // ============================================================

    /// Register an observer for `event_type` (e.g. `"file:parsed"`)
    ///
    /// The returned closure removes exactly this handler and is safe to call
    /// more than once.
    pub fn add_event_listener<F>(&self, event_type: &str, handler: F) -> impl Fn() + 'static
    where
        F: Fn(&AppStateEvent) -> Result<()> + 'static,
    {
        self.events.subscribe(event_type, handler)
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.events.listener_count(event_type)
    }

    fn emit(&self, event_type: EventType, payload: EventPayload) {
        debug!(event = %event_type, "Emitting store event");
        self.events.emit(&AppStateEvent::new(event_type, payload));
    }

    // ============================================================
    // STATE ACCESSORS
    // ============================================================

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn app_mode(&self) -> AppMode {
        self.app_mode
    }

    pub fn current_step(&self) -> FormStep {
        self.current_step
    }

    pub fn selected_file(&self) -> Option<&UploadedFile> {
        self.selected_file.as_ref()
    }

    pub fn parsed_csv_data(&self) -> &ParsedCsvData {
        &self.parsed_csv_data
    }

    pub fn barcode_config(&self) -> BarcodeConfig {
        self.barcode_config
    }

    pub fn column_config(&self) -> &ColumnSelectionConfig {
        &self.column_config
    }

    pub fn qr_customization(&self) -> &QrCustomizationState {
        &self.qr_customization
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    // ============================================================
    // DERIVED VALUES
    // ============================================================

    pub fn csv_data(&self) -> &[CsvRow] {
        &self.parsed_csv_data.rows
    }

    pub fn column_stats(&self) -> Vec<ColumnStats> {
        self.analyzer.analyze(self.csv_data())
    }

    /// Non-empty values of the selected column
    pub fn processed_data(&self) -> Vec<String> {
        process_selected_column_data(&self.parsed_csv_data, &self.column_config)
    }

    pub fn can_proceed_from_preview(&self) -> bool {
        !self.csv_data().is_empty()
    }

    pub fn can_proceed_from_column_select(&self) -> bool {
        self.column_config.has_selection()
    }

    pub fn can_proceed_from_qr_customization(&self) -> bool {
        self.qr_customization.is_valid
    }

    pub fn file_upload_valid(&self) -> bool {
        self.selected_file.is_some() && !self.csv_data().is_empty() && self.errors.is_empty()
    }

    pub fn form_valid(&self) -> bool {
        self.file_upload_valid()
            && self.can_proceed_from_column_select()
            && self.can_proceed_from_qr_customization()
            && self.errors.is_empty()
    }

    /// First error reported against the file
    pub fn file_error(&self) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.is_for(fields::FILE))
    }

    pub fn column_errors(&self) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.is_for(fields::SELECTED_COLUMN))
            .collect()
    }

    pub fn progress_status(&self) -> ProgressStatus {
        ProgressStatus {
            file_uploaded: self.selected_file.is_some(),
            data_ready: self.can_proceed_from_preview(),
            column_selected: self.can_proceed_from_column_select(),
            qr_customized: self.can_proceed_from_qr_customization(),
            ready_to_generate: self.form_valid(),
        }
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            app_mode: self.app_mode,
            current_step: self.current_step,
            selected_file: self.selected_file.as_ref().map(UploadedFile::info),
            parsed_csv_data: self.parsed_csv_data.clone(),
            barcode_config: self.barcode_config,
            column_config: self.column_config.clone(),
            qr_customization: self.qr_customization.clone(),
            errors: self.errors.clone(),
            is_loading: self.is_loading,
            column_stats: self.column_stats(),
            processed_data: self.processed_data(),
            can_proceed_from_preview: self.can_proceed_from_preview(),
            can_proceed_from_column_select: self.can_proceed_from_column_select(),
            can_proceed_from_qr_customization: self.can_proceed_from_qr_customization(),
            file_upload_valid: self.file_upload_valid(),
            form_valid: self.form_valid(),
            progress: self.progress_status(),
        }
    }

    /// Dump the snapshot and listener counts at debug level
    pub fn debug_state(&self) {
        let listeners = self.events.listener_summary();
        match serde_json::to_string_pretty(&self.snapshot()) {
            Ok(state) => debug!(%state, ?listeners, "Application state"),
            Err(e) => warn!(error = %e, ?listeners, "Failed to serialize application state"),
        }
    }

    // ============================================================
    // MUTATIONS
    // ============================================================

    pub fn set_selected_file(&mut self, file: Option<UploadedFile>, emit: bool) {
        let previous = std::mem::replace(&mut self.selected_file, file);
        debug!(
            file = self.selected_file.as_ref().map(|f| f.name.as_str()),
            "Selected file changed"
        );

        if !emit {
            return;
        }

        // Every file handed in is a fresh upload, even with identical contents
        if let Some(info) = self.selected_file.as_ref().map(UploadedFile::info) {
            self.emit(EventType::FileUploaded, EventPayload::File { file: Some(info) });
            self.validate_column_configuration();
        } else if self.selected_file.is_none() && previous.is_some() {
            self.emit(EventType::FileCleared, EventPayload::File { file: None });
        }
    }

    pub fn set_parsed_csv_data(&mut self, data: ParsedCsvData, emit: bool) {
        self.parsed_csv_data = data;
        debug!(
            headers = self.parsed_csv_data.headers.len(),
            rows = self.parsed_csv_data.rows.len(),
            "Parsed data changed"
        );

        if emit {
            self.emit(
                EventType::FileParsed,
                EventPayload::Parsed {
                    parsed_data: self.parsed_csv_data.clone(),
                },
            );
            self.validate_column_configuration();
        }
    }

    pub fn set_column_config(&mut self, config: ColumnSelectionConfig, emit: bool) {
        let previous_config = std::mem::replace(&mut self.column_config, config);
        debug!(
            selected = self.column_config.selected_column.as_deref(),
            "Column config changed"
        );

        if emit {
            self.emit(
                EventType::ColumnSelected,
                EventPayload::Column {
                    config: self.column_config.clone(),
                    previous_config,
                },
            );
            self.validate_qr_configuration();
        }
    }

    /// Merge a partial QR customization update
    pub fn set_qr_customization(&mut self, update: QrCustomizationUpdate, emit: bool) {
        let configured = update.config.is_some();
        let validated = update.touches_validation();
        let previewed = update.preview_data.is_some();

        update.apply_to(&mut self.qr_customization);

        if !emit {
            return;
        }

        if configured {
            self.emit(
                EventType::QrConfigured,
                EventPayload::QrConfigured {
                    config: self.qr_customization.config.clone(),
                },
            );
        }
        if validated {
            self.emit(
                EventType::QrValidated,
                EventPayload::QrValidated {
                    validation: QrValidation {
                        is_valid: self.qr_customization.is_valid,
                        errors: self.qr_customization.errors.clone(),
                    },
                },
            );
            if self.qr_customization.is_valid {
                self.clear_field_errors(fields::QR, false);
            }
        }
        if previewed {
            self.emit(
                EventType::QrPreviewUpdated,
                EventPayload::PreviewUpdated {
                    preview_data: self.qr_customization.preview_data.clone(),
                },
            );
        }
    }

    pub fn set_errors(&mut self, errors: Vec<ValidationError>, emit: bool) {
        self.errors = errors;
        if emit {
            self.emit(
                EventType::ValidationCompleted,
                EventPayload::Validation {
                    field: None,
                    errors: Some(self.errors.clone()),
                },
            );
        }
    }

    pub fn clear_field_errors(&mut self, field: &str, emit: bool) {
        self.errors.retain(|e| !e.is_for(field));
        if emit {
            self.emit(
                EventType::ValidationCleared,
                EventPayload::Validation {
                    field: Some(field.to_string()),
                    errors: None,
                },
            );
        }
    }

    pub fn add_errors(&mut self, errors: Vec<ValidationError>, emit: bool) {
        if emit {
            self.errors.extend(errors.iter().cloned());
            self.emit(
                EventType::ValidationTriggered,
                EventPayload::Validation {
                    field: None,
                    errors: Some(errors),
                },
            );
        } else {
            self.errors.extend(errors);
        }
    }

    pub fn set_current_step(&mut self, step: FormStep) {
        debug!(from = %self.current_step, to = %step, "Wizard step changed");
        self.current_step = step;
    }

    pub fn set_app_mode(&mut self, mode: AppMode) {
        self.app_mode = mode;
    }

    pub fn set_is_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_barcode_config(&mut self, config: BarcodeConfig) {
        self.barcode_config = config;
    }

    /// Apply several updates silently, announce them once, then re-run both cascades
    pub fn update_state(&mut self, update: StateUpdate) {
        let updated = update.field_names();
        debug!(?updated, "Batch state update");

        if let Some(file) = update.file {
            self.set_selected_file(file, false);
        }
        if let Some(data) = update.parsed_data {
            self.set_parsed_csv_data(data, false);
        }
        if let Some(config) = update.column_config {
            self.set_column_config(config, false);
        }
        if let Some(qr) = update.qr_customization {
            self.set_qr_customization(qr, false);
        }
        if let Some(errors) = update.errors {
            self.set_errors(errors, false);
        }

        self.emit(EventType::StateBatchUpdated, EventPayload::Batch { updated });

        self.validate_column_configuration();
        self.validate_qr_configuration();
    }

    /// Restore every field to its initial value; listeners stay registered
    pub fn reset(&mut self) {
        self.app_mode = AppMode::default();
        self.current_step = FormStep::default();
        self.selected_file = None;
        self.parsed_csv_data = ParsedCsvData::empty();
        self.barcode_config = BarcodeConfig::default();
        self.column_config = ColumnSelectionConfig::default();
        self.qr_customization = QrCustomizationState::default();
        self.errors.clear();
        self.is_loading = false;

        debug!("Application state reset");
        self.emit(EventType::AppReset, EventPayload::Empty {});
    }

    // ============================================================
    // VALIDATION HELPERS
    // ============================================================

    /// Validate the current styling config and record the outcome
    pub fn validate_qr_customization(&mut self, emit: bool) -> QrValidation {
        let validation =
            QrConfigValidator::new(self.rules.clone()).validate(&self.qr_customization.config);
        self.set_qr_customization(QrCustomizationUpdate::validation(validation.clone()), emit);
        validation
    }

    /// Replace `selectedColumn` errors with a fresh check of the selection
    pub fn validate_column_selection(&mut self, emit: bool) -> Vec<ValidationError> {
        let errors = validate_column_selection(&self.column_config, &self.column_stats());
        self.clear_field_errors(fields::SELECTED_COLUMN, false);
        if !errors.is_empty() {
            self.add_errors(errors.clone(), emit);
        }
        errors
    }

    // ============================================================
    // CASCADES
    // ============================================================

    /// Keep the column selection in step with the parsed headers
    fn validate_column_configuration(&mut self) {
        self.clear_field_errors(fields::SELECTED_COLUMN, false);

        if self.csv_data().is_empty() {
            let config = ColumnSelectionConfig {
                selected_column: None,
                available_columns: Vec::new(),
                ..self.column_config.clone()
            };
            self.set_column_config(config, false);
            return;
        }

        let headers = &self.parsed_csv_data.headers;
        if headers.is_empty() {
            return;
        }

        let mut config = self.column_config.clone();
        config.available_columns = headers.clone();
        let stale = config
            .selected_column
            .as_ref()
            .is_some_and(|selected| !headers.contains(selected));
        if stale {
            debug!(column = ?config.selected_column, "Dropping selection missing from new headers");
            config.selected_column = None;
        }
        self.set_column_config(config, false);

        if stale {
            self.validate_qr_configuration();
        }
    }

    /// Derive the QR preview from the selected column
    fn validate_qr_configuration(&mut self) {
        let first_value = if self.column_config.has_selection() {
            self.processed_data().into_iter().next()
        } else {
            None
        };

        let update = match first_value {
            Some(preview) => QrCustomizationUpdate::preview(preview),
            None => QrCustomizationUpdate {
                preview_data: Some(String::new()),
                is_valid: Some(false),
                errors: Some(vec![NO_QR_DATA_MESSAGE.to_string()]),
                config: None,
            },
        };
        self.set_qr_customization(update, false);
    }
}
