// ============================================================
// STORE EVENTS
// ============================================================
// Envelope and taxonomy of events emitted by the application store

use serde::{Deserialize, Serialize};

use super::csv::{FileInfo, ParsedCsvData};
use super::form::ColumnSelectionConfig;
use super::qr::{QrStylingConfig, QrValidation};
use super::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "file:uploaded")]
    FileUploaded,
    #[serde(rename = "file:cleared")]
    FileCleared,
    #[serde(rename = "file:parsed")]
    FileParsed,
    #[serde(rename = "column:selected")]
    ColumnSelected,
    #[serde(rename = "qr:configured")]
    QrConfigured,
    #[serde(rename = "qr:validated")]
    QrValidated,
    #[serde(rename = "qr:preview-updated")]
    QrPreviewUpdated,
    #[serde(rename = "validation:triggered")]
    ValidationTriggered,
    #[serde(rename = "validation:completed")]
    ValidationCompleted,
    #[serde(rename = "validation:cleared")]
    ValidationCleared,
    #[serde(rename = "state:batch-updated")]
    StateBatchUpdated,
    #[serde(rename = "app:reset")]
    AppReset,
}

impl EventType {
    pub const ALL: [EventType; 12] = [
        EventType::FileUploaded,
        EventType::FileCleared,
        EventType::FileParsed,
        EventType::ColumnSelected,
        EventType::QrConfigured,
        EventType::QrValidated,
        EventType::QrPreviewUpdated,
        EventType::ValidationTriggered,
        EventType::ValidationCompleted,
        EventType::ValidationCleared,
        EventType::StateBatchUpdated,
        EventType::AppReset,
    ];

    /// Listener key for this event
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::FileUploaded => "file:uploaded",
            EventType::FileCleared => "file:cleared",
            EventType::FileParsed => "file:parsed",
            EventType::ColumnSelected => "column:selected",
            EventType::QrConfigured => "qr:configured",
            EventType::QrValidated => "qr:validated",
            EventType::QrPreviewUpdated => "qr:preview-updated",
            EventType::ValidationTriggered => "validation:triggered",
            EventType::ValidationCompleted => "validation:completed",
            EventType::ValidationCleared => "validation:cleared",
            EventType::StateBatchUpdated => "state:batch-updated",
            EventType::AppReset => "app:reset",
        }
    }

    pub fn parse(value: &str) -> Option<EventType> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event-specific data carried in the envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum EventPayload {
    File {
        file: Option<FileInfo>,
    },
    Parsed {
        parsed_data: ParsedCsvData,
    },
    Column {
        config: ColumnSelectionConfig,
        previous_config: ColumnSelectionConfig,
    },
    QrConfigured {
        config: QrStylingConfig,
    },
    QrValidated {
        validation: QrValidation,
    },
    PreviewUpdated {
        preview_data: String,
    },
    Validation {
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        errors: Option<Vec<ValidationError>>,
    },
    /// Names of the state fields a batch update touched
    Batch {
        updated: Vec<String>,
    },
    Empty {},
}

/// `{type, payload, timestamp}` envelope delivered to listeners
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppStateEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub payload: EventPayload,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl AppStateEvent {
    pub fn new(event_type: EventType, payload: EventPayload) -> Self {
        Self {
            event_type,
            payload,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_round_trip() {
        for event_type in EventType::ALL {
            assert_eq!(EventType::parse(event_type.as_str()), Some(event_type));
        }
        assert_eq!(EventType::parse("file:error"), None);
    }

    #[test]
    fn test_envelope_shape() {
        let event = AppStateEvent::new(
            EventType::QrPreviewUpdated,
            EventPayload::PreviewUpdated {
                preview_data: "hello".to_string(),
            },
        );
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "qr:preview-updated");
        assert_eq!(json["payload"]["previewData"], "hello");
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }
}
