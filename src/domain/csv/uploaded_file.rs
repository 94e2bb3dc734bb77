// ============================================================
// UPLOADED FILE
// ============================================================
// File-like input handed over by the upload form

use serde::{Deserialize, Serialize};

/// A user-supplied file: name, declared MIME type and raw bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// File name including extension
    pub name: String,

    /// MIME type as reported by the browser or inferred from the extension
    pub mime_type: String,

    /// File contents
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Lowercased extension without the dot, if any
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Metadata safe to attach to events
    pub fn info(&self) -> FileInfo {
        FileInfo {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            size: self.size(),
        }
    }
}

/// File metadata without contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

/// Infer a MIME type from a file name's extension
pub fn mime_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "csv" => "text/csv",
        Some(ext) if ext == "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
