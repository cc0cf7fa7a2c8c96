use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{instance::Provider, upload::file_route};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A payload selected for upload.
#[derive(Debug, Clone)]
pub struct FileData {
    pub content: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

impl FileData {
    pub fn new(content: Vec<u8>, filename: String, mime_type: String) -> Self {
        Self {
            content,
            filename,
            mime_type,
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A stored file as shown on the dashboard and the file info page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
    pub provider: Provider,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "serverId")]
    pub server_id: Option<String>,
    #[serde(rename = "downloadCount")]
    pub download_count: Option<u64>,
    pub description: Option<String>,
    #[serde(rename = "lastAccess")]
    pub last_access: Option<DateTime<Utc>>,
    #[serde(rename = "deleteAt")]
    pub delete_at: Option<DateTime<Utc>>,
}

impl File {
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn download_url(&self) -> String {
        file_route(&self.id)
    }

    pub fn size_in_mb(&self) -> String {
        format!("{:.2}", self.size as f64 / BYTES_PER_MB)
    }

    pub fn formatted_date(&self) -> String {
        self.uploaded_at.format("%Y-%m-%d").to_string()
    }
}
