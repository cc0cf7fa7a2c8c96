use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::{file::File, instance::Provider};

#[derive(Debug, Deserialize)]
pub struct UploadFileResponse {
    #[serde(rename = "fileId")]
    pub file_id: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "mimeType", default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(rename = "uploadedAt", default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(rename = "deleteAt", default)]
    pub delete_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileResponse {
    #[serde(rename = "fileId")]
    pub file_id: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub size: u64,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "serverId")]
    pub server_id: Option<String>,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(rename = "downloadCount", default)]
    pub download_count: u64,
    #[serde(rename = "lastAccess")]
    pub last_access: Option<DateTime<Utc>>,
    #[serde(rename = "deleteAt")]
    pub delete_at: Option<DateTime<Utc>>,
}

// The service does not report the storage provider per file.
impl From<FileResponse> for File {
    fn from(response: FileResponse) -> Self {
        Self {
            id: response.file_id,
            name: response.file_name,
            size: response.size,
            mime_type: response.mime_type,
            uploaded_at: response.uploaded_at,
            provider: Provider::default(),
            user_id: response.user_id,
            server_id: response.server_id,
            download_count: Some(response.download_count),
            description: response.description,
            last_access: response.last_access,
            delete_at: response.delete_at,
        }
    }
}
