use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single-use credential handed out by the service before an upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(rename = "fileId")]
    pub file_id: String,
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
}

impl UploadResult {
    pub fn new(file_id: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            download_url: download_url.into(),
        }
    }

    pub fn for_file(file_id: impl Into<String>) -> Self {
        let file_id = file_id.into();
        let download_url = file_route(&file_id);
        Self {
            file_id,
            download_url,
        }
    }
}

/// Retrieval route of a file inside the app.
pub fn file_route(file_id: &str) -> String {
    format!("/file/{}", file_id)
}

/// Receives upload progress as a percentage in `0.0..=100.0`.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Metadata sent along with the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitOptions {
    pub description: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Clone, Default)]
pub struct UploadOptions {
    pub user_id: Option<String>,
    pub description: Option<String>,
    pub on_progress: Option<ProgressCallback>,
}

impl UploadOptions {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }
}

impl fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadOptions")
            .field("user_id", &self.user_id)
            .field("description", &self.description)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

/// Lifecycle of a single upload call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    AwaitingToken,
    Uploading,
    Succeeded,
    Failed,
}

/// Storage class requested from the service. Files owned by a user are
/// permanent; anonymous ones are temporal and expire server side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Temporal,
    Permanent,
}

impl FileKind {
    pub fn for_user(user_id: Option<&str>) -> Self {
        match user_id {
            Some(_) => FileKind::Permanent,
            None => FileKind::Temporal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Temporal => "temporal",
            FileKind::Permanent => "permanent",
        }
    }
}
