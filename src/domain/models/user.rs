use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{file::File, instance::Provider};

pub const DEFAULT_TOTAL_SPACE: u64 = 1024 * 1024 * 1024;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Backend user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub uid: Uuid,
    #[serde(rename = "fileCount")]
    pub file_count: u64,
    #[serde(rename = "totalSpace")]
    pub total_space: u64,
    #[serde(rename = "usedSpace")]
    pub used_space: u64,
}

/// Signed-in user joined with its backend quota.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub file_count: u64,
    pub total_space: u64,
    pub used_space: u64,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            file_count: 0,
            total_space: DEFAULT_TOTAL_SPACE,
            used_space: 0,
            created_at: None,
        }
    }

    pub fn from_user_info(info: UserInfo, email: impl Into<String>) -> Self {
        Self {
            id: info.uid.to_string(),
            email: email.into(),
            file_count: info.file_count,
            total_space: info.total_space,
            used_space: info.used_space,
            created_at: None,
        }
    }

    pub fn available_space(&self) -> u64 {
        self.total_space.saturating_sub(self.used_space)
    }

    pub fn used_space_percentage(&self) -> f64 {
        if self.total_space == 0 {
            return 100.0;
        }
        self.used_space as f64 / self.total_space as f64 * 100.0
    }

    pub fn total_space_in_gb(&self) -> String {
        format!("{:.2}", self.total_space as f64 / BYTES_PER_GB)
    }

    pub fn used_space_in_mb(&self) -> String {
        format!("{:.2}", self.used_space as f64 / BYTES_PER_MB)
    }

    pub fn available_space_in_mb(&self) -> String {
        format!("{:.2}", self.available_space() as f64 / BYTES_PER_MB)
    }

    pub fn can_upload(&self, file_size: u64) -> bool {
        self.available_space() >= file_size
    }
}

/// Usage summary shown next to the file list.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub file_count: usize,
    pub supabase_files: usize,
    pub gdrive_files: usize,
    pub last_upload: Option<DateTime<Utc>>,
}

impl UserStats {
    pub fn from_files(files: &[File]) -> Self {
        let count = |provider: Provider| files.iter().filter(|f| f.provider == provider).count();
        Self {
            file_count: files.len(),
            supabase_files: count(Provider::Supabase),
            gdrive_files: count(Provider::GDrive),
            last_upload: files.iter().map(|f| f.uploaded_at).max(),
        }
    }

    pub fn last_upload_label(&self, now: DateTime<Utc>) -> String {
        let Some(last) = self.last_upload else {
            return "No uploads yet".to_string();
        };

        let days = (now - last).num_days();
        match days {
            d if d <= 0 => "Today".to_string(),
            1 => "Yesterday".to_string(),
            d if d < 7 => format!("{} days ago", d),
            d if d < 30 => format!("{} weeks ago", d / 7),
            _ => last.format("%Y-%m-%d").to_string(),
        }
    }
}
