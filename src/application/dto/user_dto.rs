use serde::{Deserialize, Serialize};

/// Partial update of a backend user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdateDTO {
    #[serde(rename = "fileCount", skip_serializing_if = "Option::is_none")]
    pub file_count: Option<u64>,
    #[serde(rename = "totalSpace", skip_serializing_if = "Option::is_none")]
    pub total_space: Option<u64>,
    #[serde(rename = "usedSpace", skip_serializing_if = "Option::is_none")]
    pub used_space: Option<u64>,
}
