use serde::{Deserialize, Serialize};

/// Editable fields of a stored file. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileUpdateDTO {
    #[serde(rename = "fileName", skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FileUpdateDTO {
    pub fn is_empty(&self) -> bool {
        self.file_name.is_none() && self.description.is_none()
    }
}
