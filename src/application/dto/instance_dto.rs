use serde::{Deserialize, Serialize};

use crate::domain::models::instance::Provider;

/// Partial update of an instance configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceUpdateDTO {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(rename = "serverName", skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(rename = "serverUrl", skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
}

impl InstanceUpdateDTO {
    pub fn is_empty(&self) -> bool {
        self.provider.is_none() && self.server_name.is_none() && self.server_url.is_none()
    }
}
