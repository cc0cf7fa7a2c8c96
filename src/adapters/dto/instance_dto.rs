use serde::Deserialize;

use crate::domain::models::instance::{InstanceInfo, InstanceStatus, Provider};

#[derive(Debug, Deserialize)]
pub struct InstanceConfigResponse {
    pub provider: Provider,
    #[serde(rename = "serverName", default)]
    pub server_name: Option<String>,
    #[serde(rename = "serverUrl", default)]
    pub server_url: Option<String>,
    #[serde(rename = "serverId", default)]
    pub server_id: Option<String>,
}

impl InstanceConfigResponse {
    /// The config endpoint may leave `serverId` empty; the id used in the
    /// request path is authoritative.
    pub fn into_instance(self, server_id: &str) -> InstanceInfo {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        InstanceInfo {
            server_id: non_empty(self.server_id).unwrap_or_else(|| server_id.to_string()),
            provider: self.provider,
            server_url: non_empty(self.server_url),
            server_name: non_empty(self.server_name),
            status: InstanceStatus::Unknown,
        }
    }
}
