use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    #[serde(rename = "gdrive", alias = "GDrive")]
    GDrive,
    #[default]
    #[serde(rename = "supabase", alias = "Supabase")]
    Supabase,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::GDrive => "gdrive",
            Provider::Supabase => "supabase",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstanceStatus::Online => "online",
            InstanceStatus::Offline => "offline",
            InstanceStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A backend service instance as listed on the admin panel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InstanceInfo {
    pub server_id: String,
    pub provider: Provider,
    pub server_url: Option<String>,
    pub server_name: Option<String>,
    #[serde(default)]
    pub status: InstanceStatus,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BackendStatus {
    pub server_id: String,
    pub server_name: String,
    pub server_url: String,
    pub provider: Provider,
    pub is_healthy: bool,
    pub consecutive_failures: u32,
}

/// Load balancer view of the backend fleet.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthCheckResponse {
    pub load_balancer: String,
    pub total_backends: u32,
    pub healthy_backends: u32,
    pub backends: Vec<BackendStatus>,
}

impl HealthCheckResponse {
    pub fn status_of(&self, server_id: &str) -> InstanceStatus {
        match self.backends.iter().find(|b| b.server_id == server_id) {
            Some(backend) if backend.is_healthy => InstanceStatus::Online,
            Some(_) => InstanceStatus::Offline,
            None => InstanceStatus::Unknown,
        }
    }
}
