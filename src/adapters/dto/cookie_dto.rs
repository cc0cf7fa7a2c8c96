use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::anonymous_key::hours_to_duration;

/// A cookie as persisted by the cookie repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub value: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
    #[serde(rename = "sameSite")]
    pub same_site: String,
    pub secure: bool,
}

impl StoredCookie {
    pub fn new(value: &str, ttl_hours: f64, secure: bool, now: DateTime<Utc>) -> Self {
        Self {
            value: value.to_string(),
            expires_at: now + hours_to_duration(ttl_hours),
            same_site: "Lax".to_string(),
            secure,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
