use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{adapters::dto::token_dto::expiry_after, application::services::AuthUser};

#[derive(Debug, Serialize)]
pub struct PasswordCredentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest<'a> {
    pub refresh_token: &'a str,
}

/// User object returned by the Supabase auth API.
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<SupabaseUser> for AuthUser {
    fn from(user: SupabaseUser) -> Self {
        AuthUser {
            id: user.id,
            email: user.email.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    pub user: SupabaseUser,
}

fn default_expires_in() -> i64 {
    3600
}

/// Sign-up answers with a full session when e-mail confirmation is disabled
/// and with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(SessionResponse),
    User(SupabaseUser),
}

/// Session as kept in the cookie jar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl StoredSession {
    /// `None` when `expires_in` does not fit a timestamp. Negative lifetimes
    /// count as already expired.
    pub fn from_response(response: SessionResponse, now: DateTime<Utc>) -> Option<Self> {
        let expires_at = expiry_after(now, response.expires_in.max(0).unsigned_abs())?;
        Some(Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
            user: response.user.into(),
        })
    }

    /// Access tokens are refreshed a minute before they actually expire.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now + Duration::seconds(60)
    }
}
