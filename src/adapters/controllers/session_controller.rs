use tracing::info;

use crate::{adapters::state::AppState, application::error::ApplicationError};

pub struct SessionController;

impl SessionController {
    pub fn show(state: &AppState) -> Result<String, ApplicationError> {
        Ok(match state.anonymous_session.get_key()? {
            Some(key) => format!("Anonymous key: {}", key),
            None => "No anonymous session".to_string(),
        })
    }

    /// Replaces the current key with a fresh one and a new expiry.
    pub fn renew(state: &AppState) -> Result<String, ApplicationError> {
        let key = state.anonymous_session.create_key()?;
        info!("Anonymous key renewed");
        Ok(format!("Anonymous key: {}", key))
    }

    pub fn clear(state: &AppState) -> Result<String, ApplicationError> {
        state.anonymous_session.remove_key()?;
        Ok("Anonymous session cleared".to_string())
    }
}
