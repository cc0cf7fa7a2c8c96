use tracing::{info, warn};

use crate::{adapters::state::AppState, application::error::ApplicationError};

const MIN_PASSWORD_LENGTH: usize = 6;

pub struct AuthController;

impl AuthController {
    pub async fn sign_up(
        state: &AppState,
        email: &str,
        password: &str,
    ) -> Result<String, ApplicationError> {
        validate_credentials(email, password)?;
        let user = state.auth_session.sign_up(email, password).await?;
        Ok(format!("Account created for {} ({})", user.email, user.id))
    }

    pub async fn sign_in(
        state: &AppState,
        email: &str,
        password: &str,
    ) -> Result<String, ApplicationError> {
        validate_credentials(email, password)?;
        let user = state.auth_session.sign_in(email, password).await?;
        Ok(format!("Signed in as {}", user.email))
    }

    pub async fn google(state: &AppState) -> Result<String, ApplicationError> {
        let url = state.auth_session.sign_in_with_google().await?;
        Ok(format!(
            "Open this URL to continue with Google:\n{}\n\nThen run `vk auth callback <redirect-url>` with the address you were sent back to.",
            url
        ))
    }

    pub async fn callback(state: &AppState, callback_url: &str) -> Result<String, ApplicationError> {
        let user = state.auth_session.complete_oauth(callback_url).await?;
        Ok(format!("Signed in as {}", user.email))
    }

    pub async fn sign_out(state: &AppState) -> Result<String, ApplicationError> {
        state.auth_session.sign_out().await?;
        Ok("Signed out".to_string())
    }

    /// Signed-in user with the backend quota when it can be loaded.
    pub async fn whoami(state: &AppState) -> Result<String, ApplicationError> {
        let Some(user) = state.auth_session.current_user().await? else {
            return Ok(match state.anonymous_session.get_key()? {
                Some(key) => format!("Not signed in (anonymous key {})", key),
                None => "Not signed in".to_string(),
            });
        };

        match state.auth_session.profile(&user).await {
            Ok(profile) => {
                info!("Loaded profile for {}", profile.id);
                Ok(format!(
                    "{} ({})\n{} files, {} MB used of {} GB",
                    profile.email,
                    profile.id,
                    profile.file_count,
                    profile.used_space_in_mb(),
                    profile.total_space_in_gb()
                ))
            }
            Err(e) => {
                warn!("Profile unavailable for {}: {}", user.id, e);
                Ok(format!("{} ({})", user.email, user.id))
            }
        }
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApplicationError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => {
            return Err(ApplicationError::Validation(format!(
                "Invalid email address: {}",
                email
            )))
        }
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApplicationError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}
