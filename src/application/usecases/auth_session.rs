use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use tracing::{debug, info, warn};

use crate::{
    application::{
        error::ApplicationError,
        repositories::user_repository::UserRepository,
        services::{AuthService, AuthStateCallback, AuthSubscription, AuthUser},
        usecases::manage_anonymous_session::ManageAnonymousSessionUseCase,
    },
    domain::models::user::User,
};

/// Identity-provider session plus the backend user record linked to it.
pub struct AuthSessionUseCase {
    auth_service: Arc<dyn AuthService>,
    user_repository: Arc<dyn UserRepository>,
    anonymous_session: Arc<ManageAnonymousSessionUseCase>,
    linked_users: Mutex<HashSet<String>>,
}

impl AuthSessionUseCase {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_repository: Arc<dyn UserRepository>,
        anonymous_session: Arc<ManageAnonymousSessionUseCase>,
    ) -> Self {
        Self {
            auth_service,
            user_repository,
            anonymous_session,
            linked_users: Mutex::new(HashSet::new()),
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, ApplicationError> {
        let user = self.auth_service.sign_up(email, password).await?;
        self.link_backend_user(&user.id).await;
        Ok(user)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, ApplicationError> {
        let user = self.auth_service.sign_in(email, password).await?;
        self.link_backend_user(&user.id).await;
        Ok(user)
    }

    pub async fn sign_in_with_google(&self) -> Result<String, ApplicationError> {
        self.auth_service.sign_in_with_google().await
    }

    pub async fn complete_oauth(&self, callback_url: &str) -> Result<AuthUser, ApplicationError> {
        let user = self.auth_service.complete_oauth(callback_url).await?;
        self.link_backend_user(&user.id).await;
        Ok(user)
    }

    /// Ends the provider session and drops the anonymous key.
    pub async fn sign_out(&self) -> Result<(), ApplicationError> {
        self.auth_service.sign_out().await?;
        self.anonymous_session.remove_key()?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<Option<AuthUser>, ApplicationError> {
        self.auth_service.get_current_user().await
    }

    /// Signed-in user joined with the backend quota record.
    pub async fn current_profile(&self) -> Result<Option<User>, ApplicationError> {
        match self.auth_service.get_current_user().await? {
            Some(auth_user) => Ok(Some(self.profile(&auth_user).await?)),
            None => Ok(None),
        }
    }

    pub async fn profile(&self, auth_user: &AuthUser) -> Result<User, ApplicationError> {
        let info = self.user_repository.get_user_info(&auth_user.id).await?;
        Ok(User::from_user_info(info, auth_user.email.clone()))
    }

    /// Forwards auth state changes to `callback`, linking every newly seen
    /// user to a backend record first. Linking runs on the current tokio
    /// runtime and never blocks the notification, so it suits long-lived
    /// embedders; the CLI links explicitly on each sign-in path.
    pub fn watch(self: &Arc<Self>, callback: AuthStateCallback) -> AuthSubscription {
        let this = Arc::downgrade(self);
        self.auth_service
            .on_auth_state_change(Arc::new(move |user: Option<AuthUser>| {
                if let (Some(user), Some(this)) = (&user, this.upgrade()) {
                    if this.mark_linked(&user.id) {
                        match tokio::runtime::Handle::try_current() {
                            Ok(handle) => {
                                let uid = user.id.clone();
                                handle.spawn(async move { this.create_backend_user(&uid).await });
                            }
                            Err(_) => warn!("No runtime available to link user {}", user.id),
                        }
                    }
                }
                callback(user);
            }))
    }

    /// Creates the backend record once per user and process. Failures are
    /// logged and swallowed: the provider account is usable without it.
    pub async fn link_backend_user(&self, uid: &str) {
        if self.mark_linked(uid) {
            self.create_backend_user(uid).await;
        }
    }

    /// Marked before the create call, so a failed attempt is retried by the
    /// next process only.
    fn mark_linked(&self, uid: &str) -> bool {
        self.linked_users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uid.to_string())
    }

    async fn create_backend_user(&self, uid: &str) {
        match self.user_repository.create_user(uid).await {
            Ok(_) => info!("Backend user created for {}", uid),
            Err(ApplicationError::Conflict(_)) => debug!("Backend user {} already exists", uid),
            Err(e) => warn!("Failed to create backend user {}: {}", uid, e),
        }
    }
}
