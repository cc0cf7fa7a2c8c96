use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError, Weak,
    },
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::error::ApplicationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Invoked with the new user on sign-in and with `None` on sign-out.
pub type AuthStateCallback = Arc<dyn Fn(Option<AuthUser>) + Send + Sync>;

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, ApplicationError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, ApplicationError>;

    /// Starts the Google OAuth flow and returns the URL the user has to open.
    async fn sign_in_with_google(&self) -> Result<String, ApplicationError>;

    /// Finishes an OAuth flow from the redirect URL the provider sent back.
    async fn complete_oauth(&self, callback_url: &str) -> Result<AuthUser, ApplicationError>;

    async fn sign_out(&self) -> Result<(), ApplicationError>;
    async fn get_current_user(&self) -> Result<Option<AuthUser>, ApplicationError>;

    /// Registers a listener. The listener stays attached until the returned
    /// subscription is dropped.
    fn on_auth_state_change(&self, callback: AuthStateCallback) -> AuthSubscription;
}

#[derive(Default)]
struct ListenerSet {
    next_id: AtomicU64,
    callbacks: Mutex<HashMap<u64, AuthStateCallback>>,
}

/// Listener registry shared by auth service implementations.
#[derive(Clone, Default)]
pub struct AuthListeners {
    inner: Arc<ListenerSet>,
}

impl AuthListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: AuthStateCallback) -> AuthSubscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, callback);

        AuthSubscription {
            id,
            listeners: Arc::downgrade(&self.inner),
        }
    }

    /// Calls every listener. No ordering between listeners is guaranteed.
    pub fn notify(&self, user: Option<&AuthUser>) {
        // Snapshot so a listener may subscribe or unsubscribe while being called.
        let callbacks: Vec<AuthStateCallback> = self
            .inner
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        for callback in callbacks {
            callback(user.cloned());
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Detachment handle returned by [`AuthService::on_auth_state_change`].
#[must_use = "dropping the subscription detaches the listener"]
pub struct AuthSubscription {
    id: u64,
    listeners: Weak<ListenerSet>,
}

impl AuthSubscription {
    pub fn unsubscribe(self) {}
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(set) = self.listeners.upgrade() {
            set.callbacks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.id);
        }
    }
}
