use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info};

use crate::{
    application::{error::ApplicationError, repositories::cookie_repository::CookieRepository},
    domain::models::anonymous_key::{AnonymousKey, ANON_KEY_COOKIE_NAME},
};

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}

/// Keeps an anonymous visitor key in the cookie store.
///
/// The key is read and then written without any check-and-set, so two
/// concurrent `ensure_key` calls may both write; the last write wins.
pub struct ManageAnonymousSessionUseCase {
    cookies: Arc<dyn CookieRepository>,
    random: Arc<dyn RandomSource>,
}

impl ManageAnonymousSessionUseCase {
    pub fn new(cookies: Arc<dyn CookieRepository>) -> Self {
        Self::with_random_source(cookies, Arc::new(ThreadRandom))
    }

    pub fn with_random_source(
        cookies: Arc<dyn CookieRepository>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self { cookies, random }
    }

    /// Creates a key unless one is already stored.
    pub fn ensure_key(&self) -> Result<(), ApplicationError> {
        if self.cookies.has(ANON_KEY_COOKIE_NAME)? {
            debug!("Anonymous key already present");
            return Ok(());
        }
        self.create_key()?;
        Ok(())
    }

    /// Generates and stores a fresh key, replacing any existing one.
    pub fn create_key(&self) -> Result<String, ApplicationError> {
        let key = AnonymousKey::generate(self.random.next_unit(), Utc::now());

        self.cookies
            .set(ANON_KEY_COOKIE_NAME, &key.value, key.ttl_hours)?;

        info!(
            "Anonymous key created, expires in {:.2}h at {}",
            key.ttl_hours, key.expires_at
        );
        Ok(key.value)
    }

    pub fn get_key(&self) -> Result<Option<String>, ApplicationError> {
        self.cookies.get(ANON_KEY_COOKIE_NAME)
    }

    pub fn remove_key(&self) -> Result<(), ApplicationError> {
        self.cookies.remove(ANON_KEY_COOKIE_NAME)?;
        info!("Anonymous key removed");
        Ok(())
    }
}
