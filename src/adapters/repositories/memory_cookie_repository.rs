use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use chrono::Utc;

use crate::{
    adapters::dto::cookie_dto::StoredCookie,
    application::{error::ApplicationError, repositories::cookie_repository::CookieRepository},
};

/// Process-local cookie store with the same expiry rules as the on-disk jar.
#[derive(Default)]
pub struct InMemoryCookieRepository {
    cookies: Mutex<HashMap<String, StoredCookie>>,
    secure: bool,
}

impl InMemoryCookieRepository {
    pub fn new(secure: bool) -> Self {
        Self {
            cookies: Mutex::new(HashMap::new()),
            secure,
        }
    }

    pub fn entry(&self, name: &str) -> Option<StoredCookie> {
        self.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl CookieRepository for InMemoryCookieRepository {
    fn get(&self, name: &str) -> Result<Option<String>, ApplicationError> {
        let mut cookies = self.cookies.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();

        let expired = match cookies.get(name) {
            Some(cookie) if !cookie.is_expired(now) => return Ok(Some(cookie.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            cookies.remove(name);
        }
        Ok(None)
    }

    fn set(&self, name: &str, value: &str, ttl_hours: f64) -> Result<(), ApplicationError> {
        let cookie = StoredCookie::new(value, ttl_hours, self.secure, Utc::now());
        self.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), cookie);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), ApplicationError> {
        self.cookies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        Ok(())
    }
}
