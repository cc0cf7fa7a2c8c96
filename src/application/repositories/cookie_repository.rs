use crate::application::error::ApplicationError;

/// Client-side key/value cookie storage.
///
/// Expiry is owned by the store: an expired cookie reads as absent.
pub trait CookieRepository: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>, ApplicationError>;

    /// Stores `value` under `name`, replacing any previous value. `ttl_hours`
    /// may be fractional.
    fn set(&self, name: &str, value: &str, ttl_hours: f64) -> Result<(), ApplicationError>;

    /// Removing a missing cookie is not an error.
    fn remove(&self, name: &str) -> Result<(), ApplicationError>;

    fn has(&self, name: &str) -> Result<bool, ApplicationError> {
        Ok(self.get(name)?.is_some())
    }
}
