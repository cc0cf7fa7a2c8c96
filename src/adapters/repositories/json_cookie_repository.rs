use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    adapters::dto::cookie_dto::StoredCookie,
    application::{error::ApplicationError, repositories::cookie_repository::CookieRepository},
};

type CookieJar = BTreeMap<String, StoredCookie>;

/// Cookie jar persisted as a JSON document on disk.
///
/// Every operation re-reads the file so several processes sharing the jar see
/// each other's writes; concurrent writers follow last-writer-wins.
pub struct JsonCookieRepository {
    path: PathBuf,
    secure: bool,
    guard: Mutex<()>,
}

impl JsonCookieRepository {
    pub fn new(path: impl Into<PathBuf>, secure: bool) -> Self {
        Self {
            path: path.into(),
            secure,
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<CookieJar, ApplicationError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(CookieJar::new()),
            Err(e) => {
                return Err(ApplicationError::Storage(format!(
                    "Cannot read cookie jar {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if raw.trim().is_empty() {
            return Ok(CookieJar::new());
        }

        serde_json::from_str(&raw).or_else(|e| {
            warn!(
                "Cookie jar {} is corrupt, starting empty: {}",
                self.path.display(),
                e
            );
            Ok(CookieJar::new())
        })
    }

    fn save(&self, jar: &CookieJar) -> Result<(), ApplicationError> {
        let storage_error = |e: io::Error| {
            ApplicationError::Storage(format!(
                "Cannot write cookie jar {}: {}",
                self.path.display(),
                e
            ))
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(storage_error)?;
        }

        let body = serde_json::to_string_pretty(jar)
            .map_err(|e| ApplicationError::Storage(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(storage_error)?;
        fs::rename(&tmp, &self.path).map_err(storage_error)?;
        Ok(())
    }

    fn prune(jar: &mut CookieJar) -> bool {
        let now = Utc::now();
        let before = jar.len();
        jar.retain(|_, cookie| !cookie.is_expired(now));
        before != jar.len()
    }
}

impl CookieRepository for JsonCookieRepository {
    fn get(&self, name: &str) -> Result<Option<String>, ApplicationError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let jar = self.load()?;
        let now = Utc::now();

        Ok(jar
            .get(name)
            .filter(|cookie| !cookie.is_expired(now))
            .map(|cookie| cookie.value.clone()))
    }

    fn set(&self, name: &str, value: &str, ttl_hours: f64) -> Result<(), ApplicationError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut jar = self.load()?;
        Self::prune(&mut jar);

        let cookie = StoredCookie::new(value, ttl_hours, self.secure, Utc::now());
        debug!("Setting cookie {} until {}", name, cookie.expires_at);
        jar.insert(name.to_string(), cookie);
        Self::prune(&mut jar);

        self.save(&jar)
    }

    fn remove(&self, name: &str) -> Result<(), ApplicationError> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut jar = self.load()?;
        let pruned = Self::prune(&mut jar);

        if jar.remove(name).is_some() || pruned {
            self.save(&jar)?;
        }
        Ok(())
    }
}
