//! Hand-written fakes for the application ports.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    adapters::{repositories::InMemoryCookieRepository, state::AppState},
    application::{
        dto::{file_dto::FileUpdateDTO, instance_dto::InstanceUpdateDTO, user_dto::UserUpdateDTO},
        error::ApplicationError,
        repositories::{
            admin_repository::AdminRepository, cookie_repository::CookieRepository,
            file_repository::FileRepository, user_repository::UserRepository,
        },
        services::{AuthListeners, AuthService, AuthStateCallback, AuthSubscription, AuthUser},
        usecases::manage_anonymous_session::RandomSource,
    },
    domain::models::{
        file::{File, FileData},
        instance::{
            BackendStatus, HealthCheckResponse, InstanceInfo, InstanceStatus, Provider,
        },
        upload::{ProgressCallback, SubmitOptions, UploadResult, UploadToken},
        user::{UserInfo, DEFAULT_TOTAL_SPACE},
    },
};

pub const FAKE_USER_ID: &str = "3f1c2a9e-5b7d-4e61-9a0f-2d8c4b6e1a73";

pub fn sample_file(id: &str, user_id: Option<&str>) -> File {
    File {
        id: id.to_string(),
        name: format!("{}.txt", id),
        size: 42,
        mime_type: "text/plain".to_string(),
        uploaded_at: Utc::now(),
        provider: Provider::Supabase,
        user_id: user_id.map(str::to_string),
        server_id: Some("vk-1".to_string()),
        download_count: Some(0),
        description: None,
        last_access: None,
        delete_at: None,
    }
}

pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        self.0
    }
}

#[derive(Default)]
pub struct RecordingCookieRepository {
    values: Mutex<HashMap<String, String>>,
    ttls: Mutex<Vec<f64>>,
    fail: bool,
}

impl RecordingCookieRepository {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn ttls(&self) -> Vec<f64> {
        self.ttls.lock().unwrap().clone()
    }

    pub fn set_count(&self) -> usize {
        self.ttls.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), ApplicationError> {
        if self.fail {
            return Err(ApplicationError::Storage("cookie jar unavailable".into()));
        }
        Ok(())
    }
}

impl CookieRepository for RecordingCookieRepository {
    fn get(&self, name: &str) -> Result<Option<String>, ApplicationError> {
        self.check()?;
        Ok(self.values.lock().unwrap().get(name).cloned())
    }

    fn set(&self, name: &str, value: &str, ttl_hours: f64) -> Result<(), ApplicationError> {
        self.check()?;
        self.values
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        self.ttls.lock().unwrap().push(ttl_hours);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), ApplicationError> {
        self.check()?;
        self.values.lock().unwrap().remove(name);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeFileRepository {
    pub token_error: Option<ApplicationError>,
    pub upload_error: Option<ApplicationError>,
    pub upload_result: Option<UploadResult>,
    pub progress_steps: Vec<f64>,
    pub files: HashMap<String, File>,
    pub user_files: HashMap<String, Vec<String>>,
    pub token_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub token_users: Mutex<Vec<Option<String>>>,
    pub submitted: Mutex<Vec<(String, SubmitOptions)>>,
}

impl FakeFileRepository {
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn token_users(&self) -> Vec<Option<String>> {
        self.token_users.lock().unwrap().clone()
    }

    pub fn submitted_tokens(&self) -> Vec<String> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|(token, _)| token.clone())
            .collect()
    }

    pub fn submitted_options(&self) -> Vec<SubmitOptions> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|(_, options)| options.clone())
            .collect()
    }
}

#[async_trait]
impl FileRepository for FakeFileRepository {
    async fn get_upload_token(
        &self,
        user_id: Option<&str>,
    ) -> Result<UploadToken, ApplicationError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        self.token_users
            .lock()
            .unwrap()
            .push(user_id.map(str::to_string));
        if let Some(err) = &self.token_error {
            return Err(err.clone());
        }
        Ok(UploadToken {
            token: "t1".to_string(),
            expires_at: Utc::now() + Duration::minutes(5),
        })
    }

    async fn upload_file(
        &self,
        _file: &FileData,
        token: &str,
        options: SubmitOptions,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadResult, ApplicationError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted
            .lock()
            .unwrap()
            .push((token.to_string(), options));
        if let Some(on_progress) = &on_progress {
            for step in &self.progress_steps {
                on_progress(*step);
            }
        }
        if let Some(err) = &self.upload_error {
            return Err(err.clone());
        }
        Ok(self
            .upload_result
            .clone()
            .unwrap_or_else(|| UploadResult::new("f1", "/file/f1")))
    }

    async fn get_file_info(&self, file_id: &str) -> Result<File, ApplicationError> {
        self.files
            .get(file_id)
            .cloned()
            .ok_or(ApplicationError::NotFound)
    }

    async fn get_user_files(&self, user_id: &str) -> Result<Vec<String>, ApplicationError> {
        Ok(self.user_files.get(user_id).cloned().unwrap_or_default())
    }

    async fn update_file(
        &self,
        file_id: &str,
        updates: FileUpdateDTO,
    ) -> Result<File, ApplicationError> {
        let mut file = self.get_file_info(file_id).await?;
        if let Some(name) = updates.file_name {
            file.name = name;
        }
        if updates.description.is_some() {
            file.description = updates.description;
        }
        Ok(file)
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), ApplicationError> {
        self.get_file_info(file_id).await.map(|_| ())
    }

    fn get_download_url(&self, file_id: &str) -> String {
        format!("http://vk.test/api/v1/files/{}/content", file_id)
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, ApplicationError> {
        self.get_file_info(file_id).await.map(|_| b"content".to_vec())
    }
}

#[derive(Default)]
pub struct FakeUserRepository {
    pub create_error: Option<ApplicationError>,
    pub created: Mutex<Vec<String>>,
    pub users: Mutex<HashMap<String, UserInfo>>,
}

impl FakeUserRepository {
    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn create_user(&self, uid: &str) -> Result<UserInfo, ApplicationError> {
        self.created.lock().unwrap().push(uid.to_string());
        if let Some(err) = &self.create_error {
            return Err(err.clone());
        }
        let info = UserInfo {
            uid: Uuid::parse_str(uid).unwrap_or_default(),
            file_count: 0,
            total_space: DEFAULT_TOTAL_SPACE,
            used_space: 0,
        };
        self.users
            .lock()
            .unwrap()
            .insert(uid.to_string(), info.clone());
        Ok(info)
    }

    async fn get_user_info(&self, uid: &str) -> Result<UserInfo, ApplicationError> {
        self.users
            .lock()
            .unwrap()
            .get(uid)
            .cloned()
            .ok_or(ApplicationError::NotFound)
    }

    async fn update_user(
        &self,
        uid: &str,
        updates: UserUpdateDTO,
    ) -> Result<UserInfo, ApplicationError> {
        let mut users = self.users.lock().unwrap();
        let info = users.get_mut(uid).ok_or(ApplicationError::NotFound)?;
        if let Some(v) = updates.file_count {
            info.file_count = v;
        }
        if let Some(v) = updates.total_space {
            info.total_space = v;
        }
        if let Some(v) = updates.used_space {
            info.used_space = v;
        }
        Ok(info.clone())
    }

    async fn delete_user(&self, uid: &str) -> Result<(), ApplicationError> {
        self.users
            .lock()
            .unwrap()
            .remove(uid)
            .map(|_| ())
            .ok_or(ApplicationError::NotFound)
    }
}

#[derive(Default)]
pub struct FakeAuthService {
    listeners: AuthListeners,
    current: Mutex<Option<AuthUser>>,
    error: Mutex<Option<ApplicationError>>,
}

impl FakeAuthService {
    pub fn fail_with(&self, error: ApplicationError) {
        *self.error.lock().unwrap() = Some(error);
    }

    fn check(&self) -> Result<(), ApplicationError> {
        match self.error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn establish(&self, email: &str) -> AuthUser {
        let user = AuthUser {
            id: FAKE_USER_ID.to_string(),
            email: email.to_string(),
        };
        *self.current.lock().unwrap() = Some(user.clone());
        self.listeners.notify(Some(&user));
        user
    }
}

#[async_trait]
impl AuthService for FakeAuthService {
    async fn sign_up(&self, email: &str, _password: &str) -> Result<AuthUser, ApplicationError> {
        self.check()?;
        Ok(self.establish(email))
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthUser, ApplicationError> {
        self.check()?;
        Ok(self.establish(email))
    }

    async fn sign_in_with_google(&self) -> Result<String, ApplicationError> {
        self.check()?;
        Ok("https://auth.test/authorize?provider=google".to_string())
    }

    async fn complete_oauth(&self, _callback_url: &str) -> Result<AuthUser, ApplicationError> {
        self.check()?;
        Ok(self.establish("oauth@example.com"))
    }

    async fn sign_out(&self) -> Result<(), ApplicationError> {
        self.check()?;
        *self.current.lock().unwrap() = None;
        self.listeners.notify(None);
        Ok(())
    }

    async fn get_current_user(&self) -> Result<Option<AuthUser>, ApplicationError> {
        Ok(self.current.lock().unwrap().clone())
    }

    fn on_auth_state_change(&self, callback: AuthStateCallback) -> AuthSubscription {
        self.listeners.subscribe(callback)
    }
}

/// Two instances: `vk-1` healthy on Supabase, `vk-2` down on Google Drive.
pub struct FakeAdminRepository {
    instances: Mutex<Vec<InstanceInfo>>,
}

impl Default for FakeAdminRepository {
    fn default() -> Self {
        let instance = |id: &str, provider, status| InstanceInfo {
            server_id: id.to_string(),
            provider,
            server_url: Some(format!("https://{}.example", id)),
            server_name: Some(format!("{}-name", id)),
            status,
        };
        Self {
            instances: Mutex::new(vec![
                instance("vk-1", Provider::Supabase, InstanceStatus::Online),
                instance("vk-2", Provider::GDrive, InstanceStatus::Offline),
            ]),
        }
    }
}

#[async_trait]
impl AdminRepository for FakeAdminRepository {
    async fn get_all_instances(&self) -> Result<Vec<InstanceInfo>, ApplicationError> {
        Ok(self.instances.lock().unwrap().clone())
    }

    async fn get_instance(&self, server_id: &str) -> Result<InstanceInfo, ApplicationError> {
        self.instances
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.server_id == server_id)
            .cloned()
            .ok_or(ApplicationError::NotFound)
    }

    async fn check_health(&self) -> Result<HealthCheckResponse, ApplicationError> {
        let backends: Vec<BackendStatus> = self
            .instances
            .lock()
            .unwrap()
            .iter()
            .map(|i| BackendStatus {
                server_id: i.server_id.clone(),
                server_name: i.server_name.clone().unwrap_or_default(),
                server_url: i.server_url.clone().unwrap_or_default(),
                provider: i.provider,
                is_healthy: i.status == InstanceStatus::Online,
                consecutive_failures: if i.status == InstanceStatus::Online { 0 } else { 3 },
            })
            .collect();
        Ok(HealthCheckResponse {
            load_balancer: "degraded".to_string(),
            total_backends: backends.len() as u32,
            healthy_backends: backends.iter().filter(|b| b.is_healthy).count() as u32,
            backends,
        })
    }

    async fn update_instance(
        &self,
        server_id: &str,
        updates: InstanceUpdateDTO,
    ) -> Result<InstanceInfo, ApplicationError> {
        let mut instances = self.instances.lock().unwrap();
        let instance = instances
            .iter_mut()
            .find(|i| i.server_id == server_id)
            .ok_or(ApplicationError::NotFound)?;
        if let Some(provider) = updates.provider {
            instance.provider = provider;
        }
        if updates.server_name.is_some() {
            instance.server_name = updates.server_name;
        }
        if updates.server_url.is_some() {
            instance.server_url = updates.server_url;
        }
        Ok(instance.clone())
    }
}

/// App state wired to the fakes, with handles kept for assertions.
pub struct Harness {
    pub state: AppState,
    pub files: Arc<FakeFileRepository>,
    pub users: Arc<FakeUserRepository>,
    pub auth: Arc<FakeAuthService>,
    pub cookies: Arc<InMemoryCookieRepository>,
}

pub fn harness(files: FakeFileRepository) -> Harness {
    let files = Arc::new(files);
    let users = Arc::new(FakeUserRepository::default());
    let auth = Arc::new(FakeAuthService::default());
    let cookies = Arc::new(InMemoryCookieRepository::new(false));
    let state = AppState::from_parts(
        cookies.clone(),
        files.clone(),
        users.clone(),
        Arc::new(FakeAdminRepository::default()),
        auth.clone(),
    );
    Harness {
        state,
        files,
        users,
        auth,
        cookies,
    }
}
