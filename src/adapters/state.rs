use std::sync::Arc;

use crate::{
    adapters::repositories::JsonCookieRepository,
    application::{
        error::ApplicationError,
        repositories::{
            admin_repository::AdminRepository, cookie_repository::CookieRepository,
            file_repository::FileRepository, user_repository::UserRepository,
        },
        services::AuthService,
        usecases::{
            auth_session::AuthSessionUseCase, get_user_files::GetUserFilesUseCase,
            manage_anonymous_session::ManageAnonymousSessionUseCase,
            upload_file::UploadFileUseCase,
        },
    },
    domain::config::client::ClientConfig,
    services::{
        AdminApiRepository, ApiClient, FileApiRepository, SupabaseAuthService, UserApiRepository,
    },
};

/// Ports and use cases shared by the controllers.
#[derive(Clone)]
pub struct AppState {
    pub file_repository: Arc<dyn FileRepository>,
    pub admin_repository: Arc<dyn AdminRepository>,
    pub anonymous_session: Arc<ManageAnonymousSessionUseCase>,
    pub upload_file: Arc<UploadFileUseCase>,
    pub get_user_files: Arc<GetUserFilesUseCase>,
    pub auth_session: Arc<AuthSessionUseCase>,
}

impl AppState {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApplicationError> {
        let cookies: Arc<dyn CookieRepository> = Arc::new(JsonCookieRepository::new(
            config.cookie_jar.clone(),
            config.is_secure(),
        ));
        let api = ApiClient::new(&config.api_base_url)?.with_cookies(cookies.clone());
        let auth_service = SupabaseAuthService::new(
            &config.supabase,
            &config.app_url,
            cookies.clone(),
        )?;

        Ok(Self::from_parts(
            cookies,
            Arc::new(FileApiRepository::new(api.clone())),
            Arc::new(UserApiRepository::new(api.clone())),
            Arc::new(AdminApiRepository::new(api, config.vk_secret.clone())),
            Arc::new(auth_service),
        ))
    }

    pub fn from_parts(
        cookies: Arc<dyn CookieRepository>,
        file_repository: Arc<dyn FileRepository>,
        user_repository: Arc<dyn UserRepository>,
        admin_repository: Arc<dyn AdminRepository>,
        auth_service: Arc<dyn AuthService>,
    ) -> Self {
        let anonymous_session = Arc::new(ManageAnonymousSessionUseCase::new(cookies));
        let auth_session = Arc::new(AuthSessionUseCase::new(
            auth_service,
            user_repository,
            anonymous_session.clone(),
        ));

        Self {
            upload_file: Arc::new(UploadFileUseCase::new(file_repository.clone())),
            get_user_files: Arc::new(GetUserFilesUseCase::new(file_repository.clone())),
            file_repository,
            admin_repository,
            anonymous_session,
            auth_session,
        }
    }
}
