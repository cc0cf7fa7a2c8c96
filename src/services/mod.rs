mod admin_api_repository;
mod api_client;
mod error;
mod file_api_repository;
mod supabase_auth_service;
mod user_api_repository;

pub use admin_api_repository::AdminApiRepository;
pub use api_client::ApiClient;
pub use error::RemoteError;
pub use file_api_repository::FileApiRepository;
pub use supabase_auth_service::{SupabaseAuthService, AUTH_SESSION_COOKIE_NAME};
pub use user_api_repository::UserApiRepository;
