pub mod auth_session;
pub mod get_user_files;
pub mod manage_anonymous_session;
pub mod upload_file;
