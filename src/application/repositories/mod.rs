pub mod admin_repository;
pub mod cookie_repository;
pub mod file_repository;
pub mod user_repository;
