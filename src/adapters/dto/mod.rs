pub mod auth_dto;
pub mod cookie_dto;
pub mod file_dto;
pub mod instance_dto;
pub mod token_dto;
pub mod user_dto;
