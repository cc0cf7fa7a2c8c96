pub mod file_dto;
pub mod instance_dto;
pub mod user_dto;
