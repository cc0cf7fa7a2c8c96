pub mod anonymous_key;
pub mod file;
pub mod instance;
pub mod upload;
pub mod user;
