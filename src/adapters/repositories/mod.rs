mod json_cookie_repository;
mod memory_cookie_repository;

pub use json_cookie_repository::JsonCookieRepository;
pub use memory_cookie_repository::InMemoryCookieRepository;
