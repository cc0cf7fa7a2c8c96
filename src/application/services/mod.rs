pub mod auth_service;

pub use auth_service::{AuthListeners, AuthService, AuthStateCallback, AuthSubscription, AuthUser};
