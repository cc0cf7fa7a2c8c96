use async_trait::async_trait;

use crate::{
    application::{dto::user_dto::UserUpdateDTO, error::ApplicationError},
    domain::models::user::UserInfo,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates the backend record for an identity-provider user.
    async fn create_user(&self, uid: &str) -> Result<UserInfo, ApplicationError>;
    async fn get_user_info(&self, uid: &str) -> Result<UserInfo, ApplicationError>;
    async fn update_user(
        &self,
        uid: &str,
        updates: UserUpdateDTO,
    ) -> Result<UserInfo, ApplicationError>;
    async fn delete_user(&self, uid: &str) -> Result<(), ApplicationError>;
}
