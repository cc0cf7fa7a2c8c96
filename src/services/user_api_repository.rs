use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use crate::{
    adapters::dto::user_dto::{CreateUserRequest, UpdateUserRequest},
    application::{
        dto::user_dto::UserUpdateDTO, error::ApplicationError,
        repositories::user_repository::UserRepository,
    },
    domain::models::user::UserInfo,
    services::api_client::ApiClient,
};

pub struct UserApiRepository {
    api: ApiClient,
}

impl UserApiRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl UserRepository for UserApiRepository {
    async fn create_user(&self, uid: &str) -> Result<UserInfo, ApplicationError> {
        let request = self
            .api
            .request(Method::POST, &["users"])
            .json(&CreateUserRequest { uid });
        let user: UserInfo = self.api.send_json(request).await?;
        info!("Created backend user {}", user.uid);
        Ok(user)
    }

    async fn get_user_info(&self, uid: &str) -> Result<UserInfo, ApplicationError> {
        let request = self.api.request(Method::GET, &["users", uid]);
        Ok(self.api.send_json(request).await?)
    }

    async fn update_user(
        &self,
        uid: &str,
        updates: UserUpdateDTO,
    ) -> Result<UserInfo, ApplicationError> {
        let request = self
            .api
            .request(Method::PATCH, &["users", uid])
            .json(&UpdateUserRequest { uid, updates });
        Ok(self.api.send_json(request).await?)
    }

    async fn delete_user(&self, uid: &str) -> Result<(), ApplicationError> {
        let request = self.api.request(Method::DELETE, &["users", uid]);
        self.api.send_empty(request).await?;
        info!("Deleted backend user {}", uid);
        Ok(())
    }
}
