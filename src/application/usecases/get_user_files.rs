use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::info;

use crate::{
    application::{error::ApplicationError, repositories::file_repository::FileRepository},
    domain::models::file::File,
};

pub struct GetUserFilesUseCase {
    file_repository: Arc<dyn FileRepository>,
}

impl GetUserFilesUseCase {
    pub fn new(file_repository: Arc<dyn FileRepository>) -> Self {
        Self { file_repository }
    }

    /// Lists a user's files with full metadata, in the order the service
    /// returns their ids.
    pub async fn execute(&self, user_id: &str) -> Result<Vec<File>, ApplicationError> {
        if user_id.trim().is_empty() {
            return Err(ApplicationError::Validation(
                "User ID is required".to_string(),
            ));
        }

        let file_ids = self.file_repository.get_user_files(user_id).await?;
        info!("Fetching metadata for {} files of {}", file_ids.len(), user_id);

        try_join_all(
            file_ids
                .iter()
                .map(|file_id| self.file_repository.get_file_info(file_id)),
        )
        .await
    }
}
