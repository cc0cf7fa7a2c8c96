use async_trait::async_trait;

use crate::{
    application::{dto::file_dto::FileUpdateDTO, error::ApplicationError},
    domain::models::{
        file::{File, FileData},
        upload::{ProgressCallback, SubmitOptions, UploadResult, UploadToken},
    },
};

#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Requests a single-use upload token, bound to `user_id` when given.
    async fn get_upload_token(&self, user_id: Option<&str>)
        -> Result<UploadToken, ApplicationError>;

    /// Submits the payload. Progress, when requested, is reported as a
    /// percentage while the body is being sent.
    async fn upload_file(
        &self,
        file: &FileData,
        token: &str,
        options: SubmitOptions,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadResult, ApplicationError>;

    async fn get_file_info(&self, file_id: &str) -> Result<File, ApplicationError>;
    async fn get_user_files(&self, user_id: &str) -> Result<Vec<String>, ApplicationError>;
    async fn update_file(
        &self,
        file_id: &str,
        updates: FileUpdateDTO,
    ) -> Result<File, ApplicationError>;
    async fn delete_file(&self, file_id: &str) -> Result<(), ApplicationError>;

    /// Absolute URL of the file content endpoint.
    fn get_download_url(&self, file_id: &str) -> String;

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, ApplicationError>;
}
