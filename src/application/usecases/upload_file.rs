use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    application::{error::ApplicationError, repositories::file_repository::FileRepository},
    domain::models::{
        file::FileData,
        upload::{SubmitOptions, UploadOptions, UploadResult, UploadState},
    },
};

/// Token acquisition followed by the upload itself.
///
/// Failures from either step are returned unchanged. Tokens are never cached:
/// every call asks for a fresh one.
pub struct UploadFileUseCase {
    file_repository: Arc<dyn FileRepository>,
}

impl UploadFileUseCase {
    pub fn new(file_repository: Arc<dyn FileRepository>) -> Self {
        Self { file_repository }
    }

    pub async fn execute(
        &self,
        file: &FileData,
        options: UploadOptions,
    ) -> Result<UploadResult, ApplicationError> {
        if file.is_empty() {
            warn!("Rejected empty upload: {}", file.filename);
            return Err(ApplicationError::Validation("File is empty".to_string()));
        }

        debug!(state = ?UploadState::AwaitingToken, "Requesting upload token");
        let token = self
            .file_repository
            .get_upload_token(options.user_id.as_deref())
            .await
            .inspect_err(|e| warn!(state = ?UploadState::Failed, "Token request failed: {}", e))?;

        debug!(
            state = ?UploadState::Uploading,
            "Uploading {} ({} bytes), token expires at {}",
            file.filename,
            file.size(),
            token.expires_at
        );
        let submit = SubmitOptions {
            description: options.description,
            user_id: options.user_id,
        };
        let result = self
            .file_repository
            .upload_file(file, &token.token, submit, options.on_progress.clone())
            .await
            .inspect_err(|e| warn!(state = ?UploadState::Failed, "Upload failed: {}", e))?;

        if let Some(on_progress) = &options.on_progress {
            on_progress(100.0);
        }

        info!(
            state = ?UploadState::Succeeded,
            "Uploaded {} as {}", file.filename, result.file_id
        );
        Ok(result)
    }
}
