use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures_util::stream;
use reqwest::{multipart, Body, Method};
use tracing::info;

use crate::{
    adapters::dto::{
        file_dto::{FileResponse, UploadFileResponse},
        token_dto::{GenerateTokenRequest, TokenResponse},
    },
    application::{
        dto::file_dto::FileUpdateDTO, error::ApplicationError,
        repositories::file_repository::FileRepository,
    },
    domain::models::{
        file::{File, FileData},
        upload::{FileKind, ProgressCallback, SubmitOptions, UploadResult, UploadToken},
    },
    services::{api_client::ApiClient, error::RemoteError},
};

const UPLOAD_TOKEN_HEADER: &str = "X-Upload-Token";
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

pub struct FileApiRepository {
    api: ApiClient,
}

impl FileApiRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Body that reports `sent / total * 100` as each chunk is handed to the
    /// connection.
    fn progress_body(content: &[u8], on_progress: Option<ProgressCallback>) -> Body {
        let total = content.len() as u64;
        let payload = Bytes::copy_from_slice(content);
        let chunks: Vec<Bytes> = (0..payload.len())
            .step_by(UPLOAD_CHUNK_SIZE)
            .map(|start| payload.slice(start..(start + UPLOAD_CHUNK_SIZE).min(payload.len())))
            .collect();

        let mut sent = 0u64;
        let chunks = stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            if let Some(on_progress) = &on_progress {
                on_progress(sent as f64 / total as f64 * 100.0);
            }
            Ok::<Bytes, std::io::Error>(chunk)
        }));

        Body::wrap_stream(chunks)
    }
}

#[async_trait]
impl FileRepository for FileApiRepository {
    async fn get_upload_token(
        &self,
        user_id: Option<&str>,
    ) -> Result<UploadToken, ApplicationError> {
        let request = self
            .api
            .request(Method::POST, &["files", "token"])
            .json(&GenerateTokenRequest { user_id });

        let response: TokenResponse = self.api.send_json(request).await?;
        info!("Upload token acquired, valid for {}s", response.expires_in);

        let expires_at = response.expires_at(Utc::now()).ok_or_else(|| {
            RemoteError::InvalidResponse(format!(
                "Upload token lifetime out of range: {}s",
                response.expires_in
            ))
        })?;

        Ok(UploadToken {
            token: response.token,
            expires_at,
        })
    }

    async fn upload_file(
        &self,
        file: &FileData,
        token: &str,
        options: SubmitOptions,
        on_progress: Option<ProgressCallback>,
    ) -> Result<UploadResult, ApplicationError> {
        let file_part = multipart::Part::stream_with_length(
            Self::progress_body(&file.content, on_progress),
            file.size(),
        )
        .file_name(file.filename.clone())
        .mime_str(&file.mime_type)
        .map_err(|e| ApplicationError::Validation(format!("Invalid MIME type: {}", e)))?;

        let kind = FileKind::for_user(options.user_id.as_deref());
        let mut form = multipart::Form::new()
            .part("file", file_part)
            .text("filename", file.filename.clone())
            .text("mime_type", file.mime_type.clone())
            .text("type", kind.as_str());
        if let Some(user_id) = options.user_id {
            form = form.text("user_id", user_id);
        }
        if let Some(description) = options.description {
            form = form.text("description", description);
        }

        let request = self
            .api
            .request(Method::POST, &["files"])
            .header(UPLOAD_TOKEN_HEADER, token)
            .multipart(form);

        let response: UploadFileResponse = self.api.send_json(request).await?;
        info!(
            "Stored {} as {} ({} bytes)",
            response.filename.as_deref().unwrap_or(&file.filename),
            response.file_id,
            response.size
        );

        Ok(UploadResult::for_file(response.file_id))
    }

    async fn get_file_info(&self, file_id: &str) -> Result<File, ApplicationError> {
        let request = self.api.request(Method::GET, &["files", file_id]);
        let response: FileResponse = self.api.send_json(request).await?;
        Ok(File::from(response))
    }

    async fn get_user_files(&self, user_id: &str) -> Result<Vec<String>, ApplicationError> {
        let request = self.api.request(Method::GET, &["users", user_id, "files"]);
        Ok(self.api.send_json(request).await?)
    }

    async fn update_file(
        &self,
        file_id: &str,
        updates: FileUpdateDTO,
    ) -> Result<File, ApplicationError> {
        if updates.is_empty() {
            return Err(ApplicationError::Validation(
                "Nothing to update".to_string(),
            ));
        }

        let request = self
            .api
            .request(Method::PATCH, &["files", file_id])
            .json(&updates);
        let response: FileResponse = self.api.send_json(request).await?;
        Ok(File::from(response))
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), ApplicationError> {
        let request = self.api.request(Method::DELETE, &["files", file_id]);
        self.api.send_empty(request).await?;
        info!("Deleted file {}", file_id);
        Ok(())
    }

    fn get_download_url(&self, file_id: &str) -> String {
        self.api.endpoint(&["files", file_id, "content"]).to_string()
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, ApplicationError> {
        let request = self
            .api
            .request(Method::GET, &["files", file_id, "content"]);
        Ok(self.api.send_bytes(request).await?)
    }
}
