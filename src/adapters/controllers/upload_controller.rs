use std::path::Path;

use tracing::{info, warn};

use crate::{
    adapters::state::AppState,
    application::error::ApplicationError,
    domain::models::{
        file::FileData,
        upload::{ProgressCallback, UploadOptions},
    },
};

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

pub struct UploadController;

impl UploadController {
    /// Uploads `path` as the signed-in user, or anonymously when nobody is
    /// signed in.
    pub async fn upload(
        state: &AppState,
        path: &Path,
        description: Option<String>,
        mime_type: Option<String>,
        on_progress: Option<ProgressCallback>,
    ) -> Result<String, ApplicationError> {
        let content = tokio::fs::read(path).await.map_err(|e| {
            ApplicationError::Validation(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ApplicationError::Validation(format!("Invalid file name: {}", path.display()))
            })?
            .to_string();
        let mime_type = mime_type.unwrap_or_else(|| guess_mime_type(&filename).to_string());
        let file = FileData::new(content, filename, mime_type);

        let mut options = match state.auth_session.current_user().await? {
            Some(user) => {
                match state.auth_session.profile(&user).await {
                    Ok(profile) if !profile.can_upload(file.size()) => {
                        return Err(ApplicationError::Validation(format!(
                            "Not enough space: {} MB available",
                            profile.available_space_in_mb()
                        )));
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Quota check skipped for {}: {}", user.id, e),
                }
                info!("Uploading {} as {}", file.filename, user.email);
                UploadOptions::for_user(user.id)
            }
            None => {
                info!("Uploading {} anonymously", file.filename);
                UploadOptions::anonymous()
            }
        };
        if let Some(description) = description.filter(|d| !d.trim().is_empty()) {
            options = options.with_description(description);
        }
        if let Some(on_progress) = on_progress {
            options = options.with_progress(on_progress);
        }

        let result = state.upload_file.execute(&file, options).await?;

        Ok(format!(
            "fileId: {}\ndownloadUrl: {}\ncontent: {}",
            result.file_id,
            result.download_url,
            state.file_repository.get_download_url(&result.file_id)
        ))
    }
}

fn guess_mime_type(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("txt") | Some("log") => "text/plain",
        Some("md") => "text/markdown",
        Some("csv") => "text/csv",
        Some("html") | Some("htm") => "text/html",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => DEFAULT_MIME_TYPE,
    }
}
