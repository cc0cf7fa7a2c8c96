use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::{
    adapters::state::AppState,
    application::{
        dto::file_dto::FileUpdateDTO, error::ApplicationError, services::AuthUser,
    },
    domain::models::{file::File, user::UserStats},
};

pub struct FileController;

impl FileController {
    /// Dashboard: quota, per-provider counts and the signed-in user's files.
    pub async fn list(state: &AppState) -> Result<String, ApplicationError> {
        let user = Self::require_user(state).await?;
        let profile = state.auth_session.profile(&user).await?;
        let files = state.get_user_files.execute(&user.id).await?;
        let stats = UserStats::from_files(&files);
        info!("Listed {} files for {}", files.len(), user.id);

        let mut out = vec![
            format!("{} ({})", profile.email, profile.id),
            format!(
                "Storage: {} MB used of {} GB ({:.1}%), {} MB available",
                profile.used_space_in_mb(),
                profile.total_space_in_gb(),
                profile.used_space_percentage(),
                profile.available_space_in_mb()
            ),
            format!(
                "Files: {} (supabase {}, gdrive {}), last upload: {}",
                stats.file_count,
                stats.supabase_files,
                stats.gdrive_files,
                stats.last_upload_label(Utc::now())
            ),
        ];

        if files.is_empty() {
            out.push("No files yet".to_string());
        } else {
            out.push(String::new());
            out.extend(files.iter().map(|file| {
                format!(
                    "{}  {}  {} MB  {}  {}",
                    file.id,
                    file.name,
                    file.size_in_mb(),
                    file.formatted_date(),
                    file.provider
                )
            }));
        }

        Ok(out.join("\n"))
    }

    pub async fn info(state: &AppState, file_id: &str) -> Result<String, ApplicationError> {
        let file = state.file_repository.get_file_info(file_id).await?;
        Ok(Self::describe_file(state, &file))
    }

    pub async fn rename(
        state: &AppState,
        file_id: &str,
        name: String,
    ) -> Result<String, ApplicationError> {
        if name.trim().is_empty() {
            return Err(ApplicationError::Validation(
                "File name cannot be empty".to_string(),
            ));
        }

        let updates = FileUpdateDTO {
            file_name: Some(name),
            description: None,
        };
        let file = state.file_repository.update_file(file_id, updates).await?;
        info!("Renamed file {} to {}", file.id, file.name);
        Ok(format!("Renamed {} to {}", file.id, file.name))
    }

    pub async fn describe(
        state: &AppState,
        file_id: &str,
        description: String,
    ) -> Result<String, ApplicationError> {
        let updates = FileUpdateDTO {
            file_name: None,
            description: Some(description),
        };
        let file = state.file_repository.update_file(file_id, updates).await?;
        Ok(format!("Updated description of {}", file.id))
    }

    pub async fn delete(state: &AppState, file_id: &str) -> Result<String, ApplicationError> {
        state.file_repository.delete_file(file_id).await?;
        Ok(format!("Deleted {}", file_id))
    }

    /// Saves the file content to `output`, or to the stored file name in the
    /// working directory.
    pub async fn download(
        state: &AppState,
        file_id: &str,
        output: Option<PathBuf>,
    ) -> Result<String, ApplicationError> {
        let target = match output {
            Some(path) => path,
            None => {
                let file = state.file_repository.get_file_info(file_id).await?;
                PathBuf::from(sanitize_file_name(&file.name))
            }
        };

        let content = state.file_repository.download_file(file_id).await?;
        tokio::fs::write(&target, &content).await.map_err(|e| {
            ApplicationError::Storage(format!("Cannot write {}: {}", target.display(), e))
        })?;

        Ok(format!("Saved {} bytes to {}", content.len(), target.display()))
    }

    async fn require_user(state: &AppState) -> Result<AuthUser, ApplicationError> {
        state
            .auth_session
            .current_user()
            .await?
            .ok_or_else(|| ApplicationError::Auth("Sign in to see your files".to_string()))
    }

    fn describe_file(state: &AppState, file: &File) -> String {
        let mut lines = vec![
            format!("id:          {}", file.id),
            format!("name:        {}", file.name),
            format!("size:        {} MB ({} bytes)", file.size_in_mb(), file.size),
            format!("type:        {}", file.mime_type),
            format!("uploaded:    {}", file.formatted_date()),
            format!("provider:    {}", file.provider),
            format!(
                "owner:       {}",
                file.user_id.as_deref().unwrap_or("anonymous")
            ),
        ];
        if let Some(description) = &file.description {
            lines.push(format!("description: {}", description));
        }
        if let Some(count) = file.download_count {
            lines.push(format!("downloads:   {}", count));
        }
        if let Some(delete_at) = file.delete_at {
            lines.push(format!("expires:     {}", delete_at.format("%Y-%m-%d %H:%M")));
        }
        lines.push(format!("page:        {}", file.download_url()));
        lines.push(format!(
            "content:     {}",
            state.file_repository.get_download_url(&file.id)
        ));
        lines.join("\n")
    }
}

/// Stored names may carry a path prefix; only the last component is used.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match base {
        "" | "." | ".." => "download".to_string(),
        other => other.to_string(),
    }
}
