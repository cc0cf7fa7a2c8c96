use tracing::info;

use crate::{
    adapters::state::AppState,
    application::{dto::instance_dto::InstanceUpdateDTO, error::ApplicationError},
    domain::models::instance::{InstanceInfo, InstanceStatus},
};

pub struct InstanceController;

impl InstanceController {
    pub async fn get_all_instances(state: &AppState) -> Result<String, ApplicationError> {
        info!("Getting all instances");
        let instances = state.admin_repository.get_all_instances().await?;
        if instances.is_empty() {
            return Ok("No instances registered".to_string());
        }

        let online = instances
            .iter()
            .filter(|i| i.status == InstanceStatus::Online)
            .count();
        let mut lines = vec![format!("{} instances, {} online", instances.len(), online)];
        lines.extend(instances.iter().map(summary_line));
        Ok(lines.join("\n"))
    }

    pub async fn get_instance(state: &AppState, server_id: &str) -> Result<String, ApplicationError> {
        info!("Getting instance {}", server_id);
        let instance = state.admin_repository.get_instance(server_id).await?;
        Ok(details(&instance))
    }

    pub async fn update_instance(
        state: &AppState,
        server_id: &str,
        updates: InstanceUpdateDTO,
    ) -> Result<String, ApplicationError> {
        if updates.is_empty() {
            return Err(ApplicationError::Validation(
                "Nothing to update: pass --provider, --name or --url".to_string(),
            ));
        }

        info!("Updating instance {}", server_id);
        let instance = state
            .admin_repository
            .update_instance(server_id, updates)
            .await?;
        Ok(format!("Instance updated\n{}", details(&instance)))
    }
}

fn summary_line(instance: &InstanceInfo) -> String {
    format!(
        "{}  {}  {}  {}  {}",
        instance.server_id,
        instance.server_name.as_deref().unwrap_or("-"),
        instance.provider,
        instance.server_url.as_deref().unwrap_or("-"),
        instance.status
    )
}

fn details(instance: &InstanceInfo) -> String {
    [
        format!("id:       {}", instance.server_id),
        format!("name:     {}", instance.server_name.as_deref().unwrap_or("-")),
        format!("provider: {}", instance.provider),
        format!("url:      {}", instance.server_url.as_deref().unwrap_or("-")),
        format!("status:   {}", instance.status),
    ]
    .join("\n")
}
