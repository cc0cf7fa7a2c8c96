use async_trait::async_trait;

use crate::{
    application::{dto::instance_dto::InstanceUpdateDTO, error::ApplicationError},
    domain::models::instance::{HealthCheckResponse, InstanceInfo},
};

/// Admin surface of the service. Every call carries the admin secret.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn get_all_instances(&self) -> Result<Vec<InstanceInfo>, ApplicationError>;
    async fn get_instance(&self, server_id: &str) -> Result<InstanceInfo, ApplicationError>;
    async fn check_health(&self) -> Result<HealthCheckResponse, ApplicationError>;
    async fn update_instance(
        &self,
        server_id: &str,
        updates: InstanceUpdateDTO,
    ) -> Result<InstanceInfo, ApplicationError>;
}
