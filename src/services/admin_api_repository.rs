use async_trait::async_trait;
use futures_util::future::try_join_all;
use reqwest::{Method, RequestBuilder};
use tracing::{info, warn};

use crate::{
    adapters::dto::instance_dto::InstanceConfigResponse,
    application::{
        dto::instance_dto::InstanceUpdateDTO, error::ApplicationError,
        repositories::admin_repository::AdminRepository,
    },
    domain::models::instance::{HealthCheckResponse, InstanceInfo},
    services::api_client::ApiClient,
};

const ADMIN_SECRET_HEADER: &str = "X-KV-SECRET";

pub struct AdminApiRepository {
    api: ApiClient,
    secret: String,
}

impl AdminApiRepository {
    pub fn new(api: ApiClient, secret: impl Into<String>) -> Self {
        Self {
            api,
            secret: secret.into(),
        }
    }

    fn admin_request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.api
            .request(method, segments)
            .header(ADMIN_SECRET_HEADER, &self.secret)
    }

    async fn fetch_config(&self, server_id: &str) -> Result<InstanceInfo, ApplicationError> {
        let request = self.admin_request(Method::GET, &["instances", server_id]);
        let config: InstanceConfigResponse = self.api.send_json(request).await?;
        Ok(config.into_instance(server_id))
    }

    /// Health is best effort: an unreachable load balancer leaves every
    /// instance `Unknown` instead of failing the listing.
    async fn apply_health(&self, instances: &mut [InstanceInfo]) {
        match self.check_health().await {
            Ok(health) => {
                for instance in instances.iter_mut() {
                    instance.status = health.status_of(&instance.server_id);
                }
            }
            Err(e) => warn!("Health check failed, instance status unknown: {}", e),
        }
    }
}

#[async_trait]
impl AdminRepository for AdminApiRepository {
    async fn get_all_instances(&self) -> Result<Vec<InstanceInfo>, ApplicationError> {
        let request = self.admin_request(Method::GET, &["instances"]);
        let ids: Vec<String> = self.api.send_json(request).await?;

        let mut instances = try_join_all(ids.iter().map(|id| self.fetch_config(id))).await?;
        self.apply_health(&mut instances).await;
        Ok(instances)
    }

    async fn get_instance(&self, server_id: &str) -> Result<InstanceInfo, ApplicationError> {
        let mut instance = self.fetch_config(server_id).await?;
        self.apply_health(std::slice::from_mut(&mut instance)).await;
        Ok(instance)
    }

    async fn check_health(&self) -> Result<HealthCheckResponse, ApplicationError> {
        let request = self.admin_request(Method::GET, &["health"]);
        Ok(self.api.send_json(request).await?)
    }

    async fn update_instance(
        &self,
        server_id: &str,
        updates: InstanceUpdateDTO,
    ) -> Result<InstanceInfo, ApplicationError> {
        if updates.is_empty() {
            return Err(ApplicationError::Validation(
                "Nothing to update".to_string(),
            ));
        }

        let request = self
            .admin_request(Method::PATCH, &["instances", server_id])
            .json(&updates);
        let config: InstanceConfigResponse = self.api.send_json(request).await?;
        info!("Updated instance {}", server_id);

        let mut instance = config.into_instance(server_id);
        self.apply_health(std::slice::from_mut(&mut instance)).await;
        Ok(instance)
    }
}
