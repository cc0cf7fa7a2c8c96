use tracing::info;

use crate::{adapters::state::AppState, application::error::ApplicationError};

pub struct HealthController;

impl HealthController {
    /// Load balancer summary followed by one line per backend.
    pub async fn health_check(state: &AppState) -> Result<String, ApplicationError> {
        info!("Health check requested");
        let health = state.admin_repository.check_health().await?;

        let mut lines = vec![format!(
            "Load balancer: {} ({}/{} backends healthy)",
            health.load_balancer, health.healthy_backends, health.total_backends
        )];
        lines.extend(health.backends.iter().map(|backend| {
            let status = if backend.is_healthy {
                "healthy".to_string()
            } else {
                format!("down, {} consecutive failures", backend.consecutive_failures)
            };
            format!(
                "{}  {}  {}  {}  {}",
                backend.server_id, backend.server_name, backend.provider, backend.server_url, status
            )
        }));

        Ok(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{harness, FakeFileRepository};

    #[tokio::test]
    async fn test_health_report() {
        let h = harness(FakeFileRepository::default());

        let out = HealthController::health_check(&h.state).await.unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Load balancer: degraded (1/2 backends healthy)");
        assert_eq!(
            lines[1],
            "vk-1  vk-1-name  supabase  https://vk-1.example  healthy"
        );
        assert_eq!(
            lines[2],
            "vk-2  vk-2-name  gdrive  https://vk-2.example  down, 3 consecutive failures"
        );
    }
}
