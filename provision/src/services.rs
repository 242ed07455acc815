//! Step 1: enable the required API surfaces.

use crate::clients::Clients;
use crate::config::DeployConfig;
use crate::error::{ProvisionError, ProvisionResult};
use google_cloud_lro::Poller;
use tracing::info;

/// Resource Manager must be enabled before other services can be toggled
pub const RESOURCE_MANAGER_API: &str = "cloudresourcemanager.googleapis.com";
/// Cloud Run Admin API
pub const CLOUD_RUN_API: &str = "run.googleapis.com";
/// Artifact Registry API
pub const ARTIFACT_REGISTRY_API: &str = "artifactregistry.googleapis.com";

/// Record of one enabled API surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEnablement {
    /// Service Usage resource name:
    /// `projects/<project>/services/<service>`
    pub name: String,
}

/// The enablement records later steps depend on
#[derive(Debug, Clone)]
pub struct EnabledServices {
    pub cloud_run: ServiceEnablement,
    pub artifact_registry: ServiceEnablement,
}

impl EnabledServices {
    /// The Cloud Run enablement, or a fail-fast error when it is missing
    pub fn cloud_run(&self) -> ProvisionResult<&ServiceEnablement> {
        if self.cloud_run.name.is_empty() {
            return Err(ProvisionError::missing_dependency(
                "Cloud Run service enablement is missing",
            ));
        }
        Ok(&self.cloud_run)
    }

    /// The Artifact Registry enablement, or a fail-fast error when it is
    /// missing
    pub fn artifact_registry(&self) -> ProvisionResult<&ServiceEnablement> {
        if self.artifact_registry.name.is_empty() {
            return Err(ProvisionError::missing_dependency(
                "Artifact Registry service enablement is missing",
            ));
        }
        Ok(&self.artifact_registry)
    }
}

/// Enable the API surfaces the pipeline needs.
///
/// Resource Manager is enabled first; Cloud Run and Artifact Registry are
/// only enabled after that completes. Each enablement is a long-running
/// operation polled to completion by the SDK.
pub async fn enable_services(
    clients: &Clients,
    config: &DeployConfig,
) -> ProvisionResult<EnabledServices> {
    config
        .validate()
        .map_err(ProvisionError::invalid_config)?;

    enable_service(clients, config, RESOURCE_MANAGER_API).await?;

    let cloud_run = enable_service(clients, config, CLOUD_RUN_API).await?;
    let artifact_registry = enable_service(clients, config, ARTIFACT_REGISTRY_API).await?;

    Ok(EnabledServices {
        cloud_run,
        artifact_registry,
    })
}

async fn enable_service(
    clients: &Clients,
    config: &DeployConfig,
    service: &str,
) -> ProvisionResult<ServiceEnablement> {
    let name = format!("projects/{}/services/{}", config.project_id, service);
    info!(service, "enabling service");

    clients
        .service_usage
        .enable_service()
        .set_name(&name)
        .poller()
        .until_done()
        .await?;

    info!(service, "service enabled");
    Ok(ServiceEnablement { name })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(run: &str, registry: &str) -> EnabledServices {
        EnabledServices {
            cloud_run: ServiceEnablement {
                name: run.to_string(),
            },
            artifact_registry: ServiceEnablement {
                name: registry.to_string(),
            },
        }
    }

    #[test]
    fn test_accessors_pass_through_populated_handles() {
        let services = enabled(
            "projects/p/services/run.googleapis.com",
            "projects/p/services/artifactregistry.googleapis.com",
        );
        assert!(services.cloud_run().is_ok());
        assert!(services.artifact_registry().is_ok());
    }

    #[test]
    fn test_missing_cloud_run_enablement_fails_fast() {
        let services = enabled("", "projects/p/services/artifactregistry.googleapis.com");
        assert!(matches!(
            services.cloud_run(),
            Err(ProvisionError::MissingDependency { .. })
        ));
    }

    #[test]
    fn test_missing_artifact_registry_enablement_fails_fast() {
        let services = enabled("projects/p/services/run.googleapis.com", "");
        assert!(matches!(
            services.artifact_registry(),
            Err(ProvisionError::MissingDependency { .. })
        ));
    }
}
