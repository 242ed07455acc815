//! Step 2: create the Artifact Registry repository.

use crate::clients::Clients;
use crate::config::DeployConfig;
use crate::error::ProvisionResult;
use crate::services::EnabledServices;
use google_cloud_artifactregistry_v1::model::{repository, Repository};
use google_cloud_lro::Poller;
use tracing::info;

/// Handle for the created repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    /// Full resource name:
    /// `projects/<project>/locations/<region>/repositories/<repo>`
    pub name: String,
}

impl RepositoryHandle {
    /// The resource name, or a fail-fast error when the handle is empty
    pub fn require(&self) -> ProvisionResult<&str> {
        if self.name.is_empty() {
            return Err(crate::error::ProvisionError::missing_dependency(
                "Artifact repository handle is missing",
            ));
        }
        Ok(&self.name)
    }
}

/// Create the Docker-format repository the image is pushed into.
///
/// Requires the Artifact Registry API enablement from step 1.
pub async fn create_repository(
    clients: &Clients,
    config: &DeployConfig,
    enabled: &EnabledServices,
) -> ProvisionResult<RepositoryHandle> {
    enabled.artifact_registry()?;

    let parent = format!(
        "projects/{}/locations/{}",
        config.project_id, config.region
    );
    info!(repository = %config.repository_id, %parent, "creating artifact repository");

    let created = clients
        .artifact_registry
        .create_repository()
        .set_parent(&parent)
        .set_repository_id(&config.repository_id)
        .set_repository(
            Repository::new()
                .set_format(repository::Format::Docker)
                .set_description(format!(
                    "Container images for the {} service",
                    config.service_id
                )),
        )
        .poller()
        .until_done()
        .await?;

    info!(name = %created.name, "artifact repository ready");
    Ok(RepositoryHandle { name: created.name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProvisionError;

    #[test]
    fn test_populated_handle_is_accepted() {
        let handle = RepositoryHandle {
            name: "projects/p/locations/us-east1/repositories/repo".to_string(),
        };
        assert_eq!(
            handle.require().unwrap(),
            "projects/p/locations/us-east1/repositories/repo"
        );
    }

    #[test]
    fn test_empty_handle_fails_fast() {
        let handle = RepositoryHandle {
            name: String::new(),
        };
        assert!(matches!(
            handle.require(),
            Err(ProvisionError::MissingDependency { .. })
        ));
    }
}
