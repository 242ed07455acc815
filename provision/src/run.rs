//! Step 4: deploy to Cloud Run and grant public invocation.

use crate::clients::Clients;
use crate::config::DeployConfig;
use crate::error::{ProvisionError, ProvisionResult};
use crate::services::EnabledServices;
use google_cloud_iam_v1::model::{Binding, Policy};
use google_cloud_lro::Poller;
use google_cloud_run_v2::model::{Container, ResourceRequirements, RevisionTemplate, Service};
use image_builder::ImageReference;
use tracing::info;

/// Role granting permission to invoke a Cloud Run service
const INVOKER_ROLE: &str = "roles/run.invoker";
/// IAM member matching any caller, authenticated or not
const ALL_USERS: &str = "allUsers";

/// The deployed Cloud Run service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedService {
    /// Full resource name:
    /// `projects/<project>/locations/<region>/services/<service>`
    pub name: String,
    /// Public URL of the service
    pub url: String,
}

/// Deploy the pushed image as a Cloud Run service, then open it to
/// unauthenticated invocation.
///
/// Requires the Cloud Run API enablement from step 1 and the pushed image
/// from step 3. Returns the service URL, the pipeline's one exported value.
pub async fn deploy_service(
    clients: &Clients,
    config: &DeployConfig,
    enabled: &EnabledServices,
    image: &ImageReference,
) -> ProvisionResult<DeployedService> {
    enabled.cloud_run()?;
    require_pushed_image(image)?;

    let parent = format!(
        "projects/{}/locations/{}",
        config.project_id, config.region
    );
    let image_url = image.to_string();
    info!(service = %config.service_id, image = %image_url, "deploying to Cloud Run");

    let service = Service::new().set_template(
        RevisionTemplate::new().set_containers([Container::new()
            .set_image(&image_url)
            .set_resources(
                ResourceRequirements::new()
                    .set_limits([("memory", config.memory_limit.as_str())]),
            )]),
    );

    let created = clients
        .run
        .create_service()
        .set_parent(&parent)
        .set_service_id(&config.service_id)
        .set_service(service)
        .poller()
        .until_done()
        .await?;

    allow_unauthenticated(clients, &created.name).await?;

    if created.uri.is_empty() {
        return Err(ProvisionError::MissingUrl {
            service: created.name,
        });
    }

    info!(url = %created.uri, "service deployed");
    Ok(DeployedService {
        name: created.name,
        url: created.uri,
    })
}

fn require_pushed_image(image: &ImageReference) -> ProvisionResult<()> {
    if image.image.is_empty() || image.tag.is_empty() {
        return Err(ProvisionError::missing_dependency(
            "Pushed image reference is missing",
        ));
    }
    Ok(())
}

/// Grant `roles/run.invoker` to `allUsers` so the service URL is publicly
/// reachable.
async fn allow_unauthenticated(clients: &Clients, service_name: &str) -> ProvisionResult<()> {
    info!(service = %service_name, "granting public invocation");

    clients
        .run
        .set_iam_policy()
        .set_resource(service_name)
        .set_policy(Policy::new().set_bindings([Binding::new()
            .set_role(INVOKER_ROLE)
            .set_members([ALL_USERS])]))
        .send()
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populated_image_reference_is_accepted() {
        let image = ImageReference::new("us-east1", "p", "repo", "app", "latest");
        assert!(require_pushed_image(&image).is_ok());
    }

    #[test]
    fn test_empty_image_reference_fails_fast() {
        let image = ImageReference::new("us-east1", "p", "repo", "", "latest");
        assert!(matches!(
            require_pushed_image(&image),
            Err(ProvisionError::MissingDependency { .. })
        ));

        let image = ImageReference::new("us-east1", "p", "repo", "app", "");
        assert!(matches!(
            require_pushed_image(&image),
            Err(ProvisionError::MissingDependency { .. })
        ));
    }
}
