//! Provider client construction.

use crate::error::ProvisionResult;
use google_cloud_api_serviceusage_v1::client::ServiceUsage;
use google_cloud_artifactregistry_v1::client::ArtifactRegistry;
use google_cloud_run_v2::client::Services;

/// The Google Cloud clients the pipeline steps call into.
///
/// Built once and shared by reference; authentication uses Application
/// Default Credentials.
pub struct Clients {
    pub service_usage: ServiceUsage,
    pub artifact_registry: ArtifactRegistry,
    pub run: Services,
}

impl Clients {
    pub async fn connect() -> ProvisionResult<Self> {
        let service_usage = ServiceUsage::builder().build().await?;
        let artifact_registry = ArtifactRegistry::builder().build().await?;
        let run = Services::builder().build().await?;
        Ok(Self {
            service_usage,
            artifact_registry,
            run,
        })
    }
}
