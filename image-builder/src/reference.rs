//! Fully qualified Artifact Registry image references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully qualified reference to an image in an Artifact Registry
/// Docker repository.
///
/// Renders as `<region>-docker.pkg.dev/<project>/<repo>/<image>:<tag>`,
/// the path Cloud Run expects when pulling the deployed image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    /// Region hosting the repository, e.g. `us-east1`
    pub region: String,
    /// Google Cloud project id
    pub project_id: String,
    /// Artifact Registry repository id
    pub repository: String,
    /// Image name within the repository
    pub image: String,
    /// Image tag
    pub tag: String,
}

impl ImageReference {
    pub fn new(
        region: impl Into<String>,
        project_id: impl Into<String>,
        repository: impl Into<String>,
        image: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            project_id: project_id.into(),
            repository: repository.into(),
            image: image.into(),
            tag: tag.into(),
        }
    }

    /// The registry host images are pushed to, e.g. `us-east1-docker.pkg.dev`
    pub fn registry_host(&self) -> String {
        format!("{}-docker.pkg.dev", self.region)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}:{}",
            self.registry_host(),
            self.project_id,
            self.repository,
            self.image,
            self.tag
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_host() {
        let reference = ImageReference::new("us-east1", "my-project", "repo", "app", "latest");
        assert_eq!(reference.registry_host(), "us-east1-docker.pkg.dev");
    }

    #[test]
    fn test_full_reference_format() {
        let reference = ImageReference::new(
            "us-east1",
            "deploy-to-cloud-run",
            "my-app-artifact-repo",
            "my-app-docker",
            "latest",
        );
        assert_eq!(
            reference.to_string(),
            "us-east1-docker.pkg.dev/deploy-to-cloud-run/my-app-artifact-repo/my-app-docker:latest"
        );
    }

    #[test]
    fn test_other_region() {
        let reference = ImageReference::new("europe-west4", "p", "r", "i", "v1.2.3");
        assert_eq!(
            reference.to_string(),
            "europe-west4-docker.pkg.dev/p/r/i:v1.2.3"
        );
    }
}
