use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Deployment configuration for the whole pipeline.
///
/// Defaults can be overlaid from the environment (typically populated by the
/// `.env` file loaded at startup) and then from CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Google Cloud project id (required, no usable default)
    pub project_id: String,
    /// Region for the repository and the Cloud Run service
    pub region: String,
    /// Artifact Registry repository id
    pub repository_id: String,
    /// Container image name
    pub image_name: String,
    /// Container image tag
    pub image_tag: String,
    /// Cloud Run service id
    pub service_id: String,
    /// Memory limit for the deployed container
    pub memory_limit: String,
    /// Container build context directory
    pub build_context: PathBuf,
    /// Container build target platform
    pub build_platform: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            region: "us-east1".to_string(),
            repository_id: "my-app-artifact-repo".to_string(),
            image_name: "my-app-docker".to_string(),
            image_tag: "latest".to_string(),
            service_id: "cloud-run-service".to_string(),
            memory_limit: "256Mi".to_string(),
            build_context: PathBuf::from(".."),
            build_platform: "linux/amd64".to_string(),
        }
    }
}

impl DeployConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay defaults with values from the environment.
    ///
    /// Unset variables leave the corresponding default in place.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let overlay = |target: &mut String, var: &str| {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *target = value;
                }
            }
        };
        overlay(&mut config.project_id, "GCP_PROJECT_ID");
        overlay(&mut config.region, "GCP_REGION");
        overlay(&mut config.repository_id, "ARTIFACT_REPOSITORY");
        overlay(&mut config.image_name, "IMAGE_NAME");
        overlay(&mut config.image_tag, "IMAGE_TAG");
        overlay(&mut config.service_id, "CLOUD_RUN_SERVICE");
        overlay(&mut config.memory_limit, "MEMORY_LIMIT");
        overlay(&mut config.build_platform, "BUILD_PLATFORM");
        if let Ok(value) = std::env::var("BUILD_CONTEXT") {
            if !value.is_empty() {
                config.build_context = PathBuf::from(value);
            }
        }
        config
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_repository_id(mut self, repository_id: impl Into<String>) -> Self {
        self.repository_id = repository_id.into();
        self
    }

    pub fn with_image_name(mut self, image_name: impl Into<String>) -> Self {
        self.image_name = image_name.into();
        self
    }

    pub fn with_image_tag(mut self, image_tag: impl Into<String>) -> Self {
        self.image_tag = image_tag.into();
        self
    }

    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = service_id.into();
        self
    }

    pub fn with_build_context(mut self, build_context: impl Into<PathBuf>) -> Self {
        self.build_context = build_context.into();
        self
    }

    /// The fully qualified reference the image is pushed to and deployed
    /// from.
    pub fn image_reference(&self) -> image_builder::ImageReference {
        image_builder::ImageReference::new(
            &self.region,
            &self.project_id,
            &self.repository_id,
            &self.image_name,
            &self.image_tag,
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.project_id.is_empty() {
            return Err("Project id cannot be empty".to_string());
        }

        if self.region.is_empty() {
            return Err("Region cannot be empty".to_string());
        }

        if self.repository_id.is_empty() {
            return Err("Repository id cannot be empty".to_string());
        }

        if self.image_name.is_empty() || self.image_tag.is_empty() {
            return Err("Image name and tag cannot be empty".to_string());
        }

        if self.service_id.is_empty() {
            return Err("Service id cannot be empty".to_string());
        }

        if self.memory_limit.is_empty() {
            return Err("Memory limit cannot be empty".to_string());
        }

        Ok(())
    }
}
