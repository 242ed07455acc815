//! Build and push operations.

use crate::reference::ImageReference;
use crate::runtime::ContainerRuntime;
use crate::{ImageBuilderError, ImageBuilderResult};
use std::path::PathBuf;
use std::process::Command;
use tracing::info;

/// Options for building a container image
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Build context directory
    pub context: PathBuf,
    /// Target platform, e.g. `linux/amd64`
    pub platform: String,
    /// Additional arguments passed through to the build command
    pub extra_args: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            context: PathBuf::from(".."),
            // Cloud Run runs amd64; needed when building on ARM hosts
            platform: "linux/amd64".to_string(),
            extra_args: vec![],
        }
    }
}

/// Build a container image tagged with the full registry reference
pub fn build_image(
    runtime: &ContainerRuntime,
    reference: &ImageReference,
    options: &BuildOptions,
) -> ImageBuilderResult<()> {
    if !runtime.is_available() {
        return Err(ImageBuilderError::NoRuntimeAvailable);
    }

    let tag = reference.to_string();
    info!(image = %tag, context = %options.context.display(), "building image");

    let mut command = Command::new(runtime.command());
    command
        .arg("build")
        .arg(format!("--platform={}", options.platform))
        .args(["-t", &tag])
        .args(&options.extra_args)
        .arg(&options.context);

    let output = command.output().map_err(|_| ImageBuilderError::CommandFailed {
        command: format!("{} build -t {}", runtime.command(), tag),
    })?;

    if !output.status.success() {
        return Err(ImageBuilderError::BuildFailed {
            image: tag,
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Push a previously built image to its registry
pub fn push_image(
    runtime: &ContainerRuntime,
    reference: &ImageReference,
) -> ImageBuilderResult<()> {
    if !runtime.is_available() {
        return Err(ImageBuilderError::NoRuntimeAvailable);
    }

    let tag = reference.to_string();
    info!(image = %tag, "pushing image");

    let output = Command::new(runtime.command())
        .args(["push", &tag])
        .output()
        .map_err(|_| ImageBuilderError::CommandFailed {
            command: format!("{} push {}", runtime.command(), tag),
        })?;

    if !output.status.success() {
        return Err(ImageBuilderError::PushFailed {
            image: tag,
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_reference() -> ImageReference {
        ImageReference::new("us-east1", "p", "r", "i", "latest")
    }

    #[test]
    fn test_build_options_default() {
        let options = BuildOptions::default();
        assert_eq!(options.context, PathBuf::from(".."));
        assert_eq!(options.platform, "linux/amd64");
        assert!(options.extra_args.is_empty());
    }

    #[test]
    fn test_build_requires_a_runtime() {
        let result = build_image(
            &ContainerRuntime::None,
            &test_reference(),
            &BuildOptions::default(),
        );
        assert!(matches!(result, Err(ImageBuilderError::NoRuntimeAvailable)));
    }

    #[test]
    fn test_push_requires_a_runtime() {
        let result = push_image(&ContainerRuntime::None, &test_reference());
        assert!(matches!(result, Err(ImageBuilderError::NoRuntimeAvailable)));
    }
}
