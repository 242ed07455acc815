//! The deployment pipeline: a linear chain of provisioning steps.
//!
//! Enable APIs → create repository → build & push image → deploy + grant
//! invoker. Every step propagates the first error; nothing is retried or
//! rolled back here.

use image_builder::{
    build_image, detect_runtime, login, push_image, BuildOptions, ImageReference,
    RegistryCredentials, CREDENTIALS_PATH_VAR,
};
use provision::{Clients, DeployConfig, EnabledServices, ProvisionError, RepositoryHandle};
use std::path::Path;
use tracing::info;

/// Run the full pipeline and print the deployed service URL.
pub async fn deploy(config: &DeployConfig) -> Result<(), Box<dyn std::error::Error>> {
    config
        .validate()
        .map_err(ProvisionError::invalid_config)?;

    let clients = Clients::connect().await?;

    let enabled = provision::enable_services(&clients, config).await?;
    let repository = provision::create_repository(&clients, config, &enabled).await?;
    let image = push_to_repository(config, &enabled, &repository)?;
    let deployed = provision::deploy_service(&clients, config, &enabled, &image).await?;

    info!(service = %deployed.name, "pipeline finished");
    println!("containerUrl = {}", deployed.url);
    Ok(())
}

/// Build and push the image into the repository created by the pipeline.
///
/// Depends on the Artifact Registry enablement and the repository handle;
/// both are checked before any work starts.
fn push_to_repository(
    config: &DeployConfig,
    enabled: &EnabledServices,
    repository: &RepositoryHandle,
) -> Result<ImageReference, Box<dyn std::error::Error>> {
    enabled.artifact_registry()?;
    repository.require()?;
    build_and_push_image(config)
}

/// Build and push the image without touching any provider API.
pub fn build_and_push(config: &DeployConfig) -> Result<(), Box<dyn std::error::Error>> {
    config
        .validate()
        .map_err(ProvisionError::invalid_config)?;
    let reference = build_and_push_image(config)?;
    println!("pushed {reference}");
    Ok(())
}

fn build_and_push_image(
    config: &DeployConfig,
) -> Result<ImageReference, Box<dyn std::error::Error>> {
    let runtime = detect_runtime();
    let reference = config.image_reference();
    let credentials = RegistryCredentials::from_env(reference.registry_host())?;

    let options = BuildOptions {
        context: config.build_context.clone(),
        platform: config.build_platform.clone(),
        extra_args: vec![],
    };

    build_image(&runtime, &reference, &options)?;
    login(&runtime, &credentials)?;
    push_image(&runtime, &reference)?;

    Ok(reference)
}

/// Report on configuration and local prerequisites without calling any
/// provider API.
pub fn check(
    config: &DeployConfig,
    env_file: &Path,
    env_loaded: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Checking deployment prerequisites...");
    let mut failed = false;

    if env_loaded {
        println!("✓ Environment file '{}' loaded.", env_file.display());
    } else {
        println!("✗ Environment file '{}' could not be loaded.", env_file.display());
        failed = true;
    }

    match config.validate() {
        Ok(()) => println!(
            "✓ Configuration valid. Image will be pushed to {}.",
            config.image_reference()
        ),
        Err(e) => {
            println!("✗ Configuration invalid: {e}");
            failed = true;
        }
    }

    let runtime = detect_runtime();
    if runtime.is_available() {
        println!("✓ Container runtime available: {}.", runtime.command());
    } else {
        println!("✗ No container runtime available. Install Docker or Podman.");
        failed = true;
    }

    match RegistryCredentials::from_env(config.image_reference().registry_host()) {
        Ok(_) => println!("✓ Registry credentials readable from {CREDENTIALS_PATH_VAR}."),
        Err(e) => {
            println!("✗ Registry credentials unavailable: {e}");
            failed = true;
        }
    }

    if failed {
        return Err("one or more checks failed".into());
    }
    Ok(())
}
