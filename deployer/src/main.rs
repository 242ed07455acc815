mod pipeline;

use clap::{Args, Parser, Subcommand};
use provision::DeployConfig;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "deployer")]
#[command(about = "Deploys a container image to Google Cloud Run")]
struct Cli {
    /// Environment file loaded at startup
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: enable APIs, create the repository, build and
    /// push the image, deploy and grant public invocation
    Deploy {
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// Build and push the container image without deploying
    Build {
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// Validate configuration and local prerequisites without calling any
    /// provider API
    Check {
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
}

/// Flag overrides applied on top of the environment configuration
#[derive(Args, Debug, Default)]
struct ConfigOverrides {
    /// Google Cloud project id
    #[arg(long)]
    project: Option<String>,
    /// Region for the repository and the Cloud Run service
    #[arg(long)]
    region: Option<String>,
    /// Artifact Registry repository id
    #[arg(long)]
    repository: Option<String>,
    /// Container image name
    #[arg(long)]
    image: Option<String>,
    /// Container image tag
    #[arg(long)]
    tag: Option<String>,
    /// Cloud Run service id
    #[arg(long)]
    service: Option<String>,
    /// Container build context directory
    #[arg(long)]
    context: Option<PathBuf>,
}

impl ConfigOverrides {
    fn apply(self, mut config: DeployConfig) -> DeployConfig {
        if let Some(project) = self.project {
            config = config.with_project_id(project);
        }
        if let Some(region) = self.region {
            config = config.with_region(region);
        }
        if let Some(repository) = self.repository {
            config = config.with_repository_id(repository);
        }
        if let Some(image) = self.image {
            config = config.with_image_name(image);
        }
        if let Some(tag) = self.tag {
            config = config.with_image_tag(tag);
        }
        if let Some(service) = self.service {
            config = config.with_service_id(service);
        }
        if let Some(context) = self.context {
            config = config.with_build_context(context);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy { overrides } => {
            load_env_file(&cli.env_file)?;
            let config = overrides.apply(DeployConfig::from_env());
            pipeline::deploy(&config).await?;
        }
        Commands::Build { overrides } => {
            load_env_file(&cli.env_file)?;
            let config = overrides.apply(DeployConfig::from_env());
            pipeline::build_and_push(&config)?;
        }
        Commands::Check { overrides } => {
            // check reports instead of aborting on a missing env file
            let env_loaded = dotenvy::from_path(&cli.env_file).is_ok();
            let config = overrides.apply(DeployConfig::from_env());
            pipeline::check(&config, &cli.env_file, env_loaded)?;
        }
    }

    Ok(())
}

/// Load the environment file; failure is fatal for provisioning commands.
fn load_env_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::from_path(path)
        .map_err(|e| format!("Error loading env file '{}': {e}", path.display()))?;
    info!(path = %path.display(), "environment file loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_deploy_with_overrides() {
        let cli = Cli::try_parse_from([
            "deployer",
            "deploy",
            "--project",
            "my-project",
            "--region",
            "europe-west4",
            "--tag",
            "v2",
        ])
        .unwrap();

        match cli.command {
            Commands::Deploy { overrides } => {
                let config = overrides.apply(DeployConfig::default());
                assert_eq!(config.project_id, "my-project");
                assert_eq!(config.region, "europe-west4");
                assert_eq!(config.image_tag, "v2");
            }
            _ => panic!("expected deploy subcommand"),
        }
    }

    #[test]
    fn test_cli_default_env_file() {
        let cli = Cli::try_parse_from(["deployer", "check"]).unwrap();
        assert_eq!(cli.env_file, PathBuf::from(".env"));
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["deployer", "destroy"]).is_err());
    }

    #[test]
    fn test_overrides_leave_unset_fields_alone() {
        let overrides = ConfigOverrides {
            service: Some("api-service".to_string()),
            ..Default::default()
        };
        let config = overrides.apply(DeployConfig::default());
        assert_eq!(config.service_id, "api-service");
        assert_eq!(config.region, "us-east1");
        assert_eq!(config.image_name, "my-app-docker");
    }
}
