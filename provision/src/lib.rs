//! Google Cloud provisioning steps for cloudlift
//!
//! Four steps, each depending on the previous ones:
//!
//! 1. Enable the required API surfaces (Resource Manager first, then Cloud
//!    Run and Artifact Registry).
//! 2. Create a Docker-format Artifact Registry repository.
//! 3. Build and push the container image (see the `image-builder` crate).
//! 4. Deploy the image to Cloud Run and grant public invocation.
//!
//! Each step is a thin call into the Google Cloud client libraries; retries
//! and long-running-operation polling are the SDK's concern. The first error
//! aborts the run and surfaces the provider error unchanged.

pub mod clients;
pub mod config;
pub mod error;
pub mod repository;
pub mod run;
pub mod services;

pub use clients::Clients;
pub use config::DeployConfig;
pub use error::{ProvisionError, ProvisionResult};
pub use repository::{create_repository, RepositoryHandle};
pub use run::{deploy_service, DeployedService};
pub use services::{enable_services, EnabledServices, ServiceEnablement};
