//! Container image building utilities for cloudlift
//!
//! This crate builds a container image, authenticates against an Artifact
//! Registry Docker endpoint, and pushes the image there. It shells out to
//! the local container runtime (Docker or Podman) rather than talking to a
//! registry API directly.

use thiserror::Error;

pub mod build;
pub mod reference;
pub mod registry;
pub mod runtime;

pub use build::{build_image, push_image, BuildOptions};
pub use reference::ImageReference;
pub use registry::{login, RegistryCredentials, CREDENTIALS_PATH_VAR, REGISTRY_USERNAME};
pub use runtime::{detect_runtime, ContainerRuntime};

/// Errors related to image building and pushing
#[derive(Error, Debug)]
pub enum ImageBuilderError {
    /// No container runtime is available
    #[error("No container runtime available. Please install Docker or Podman to build and push images.")]
    NoRuntimeAvailable,

    /// Image build failed
    #[error("Failed to build image '{image}': {reason}")]
    BuildFailed { image: String, reason: String },

    /// Registry authentication failed
    #[error("Failed to log in to registry '{server}': {reason}")]
    LoginFailed { server: String, reason: String },

    /// Image push failed
    #[error("Failed to push image '{image}': {reason}")]
    PushFailed { image: String, reason: String },

    /// The credential environment variable is not set
    #[error("{0} environment variable is not set")]
    CredentialsMissing(&'static str),

    /// The credential key file could not be read
    #[error("Failed to read credential key file '{path}': {reason}")]
    CredentialsUnreadable { path: String, reason: String },

    /// Command execution failed
    #[error("Command execution failed: {command}")]
    CommandFailed { command: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ImageBuilderResult<T> = Result<T, ImageBuilderError>;
