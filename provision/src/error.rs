use thiserror::Error;

/// Errors surfaced by the provisioning steps.
///
/// Provider errors pass through unchanged; there is no retry or rollback
/// logic at this level.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// Invalid deployment configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A step was invoked without the handle a previous step produces
    #[error("Missing dependency: {message}")]
    MissingDependency { message: String },

    /// A provider client could not be constructed
    #[error("Failed to build provider client: {0}")]
    ClientBuilder(#[from] google_cloud_gax::client_builder::Error),

    /// A provider call failed
    #[error("Provider call failed: {0}")]
    Provider(#[from] google_cloud_gax::error::Error),

    /// The deployed service came back without a URL
    #[error("Deployed service '{service}' reported no URL")]
    MissingUrl { service: String },
}

pub type ProvisionResult<T> = Result<T, ProvisionError>;

impl ProvisionError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn missing_dependency(message: impl Into<String>) -> Self {
        Self::MissingDependency {
            message: message.into(),
        }
    }
}
