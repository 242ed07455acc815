//! Artifact Registry authentication.

use crate::runtime::ContainerRuntime;
use crate::{ImageBuilderError, ImageBuilderResult};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::info;

/// Environment variable naming the service-account JSON key file
pub const CREDENTIALS_PATH_VAR: &str = "GOOGLE_CREDENTIALS_FILE_PATH";

/// Username Artifact Registry expects when the password is a JSON key
pub const REGISTRY_USERNAME: &str = "_json_key";

/// Credentials for a container registry
#[derive(Debug, Clone)]
pub struct RegistryCredentials {
    /// Registry host, e.g. `us-east1-docker.pkg.dev`
    pub server: String,
    /// Registry username
    pub username: String,
    /// Registry password; for Artifact Registry, the JSON key contents
    pub password: String,
}

impl RegistryCredentials {
    /// Build credentials for an Artifact Registry server from the
    /// environment.
    ///
    /// Reads the key file path from `GOOGLE_CREDENTIALS_FILE_PATH` and the
    /// key contents from that file. A missing variable is an explicit
    /// error, not a panic.
    pub fn from_env(server: impl Into<String>) -> ImageBuilderResult<Self> {
        let path = std::env::var(CREDENTIALS_PATH_VAR)
            .map_err(|_| ImageBuilderError::CredentialsMissing(CREDENTIALS_PATH_VAR))?;

        let password = std::fs::read_to_string(&path).map_err(|e| {
            ImageBuilderError::CredentialsUnreadable {
                path,
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            server: server.into(),
            username: REGISTRY_USERNAME.to_string(),
            password,
        })
    }
}

/// Log in to the registry with the given credentials.
///
/// The password is written to the login command's stdin so the key never
/// appears in the process argument list.
pub fn login(
    runtime: &ContainerRuntime,
    credentials: &RegistryCredentials,
) -> ImageBuilderResult<()> {
    if !runtime.is_available() {
        return Err(ImageBuilderError::NoRuntimeAvailable);
    }

    info!(server = %credentials.server, "logging in to registry");

    let mut child = Command::new(runtime.command())
        .args([
            "login",
            "--username",
            &credentials.username,
            "--password-stdin",
            &credentials.server,
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|_| ImageBuilderError::CommandFailed {
            command: format!("{} login {}", runtime.command(), credentials.server),
        })?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(credentials.password.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(ImageBuilderError::LoginFailed {
            server: credentials.server.clone(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_missing_credentials_var_is_an_error() {
        std::env::remove_var(CREDENTIALS_PATH_VAR);
        let result = RegistryCredentials::from_env("us-east1-docker.pkg.dev");
        match result {
            Err(ImageBuilderError::CredentialsMissing(var)) => {
                assert_eq!(var, CREDENTIALS_PATH_VAR);
            }
            other => panic!("expected CredentialsMissing, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_unreadable_key_file_is_an_error() {
        std::env::set_var(CREDENTIALS_PATH_VAR, "/definitely/not/a/key.json");
        let result = RegistryCredentials::from_env("us-east1-docker.pkg.dev");
        std::env::remove_var(CREDENTIALS_PATH_VAR);
        assert!(matches!(
            result,
            Err(ImageBuilderError::CredentialsUnreadable { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_credentials_read_from_key_file() {
        let mut key_file = tempfile::NamedTempFile::new().unwrap();
        write!(key_file, "{{\"type\":\"service_account\"}}").unwrap();
        std::env::set_var(CREDENTIALS_PATH_VAR, key_file.path());

        let credentials = RegistryCredentials::from_env("us-east1-docker.pkg.dev").unwrap();
        std::env::remove_var(CREDENTIALS_PATH_VAR);

        assert_eq!(credentials.server, "us-east1-docker.pkg.dev");
        assert_eq!(credentials.username, REGISTRY_USERNAME);
        assert_eq!(credentials.password, "{\"type\":\"service_account\"}");
    }

    #[test]
    fn test_login_requires_a_runtime() {
        let credentials = RegistryCredentials {
            server: "us-east1-docker.pkg.dev".to_string(),
            username: REGISTRY_USERNAME.to_string(),
            password: "{}".to_string(),
        };
        let result = login(&ContainerRuntime::None, &credentials);
        assert!(matches!(result, Err(ImageBuilderError::NoRuntimeAvailable)));
    }
}
