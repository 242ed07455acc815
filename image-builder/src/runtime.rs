//! Container runtime detection.

use std::process::{Command, Stdio};

/// Container runtime types supported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerRuntime {
    /// Docker container runtime
    Docker,
    /// Podman container runtime
    Podman,
    /// No container runtime available
    None,
}

impl ContainerRuntime {
    /// Get the command name for this runtime
    pub fn command(&self) -> &'static str {
        match self {
            ContainerRuntime::Docker => "docker",
            ContainerRuntime::Podman => "podman",
            ContainerRuntime::None => "",
        }
    }

    /// Check if this runtime is available
    pub fn is_available(&self) -> bool {
        matches!(self, ContainerRuntime::Docker | ContainerRuntime::Podman)
    }
}

/// Detect available container runtime in order of preference
///
/// Docker is probed first: the push target is a Docker-format registry and
/// the `_json_key` login convention is documented for Docker clients. Podman
/// is a drop-in fallback.
pub fn detect_runtime() -> ContainerRuntime {
    if Command::new("docker")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
    {
        return ContainerRuntime::Docker;
    }

    if Command::new("podman")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
    {
        return ContainerRuntime::Podman;
    }

    ContainerRuntime::None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_commands() {
        assert_eq!(ContainerRuntime::Docker.command(), "docker");
        assert_eq!(ContainerRuntime::Podman.command(), "podman");
        assert_eq!(ContainerRuntime::None.command(), "");
    }

    #[test]
    fn test_runtime_availability() {
        assert!(ContainerRuntime::Docker.is_available());
        assert!(ContainerRuntime::Podman.is_available());
        assert!(!ContainerRuntime::None.is_available());
    }
}
