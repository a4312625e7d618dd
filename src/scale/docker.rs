//! # Container Tool
//!
//! `jobs deploy` builds and pushes the job image before registering the job
//! type. The [`ContainerTool`] trait keeps the command layer independent of the
//! binary doing the work:
//!
//! - [`Docker`]: runs the `docker` CLI (or the binary named by `SCALE_DOCKER`)
//! - [`RecordingTool`]: records the calls it receives, for tests

use crate::error::{Result, ScaleError};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

pub const DOCKER_ENV: &str = "SCALE_DOCKER";
const DEFAULT_DOCKER: &str = "docker";

pub trait ContainerTool {
    /// Builds `image` from `context_dir` using the given build file.
    fn build(&self, context_dir: &Path, dockerfile: &Path, image: &str) -> Result<()>;

    /// Pushes `image` to its registry.
    fn push(&self, image: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct Docker {
    program: String,
}

impl Default for Docker {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Docker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Uses `SCALE_DOCKER` when set, else `docker` from `PATH`.
    pub fn from_env() -> Self {
        let program = std::env::var(DOCKER_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DOCKER.to_string());
        Self::new(program)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        debug!(program = %self.program, ?args, "running container tool");
        let status = Command::new(&self.program).args(args).status().map_err(|e| {
            ScaleError::Command(format!("Failed to launch '{}': {}", self.program, e))
        })?;

        if !status.success() {
            return Err(ScaleError::Command(format!(
                "'{} {}' exited with {}",
                self.program,
                args.first().copied().unwrap_or_default(),
                status
            )));
        }
        Ok(())
    }
}

impl ContainerTool for Docker {
    fn build(&self, context_dir: &Path, dockerfile: &Path, image: &str) -> Result<()> {
        info!(image, "building image");
        let context = context_dir.to_string_lossy();
        let file = dockerfile.to_string_lossy();
        self.run(&["build", "-t", image, "-f", &file, &context])
    }

    fn push(&self, image: &str) -> Result<()> {
        info!(image, "pushing image");
        self.run(&["push", image])
    }
}

/// A call received by [`RecordingTool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Build {
        context_dir: PathBuf,
        dockerfile: PathBuf,
        image: String,
    },
    Push(String),
}

/// Records calls instead of running anything. Set `fail_push` to make pushes fail.
#[derive(Debug, Default)]
pub struct RecordingTool {
    pub calls: RefCell<Vec<ToolCall>>,
    pub fail_push: bool,
}

impl RecordingTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.borrow().clone()
    }
}

impl ContainerTool for RecordingTool {
    fn build(&self, context_dir: &Path, dockerfile: &Path, image: &str) -> Result<()> {
        self.calls.borrow_mut().push(ToolCall::Build {
            context_dir: context_dir.to_path_buf(),
            dockerfile: dockerfile.to_path_buf(),
            image: image.to_string(),
        });
        Ok(())
    }

    fn push(&self, image: &str) -> Result<()> {
        self.calls.borrow_mut().push(ToolCall::Push(image.to_string()));
        if self.fail_push {
            return Err(ScaleError::Command(format!("push of {} refused", image)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_command_error() {
        let docker = Docker::new("scale-test-no-such-binary");
        let err = docker.push("registry/x:1").unwrap_err();
        assert!(matches!(err, ScaleError::Command(msg) if msg.contains("Failed to launch")));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_command_error() {
        let docker = Docker::new("false");
        let err = docker.push("registry/x:1").unwrap_err();
        assert!(matches!(err, ScaleError::Command(msg) if msg.contains("'false push'")));
        assert_eq!(Docker::new("true").push("x").ok(), Some(()));
    }

    #[test]
    fn test_recording_tool() {
        let tool = RecordingTool::new();
        tool.build(Path::new("job"), Path::new("job/Dockerfile"), "r/x:1")
            .unwrap();
        tool.push("r/x:1").unwrap();
        assert_eq!(
            tool.calls(),
            vec![
                ToolCall::Build {
                    context_dir: PathBuf::from("job"),
                    dockerfile: PathBuf::from("job/Dockerfile"),
                    image: "r/x:1".into()
                },
                ToolCall::Push("r/x:1".into())
            ]
        );
    }
}
