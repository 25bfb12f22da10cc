//! Language-specific executor implementations

mod c;
mod cpp;
mod go;
mod java;
mod javascript;
mod python;

pub use c::CExecutor;
pub use cpp::CppExecutor;
pub use go::GoExecutor;
pub use java::JavaExecutor;
pub use javascript::JavaScriptExecutor;
pub use python::PythonExecutor;

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tracing::debug;
use which::which;

use crate::{
    error::Error,
    process::StageCommand,
    types::{ExecutionRequest, Language},
    workspace::{ArtifactGuard, Workspace},
    Result,
};

/// Commands a request runs once its source is on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Absent for interpreted languages and for Go, which builds inside `go run`
    pub compile: Option<StageCommand>,
    pub run: StageCommand,
}

/// Trait for language-specific code executors
#[async_trait]
pub trait LanguageExecutor: Send + Sync {
    fn language(&self) -> Language;

    /// Get the file extension for source files
    fn file_extension(&self) -> &str;

    /// Binaries that must resolve on PATH
    fn required_tools(&self) -> Vec<&str>;

    /// Write the request's source into the workspace and describe how to build and run it.
    ///
    /// Every path the request may produce is registered with `artifacts` before it is
    /// created, so the caller can remove them whatever the outcome.
    async fn prepare(
        &self,
        workspace: &Workspace,
        request: &ExecutionRequest,
        request_id: &str,
        artifacts: &mut ArtifactGuard,
    ) -> Result<ExecutionPlan>;

    /// Check if all required tools are available
    fn check_tools(&self) -> Result<()> {
        let missing: Vec<_> = self
            .required_tools()
            .into_iter()
            .filter(|tool| !check_command(tool))
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(Error::System(format!(
                "Missing required tools: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

pub(crate) async fn write_source(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).await.map_err(|e| {
        Error::Workspace(format!(
            "Failed to write source file {}: {}",
            path.display(),
            e
        ))
    })?;
    debug!("Wrote source file {}", path.display());
    Ok(())
}

pub(crate) fn check_command(cmd: &str) -> bool {
    which(cmd).is_ok()
}

#[cfg(test)]
pub(crate) fn skip_if_not_available(tools: &[&str]) -> bool {
    let missing: Vec<_> = tools
        .iter()
        .filter(|tool| which(**tool).is_err())
        .map(|s| (*s).to_string())
        .collect();

    if !missing.is_empty() {
        eprintln!("Skipping test: {} not available", missing.join(", "));
        return true;
    }
    false
}
