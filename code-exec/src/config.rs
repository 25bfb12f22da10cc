use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{error::Error, Result};

/// How the request's time limit is shared between the compile and run stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBudget {
    /// Each stage gets the full time limit, so a compiled request may take close to twice it
    #[default]
    PerStage,
    /// The run stage only gets what the compile stage left over
    Shared,
}

/// Command names used to invoke each toolchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toolchain {
    pub node: String,
    pub python: String,
    pub javac: String,
    pub java: String,
    pub cxx: String,
    pub cc: String,
    pub go: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            node: "node".to_string(),
            python: "python3".to_string(),
            javac: "javac".to_string(),
            java: "java".to_string(),
            cxx: "g++".to_string(),
            cc: "gcc".to_string(),
            go: "go".to_string(),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Shared directory holding every request's files
    pub workspace_dir: PathBuf,
    /// Maximum number of requests with processes in flight
    pub max_concurrent_executions: usize,
    /// Cap on captured bytes per output stream
    pub max_output_bytes: usize,
    pub time_budget: TimeBudget,
    /// Apply the request's memory hint as an address-space rlimit on the run stage
    pub enforce_memory_limit: bool,
    pub toolchain: Toolchain,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            workspace_dir: std::env::temp_dir().join("code-exec"),
            max_concurrent_executions: 8,
            max_output_bytes: 1024 * 1024, // 1MB
            time_budget: TimeBudget::PerStage,
            enforce_memory_limit: false,
            toolchain: Toolchain::default(),
        }
    }
}

impl ExecutionConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_workspace_dir(mut self, workspace_dir: impl Into<PathBuf>) -> Self {
        self.workspace_dir = workspace_dir.into();
        self
    }

    pub fn with_max_concurrent_executions(mut self, max: usize) -> Self {
        self.max_concurrent_executions = max;
        self
    }

    pub fn with_time_budget(mut self, time_budget: TimeBudget) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_executions == 0 {
            return Err(Error::Config(
                "max_concurrent_executions must be at least 1".to_string(),
            ));
        }
        if self.max_output_bytes == 0 {
            return Err(Error::Config(
                "max_output_bytes must be at least 1".to_string(),
            ));
        }
        if self.workspace_dir.as_os_str().is_empty() {
            return Err(Error::Config("workspace_dir must not be empty".to_string()));
        }
        Ok(())
    }
}
