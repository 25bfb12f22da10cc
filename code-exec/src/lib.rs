//! # Code Execution Service
//!
//! Runs arbitrary code snippets in one of several languages by shelling out to the
//! host's interpreters and compilers. Each request gets uniquely named files in a shared
//! workspace directory, every stage runs under a wall-clock time limit, and all generated
//! artifacts are removed once the request completes.
//!
//! Unsupported languages are reported as [`Error::UnsupportedLanguage`]; every other
//! failure (compile errors, runtime errors, timeouts, missing toolchains) comes back as an
//! [`ExecutionResult`] with `success == false`.

mod config;
mod error;
mod executor;
mod languages;
mod process;
mod service;
mod types;
mod workspace;

#[cfg(test)]
mod tests;

pub use config::{ExecutionConfig, TimeBudget, Toolchain};
pub use error::Error;
pub use executor::CodeExecutor;
pub use languages::{ExecutionPlan, LanguageExecutor};
pub use process::{ProcessOutcome, ProcessRunner, StageCommand};
pub use service::CodeExecutionService;
pub use types::{ExecutionRequest, ExecutionResult, Language};
pub use workspace::{ArtifactGuard, Workspace};

/// Result type for code execution operations
pub type Result<T> = std::result::Result<T, Error>;
