use std::time::Duration;
use tracing::{debug, error, warn};

use crate::{
    config::{ExecutionConfig, TimeBudget, Toolchain},
    languages::{
        CExecutor, CppExecutor, GoExecutor, JavaExecutor, JavaScriptExecutor, LanguageExecutor,
        PythonExecutor,
    },
    process::ProcessRunner,
    types::{ExecutionRequest, ExecutionResult, Language},
    workspace::{ArtifactGuard, Workspace},
    Result,
};

/// Runs requests through their language's compile and run stages inside a shared workspace
pub struct CodeExecutor {
    workspace: Workspace,
    runner: ProcessRunner,
    toolchain: Toolchain,
    time_budget: TimeBudget,
    enforce_memory_limit: bool,
}

impl CodeExecutor {
    /// Create a new code executor, creating the workspace directory if needed
    pub async fn new(config: &ExecutionConfig) -> Result<Self> {
        let workspace = Workspace::new(&config.workspace_dir).await?;

        Ok(Self {
            workspace,
            runner: ProcessRunner::new(config.max_output_bytes),
            toolchain: config.toolchain.clone(),
            time_budget: config.time_budget,
            enforce_memory_limit: config.enforce_memory_limit,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Execute a request whose language has already been resolved.
    ///
    /// Never fails: problems writing the source, starting a toolchain, compiling or
    /// running all come back as an unsuccessful result. The request's files are removed
    /// before returning.
    pub async fn execute(&self, language: Language, request: &ExecutionRequest) -> ExecutionResult {
        let executor = self.create_executor(language);
        let request_id = Workspace::new_request_id();
        debug!("Executing {} request {}", language, request_id);

        let mut artifacts = ArtifactGuard::new();
        let result = self
            .run_stages(executor.as_ref(), request, &request_id, &mut artifacts)
            .await;
        artifacts.cleanup();

        result
    }

    async fn run_stages(
        &self,
        executor: &dyn LanguageExecutor,
        request: &ExecutionRequest,
        request_id: &str,
        artifacts: &mut ArtifactGuard,
    ) -> ExecutionResult {
        let plan = match executor
            .prepare(&self.workspace, request, request_id, artifacts)
            .await
        {
            Ok(plan) => plan,
            Err(e) => {
                error!(
                    "Failed to prepare {} request {}: {}",
                    executor.language(),
                    request_id,
                    e
                );
                return ExecutionResult::failure(e.to_string(), Duration::ZERO);
            }
        };

        let mut compile_time = Duration::ZERO;
        if let Some(compile) = &plan.compile {
            let outcome = self.runner.run(compile, "", request.time_limit).await;
            if !outcome.success() {
                debug!("Compilation failed for request {}", request_id);
                return outcome.into_result();
            }
            compile_time = outcome.elapsed;
        }

        let run_timeout = match self.time_budget {
            TimeBudget::PerStage => request.time_limit,
            TimeBudget::Shared => request.time_limit.saturating_sub(compile_time),
        };
        if run_timeout.is_zero() {
            warn!("Request {} used its whole time limit compiling", request_id);
            return ExecutionResult::timed_out(compile_time);
        }

        let memory_limit = self
            .enforce_memory_limit
            .then(|| request.memory_limit_mb.saturating_mul(1024 * 1024));
        let run = plan.run.memory_limit_bytes(memory_limit);

        self.runner
            .run(&run, &request.stdin, run_timeout)
            .await
            .into_result()
    }

    pub fn create_executor(&self, language: Language) -> Box<dyn LanguageExecutor> {
        let toolchain = &self.toolchain;
        match language {
            Language::JavaScript => Box::new(JavaScriptExecutor::new(Some(toolchain.node.clone()))),
            Language::Python => Box::new(PythonExecutor::new(Some(toolchain.python.clone()))),
            Language::Java => Box::new(JavaExecutor::new(
                Some(toolchain.javac.clone()),
                Some(toolchain.java.clone()),
            )),
            Language::Cpp => Box::new(CppExecutor::new(None, Some(toolchain.cxx.clone()))),
            Language::C => Box::new(CExecutor::new(Some(toolchain.cc.clone()))),
            Language::Go => Box::new(GoExecutor::new(Some(toolchain.go.clone()))),
        }
    }
}
