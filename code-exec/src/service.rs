use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::{
    config::ExecutionConfig,
    error::Error,
    executor::CodeExecutor,
    types::{ExecutionRequest, ExecutionResult, Language},
    Result,
};

#[derive(Clone)]
pub struct CodeExecutionService {
    executor: Arc<CodeExecutor>,
    semaphore: Arc<Semaphore>,
}

impl CodeExecutionService {
    pub async fn new(config: ExecutionConfig) -> Result<Self> {
        config.validate()?;
        let executor = CodeExecutor::new(&config).await?;

        Ok(Self {
            executor: Arc::new(executor),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_executions)),
        })
    }

    /// Run a request to completion.
    ///
    /// Only an unrecognised language is an `Err`, and it is detected before anything is
    /// written or spawned. Compile errors, runtime errors, timeouts and missing toolchains
    /// are all reported through the returned [`ExecutionResult`].
    pub async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionResult> {
        let language: Language = request.language.parse()?;

        // Acquire execution permit
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::System(format!("Failed to acquire execution permit: {}", e)))?;

        debug!("Starting code execution for language: {}", language);

        let result = self.executor.execute(language, &request).await;

        info!(
            "Code execution finished: language={} success={} timed_out={} time={}ms",
            language,
            result.success,
            result.timed_out,
            result.execution_time.as_millis()
        );

        Ok(result)
    }

    pub fn get_available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Languages whose toolchain binaries are all on PATH
    pub fn available_languages(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|language| {
                self.executor
                    .create_executor(*language)
                    .check_tools()
                    .is_ok()
            })
            .collect()
    }

    pub fn workspace_dir(&self) -> &Path {
        self.executor.workspace().root()
    }
}
