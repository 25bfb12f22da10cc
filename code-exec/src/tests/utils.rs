pub mod defaults {
    use crate::{CodeExecutionService, ExecutionConfig, Result, TimeBudget, Toolchain};
    use std::path::Path;
    use tempfile::TempDir;
    use tokio::time::Duration;

    /// Service over a private workspace; keep the `TempDir` alive for the test's duration
    pub async fn test_service() -> Result<(CodeExecutionService, TempDir)> {
        test_service_with(ExecutionConfig::default()).await
    }

    pub async fn test_service_with(config: ExecutionConfig) -> Result<(CodeExecutionService, TempDir)> {
        let dir = tempfile::tempdir()?;
        let service = CodeExecutionService::new(config.with_workspace_dir(dir.path())).await?;
        Ok((service, dir))
    }

    /// Service whose C "compiler" is `sh`, so a submission is a shell script that plays
    /// the compiler: it receives `-o <binary>` and decides whether to produce a program.
    pub async fn shell_compiler_service(
        time_budget: TimeBudget,
    ) -> Result<(CodeExecutionService, TempDir)> {
        let toolchain = Toolchain {
            cc: "sh".to_string(),
            ..Toolchain::default()
        };
        test_service_with(
            ExecutionConfig::default()
                .with_toolchain(toolchain)
                .with_time_budget(time_budget),
        )
        .await
    }

    /// Generous limit so cold javac and go builds finish
    pub fn default_timeout() -> Duration {
        Duration::from_secs(30)
    }

    pub fn short_timeout() -> Duration {
        Duration::from_millis(1000)
    }

    pub fn workspace_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
    }
}
