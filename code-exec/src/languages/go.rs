use async_trait::async_trait;

use crate::{
    languages::{write_source, ExecutionPlan, LanguageExecutor},
    process::StageCommand,
    types::{ExecutionRequest, Language},
    workspace::{ArtifactGuard, Workspace},
    Result,
};

pub struct GoExecutor {
    go: String,
}

impl GoExecutor {
    pub fn new(go: Option<String>) -> Self {
        Self {
            go: go.unwrap_or_else(|| "go".to_string()),
        }
    }
}

#[async_trait]
impl LanguageExecutor for GoExecutor {
    fn language(&self) -> Language {
        Language::Go
    }

    fn file_extension(&self) -> &str {
        "go"
    }

    fn required_tools(&self) -> Vec<&str> {
        vec![self.go.as_str()]
    }

    async fn prepare(
        &self,
        workspace: &Workspace,
        request: &ExecutionRequest,
        request_id: &str,
        artifacts: &mut ArtifactGuard,
    ) -> Result<ExecutionPlan> {
        let source = workspace.path(&format!("{}.{}", request_id, self.file_extension()));
        artifacts.track(&source);
        write_source(&source, &request.code).await?;

        // `go run` builds into its own cache, so there is no separate compile stage
        Ok(ExecutionPlan {
            compile: None,
            run: StageCommand::new(&self.go).arg("run").path_arg(&source),
        })
    }
}
