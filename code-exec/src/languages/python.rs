use async_trait::async_trait;

use crate::{
    languages::{write_source, ExecutionPlan, LanguageExecutor},
    process::StageCommand,
    types::{ExecutionRequest, Language},
    workspace::{ArtifactGuard, Workspace},
    Result,
};

pub struct PythonExecutor {
    interpreter: String,
}

impl PythonExecutor {
    pub fn new(interpreter: Option<String>) -> Self {
        Self {
            interpreter: interpreter.unwrap_or_else(|| "python3".to_string()),
        }
    }
}

#[async_trait]
impl LanguageExecutor for PythonExecutor {
    fn language(&self) -> Language {
        Language::Python
    }

    fn file_extension(&self) -> &str {
        "py"
    }

    fn required_tools(&self) -> Vec<&str> {
        vec![self.interpreter.as_str()]
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

        Ok(ExecutionPlan {
            compile: None,
            run: StageCommand::new(&self.interpreter).path_arg(&source),
        })
    }
}
