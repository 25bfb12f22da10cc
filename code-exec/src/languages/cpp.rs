use async_trait::async_trait;

use crate::{
    languages::{write_source, ExecutionPlan, LanguageExecutor},
    process::StageCommand,
    types::{ExecutionRequest, Language},
    workspace::{ArtifactGuard, Workspace},
    Result,
};

pub struct CppExecutor {
    std_version: String,
    compiler: String,
}

impl CppExecutor {
    pub fn new(std_version: Option<String>, compiler: Option<String>) -> Self {
        Self {
            std_version: std_version.unwrap_or_else(|| "17".to_string()),
            compiler: compiler.unwrap_or_else(|| "g++".to_string()),
        }
    }
}

#[async_trait]
impl LanguageExecutor for CppExecutor {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn file_extension(&self) -> &str {
        "cpp"
    }

    fn required_tools(&self) -> Vec<&str> {
        vec![self.compiler.as_str()]
    }

    async fn prepare(
        &self,
        workspace: &Workspace,
        request: &ExecutionRequest,
        request_id: &str,
        artifacts: &mut ArtifactGuard,
    ) -> Result<ExecutionPlan> {
        let source = workspace.path(&format!("{}.{}", request_id, self.file_extension()));
        let binary = workspace.path(&format!("{}.out", request_id));
        artifacts.track(&source);
        artifacts.track(&binary);
        write_source(&source, &request.code).await?;

        Ok(ExecutionPlan {
            compile: Some(
                StageCommand::new(&self.compiler)
                    .arg(format!("-std=c++{}", self.std_version))
                    .path_arg(&source)
                    .arg("-o")
                    .path_arg(&binary),
            ),
            run: StageCommand::new(binary.to_string_lossy()),
        })
    }
}
