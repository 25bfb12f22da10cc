use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use tokio::fs;

use crate::{
    error::Error,
    languages::{write_source, ExecutionPlan, LanguageExecutor},
    process::StageCommand,
    types::{ExecutionRequest, Language},
    workspace::{ArtifactGuard, Workspace},
    Result,
};

static PUBLIC_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"public\s+class\s+(\w+)").expect("valid class pattern"));

static JAVA_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier pattern")
});

pub struct JavaExecutor {
    javac: String,
    java: String,
}

impl JavaExecutor {
    pub fn new(javac: Option<String>, java: Option<String>) -> Self {
        Self {
            javac: javac.unwrap_or_else(|| "javac".to_string()),
            java: java.unwrap_or_else(|| "java".to_string()),
        }
    }
}

/// First `public class <Name>` in the source.
///
/// A textual heuristic: with several public classes the first one wins, and declarations
/// inside comments or strings are matched too.
pub(crate) fn detect_class_name(code: &str) -> Option<String> {
    PUBLIC_CLASS
        .captures(code)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str().to_string())
}

fn entry_class(request: &ExecutionRequest, request_id: &str) -> Result<String> {
    if let Some(class) = &request.entry_class {
        if !JAVA_IDENTIFIER.is_match(class) {
            return Err(Error::System(format!("Invalid entry class name: {}", class)));
        }
        return Ok(class.clone());
    }

    // Request ids are hex and may start with a digit
    Ok(detect_class_name(&request.code).unwrap_or_else(|| format!("_{}", request_id)))
}

#[async_trait]
impl LanguageExecutor for JavaExecutor {
    fn language(&self) -> Language {
        Language::Java
    }

    fn file_extension(&self) -> &str {
        "java"
    }

    fn required_tools(&self) -> Vec<&str> {
        vec![self.javac.as_str(), self.java.as_str()]
    }

    async fn prepare(
        &self,
        workspace: &Workspace,
        request: &ExecutionRequest,
        request_id: &str,
        artifacts: &mut ArtifactGuard,
    ) -> Result<ExecutionPlan> {
        let class = entry_class(request, request_id)?;

        // The file name has to match the class, so each request gets its own directory
        let class_dir = workspace.path(request_id);
        artifacts.track(&class_dir);
        fs::create_dir(&class_dir).await.map_err(|e| {
            Error::Workspace(format!(
                "Failed to create {}: {}",
                class_dir.display(),
                e
            ))
        })?;

        let source = class_dir.join(format!("{}.{}", class, self.file_extension()));
        write_source(&source, &request.code).await?;

        Ok(ExecutionPlan {
            compile: Some(
                StageCommand::new(&self.javac)
                    .arg("-d")
                    .path_arg(&class_dir)
                    .path_arg(&source),
            ),
            run: StageCommand::new(&self.java)
                .arg("-cp")
                .path_arg(&class_dir)
                .arg(class),
        })
    }
}
