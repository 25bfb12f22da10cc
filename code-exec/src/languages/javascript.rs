use async_trait::async_trait;

use crate::{
    error::Error,
    languages::{write_source, ExecutionPlan, LanguageExecutor},
    process::StageCommand,
    types::{ExecutionRequest, Language},
    workspace::{ArtifactGuard, Workspace},
    Result,
};

// Node has no synchronous line reader, so submissions run inside a harness that serves
// stdin lines to prompt()/readline() and buffers console output until the end.
const PRELUDE: &str = r#"const __stdinLines = __STDIN_LINES__;
let __stdinCursor = 0;
const __stdoutLines = [];
const __writeLine = console.log.bind(console);
const __format = require('util').format;
function prompt() {
  return __stdinCursor < __stdinLines.length ? __stdinLines[__stdinCursor++] : null;
}
const readline = prompt;
console.log = (...args) => { __stdoutLines.push(__format(...args)); };
console.info = console.log;
try {
"#;

const EPILOGUE: &str = r#"
} catch (__error) {
  __stdoutLines.push('Error: ' + (__error && __error.message !== undefined ? __error.message : String(__error)));
  process.exitCode = 1;
}
if (__stdoutLines.length > 0) {
  __writeLine(__stdoutLines.join('\n'));
}
"#;

pub struct JavaScriptExecutor {
    node: String,
}

impl JavaScriptExecutor {
    pub fn new(node: Option<String>) -> Self {
        Self {
            node: node.unwrap_or_else(|| "node".to_string()),
        }
    }
}

/// Embed `code` in the stdin/stdout harness with `stdin` pre-split into lines
pub(crate) fn wrap_source(code: &str, stdin: &str) -> Result<String> {
    let lines: Vec<&str> = stdin.lines().collect();
    let lines = serde_json::to_string(&lines)
        .map_err(|e| Error::System(format!("Failed to encode stdin: {}", e)))?;

    let prelude = PRELUDE.replace("__STDIN_LINES__", &lines);
    let mut source = String::with_capacity(prelude.len() + code.len() + EPILOGUE.len());
    source.push_str(&prelude);
    source.push_str(code);
    source.push_str(EPILOGUE);
    Ok(source)
}

#[async_trait]
impl LanguageExecutor for JavaScriptExecutor {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn file_extension(&self) -> &str {
        "js"
    }

    fn required_tools(&self) -> Vec<&str> {
        vec![self.node.as_str()]
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
        write_source(&source, &wrap_source(&request.code, &request.stdin)?).await?;

        Ok(ExecutionPlan {
            compile: None,
            run: StageCommand::new(&self.node).path_arg(&source),
        })
    }
}
