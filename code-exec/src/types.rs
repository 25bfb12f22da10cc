use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Default wall-clock limit applied to each stage of an execution
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_millis(5000);

/// Default memory hint in megabytes
pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 128;

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    Java,
    Cpp,
    C,
    Go,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Go,
    ];

    /// Canonical token for this language
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Go => "go",
        }
    }

    /// Whether the language has a compile stage separate from the run stage.
    ///
    /// Go is built and run by a single `go run` invocation and so reports `false`.
    pub fn is_compiled(&self) -> bool {
        matches!(self, Language::Java | Language::Cpp | Language::C)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Language::JavaScript),
            "python" | "py" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "cpp" | "c++" => Ok(Language::Cpp),
            "c" => Ok(Language::C),
            "go" => Ok(Language::Go),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Code execution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Source code to execute
    pub code: String,
    /// Language token, parsed case-insensitively when the request is dispatched
    pub language: String,
    /// Data fed to the program's standard input
    #[serde(default)]
    pub stdin: String,
    /// Wall-clock limit per stage
    #[serde(
        default = "default_time_limit",
        rename = "time_limit_ms",
        with = "duration_millis"
    )]
    pub time_limit: Duration,
    /// Memory hint in megabytes; only enforced when the service opts in
    #[serde(default = "default_memory_limit_mb")]
    pub memory_limit_mb: u64,
    /// Explicit Java entry class, bypassing detection from the source
    #[serde(default)]
    pub entry_class: Option<String>,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            stdin: String::new(),
            time_limit: DEFAULT_TIME_LIMIT,
            memory_limit_mb: DEFAULT_MEMORY_LIMIT_MB,
            entry_class: None,
        }
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_memory_limit_mb(mut self, memory_limit_mb: u64) -> Self {
        self.memory_limit_mb = memory_limit_mb;
        self
    }

    pub fn with_entry_class(mut self, entry_class: impl Into<String>) -> Self {
        self.entry_class = Some(entry_class.into());
        self
    }
}

fn default_time_limit() -> Duration {
    DEFAULT_TIME_LIMIT
}

fn default_memory_limit_mb() -> u64 {
    DEFAULT_MEMORY_LIMIT_MB
}

/// Execution result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Program output (stdout), trimmed
    pub output: String,
    /// Compiler diagnostics or runtime stderr, trimmed; `None` when nothing was written
    pub error: Option<String>,
    /// Wall-clock time spent in the returned stage(s)
    #[serde(rename = "execution_time_ms", with = "duration_millis")]
    pub execution_time: Duration,
    /// `true` iff every stage exited with status 0 and wrote nothing to stderr
    pub success: bool,
    /// Set when a stage was killed for exceeding its time limit
    #[serde(default)]
    pub timed_out: bool,
}

impl ExecutionResult {
    /// Failure that never reached a running process, such as a spawn or write error
    pub fn failure(message: impl Into<String>, execution_time: Duration) -> Self {
        Self {
            output: String::new(),
            error: Some(message.into()),
            execution_time,
            success: false,
            timed_out: false,
        }
    }

    /// Failure for a request whose time budget ran out before a stage could start
    pub fn timed_out(execution_time: Duration) -> Self {
        Self {
            output: String::new(),
            error: None,
            execution_time,
            success: false,
            timed_out: true,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
